// Copyright (c) 2025 Ken Barker

// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"),
// to deal in the Software without restriction, including without limitation the
// rights to use, copy, modify, merge, publish, distribute, sublicense, and/or
// sell copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:

// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN
// THE SOFTWARE.

//! The helmert module contains the seven parameter Helmert transformations
//! between the WGS 84 and OSGB36 datums.
//!
//! A Helmert transformation is a similarity transformation between two
//! earth centred Cartesian reference frames: three translations, three small
//! rotations and a scale change.
//!
//! The two parameter sets are published independently: they are close to,
//! but not exactly, the inverse of each other.

#![allow(clippy::suboptimal_flops)]

/// An earth centred, earth fixed Cartesian position in metres.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cartesian {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Cartesian {
    /// Constructor.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// The parameters of a Helmert transformation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HelmertParams {
    /// Translation along the x axis in metres.
    pub tx: f64,
    /// Translation along the y axis in metres.
    pub ty: f64,
    /// Translation along the z axis in metres.
    pub tz: f64,
    /// Rotation about the x axis in arc seconds.
    pub rx: f64,
    /// Rotation about the y axis in arc seconds.
    pub ry: f64,
    /// Rotation about the z axis in arc seconds.
    pub rz: f64,
    /// Scale change in parts per million.
    pub s: f64,
}

/// The WGS 84 to OSGB36 transformation.
pub const WGS84_TO_OSGB36: HelmertParams = HelmertParams {
    tx: -446.448,
    ty: 125.157,
    tz: -542.060,
    rx: -0.1502,
    ry: -0.2470,
    rz: -0.8421,
    s: 20.4894,
};

/// The OSGB36 to WGS 84 transformation.
pub const OSGB36_TO_WGS84: HelmertParams = HelmertParams {
    tx: 446.448,
    ty: -125.157,
    tz: 542.060,
    rx: 0.1502,
    ry: 0.2470,
    rz: 0.8421,
    s: -20.4894,
};

/// Convert an angle in arc seconds to radians.
#[must_use]
pub fn arc_seconds_to_radians(seconds: f64) -> f64 {
    seconds / 3600.0 * core::f64::consts::PI / 180.0
}

impl HelmertParams {
    /// The scale factor: one plus the scale change in parts per million.
    #[must_use]
    pub fn scale_factor(&self) -> f64 {
        self.s / 1e6 + 1.0
    }

    /// Apply the transformation to a Cartesian position.
    /// * `p` - the position in the source reference frame.
    ///
    /// returns the position in the destination reference frame.
    /// # Examples
    /// ```
    /// use osgb36::helmert::{Cartesian, HelmertParams};
    ///
    /// let shift = HelmertParams { tx: 1.0, ty: 2.0, tz: 3.0, rx: 0.0, ry: 0.0, rz: 0.0, s: 0.0 };
    /// let p = shift.transform(&Cartesian::new(10.0, 20.0, 30.0));
    /// assert_eq!(Cartesian::new(11.0, 22.0, 33.0), p);
    /// ```
    #[must_use]
    pub fn transform(&self, p: &Cartesian) -> Cartesian {
        let rx = arc_seconds_to_radians(self.rx);
        let ry = arc_seconds_to_radians(self.ry);
        let rz = arc_seconds_to_radians(self.rz);
        let s1 = self.scale_factor();

        Cartesian {
            x: self.tx + p.x * s1 - p.y * rz + p.z * ry,
            y: self.ty + p.x * rz + p.y * s1 - p.z * rx,
            z: self.tz - p.x * ry + p.y * rx + p.z * s1,
        }
    }
}
