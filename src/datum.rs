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

//! The datum module contains functions for converting geodetic positions
//! between the WGS 84 and OSGB36 datums.
//!
//! A position is converted to earth centred Cartesian coordinates on its
//! source ellipsoid, moved into the destination reference frame by a
//! Helmert transformation and then converted back to geodetic coordinates
//! on the destination ellipsoid.
//!
//! The conversion back to geodetic coordinates iterates until successive
//! latitudes agree to within 4 metres on the surface of the ellipsoid.

#![allow(clippy::suboptimal_flops)]
#![allow(clippy::many_single_char_names)]

use crate::ellipsoid::calculate_transverse_radius;
use crate::helmert::{Cartesian, HelmertParams, OSGB36_TO_WGS84, WGS84_TO_OSGB36};
use crate::{Ellipsoid, Error, GeodeticPosition, AIRY1830_ELLIPSOID, WGS84_ELLIPSOID};
use angle_sc::Degrees;
use icao_units::si::Metres;

/// The maximum number of iterations of the latitude solution.
pub const MAX_ITERATIONS: u32 = 30;

/// The precision of the latitude solution, in metres on the ellipsoid.
pub const PRECISION: Metres = Metres(4.0);

/// Convert a geodetic position to earth centred Cartesian coordinates.
/// * `position` - the geodetic position.
/// * `ellipsoid` - the `Ellipsoid` of the position's datum.
///
/// returns the Cartesian coordinates of the position.
#[must_use]
pub fn geodetic_to_cartesian(position: &GeodeticPosition, ellipsoid: &Ellipsoid) -> Cartesian {
    let phi = position.latitude().0.to_radians();
    let lambda = position.longitude().0.to_radians();
    let h = position.height().0;

    let sin_phi = libm::sin(phi);
    let cos_phi = libm::cos(phi);
    let e_2 = ellipsoid.e_2();
    let nu = calculate_transverse_radius(ellipsoid.a().0, e_2, sin_phi);

    Cartesian {
        x: (nu + h) * cos_phi * libm::cos(lambda),
        y: (nu + h) * cos_phi * libm::sin(lambda),
        z: ((1.0 - e_2) * nu + h) * sin_phi,
    }
}

/// Convert earth centred Cartesian coordinates to a geodetic position.
/// * `p` - the Cartesian coordinates.
/// * `ellipsoid` - the `Ellipsoid` of the destination datum.
///
/// returns the geodetic position on the `ellipsoid`.
///
/// # Errors
///
/// Returns `Error::NonConvergence` if the latitude has not converged within
/// `MAX_ITERATIONS`, e.g. for non-finite coordinates.
pub fn cartesian_to_geodetic(p: &Cartesian, ellipsoid: &Ellipsoid) -> Result<GeodeticPosition, Error> {
    let a = ellipsoid.a().0;
    let e_2 = ellipsoid.e_2();
    let precision = PRECISION.0 / a;

    let p_xy = libm::hypot(p.x, p.y);
    let mut phi = libm::atan2(p.z, p_xy * (1.0 - e_2));
    for i in 1..=MAX_ITERATIONS {
        let sin_phi = libm::sin(phi);
        let nu = calculate_transverse_radius(a, e_2, sin_phi);
        let previous = phi;
        phi = libm::atan2(p.z + e_2 * nu * sin_phi, p_xy);

        if libm::fabs(phi - previous) <= precision {
            tracing::trace!(iterations = i, "geodetic latitude converged");

            let lambda = libm::atan2(p.y, p.x);
            let h = p_xy / libm::cos(phi) - nu;
            return Ok(GeodeticPosition::new(
                Degrees(phi.to_degrees()),
                Degrees(lambda.to_degrees()),
                Metres(h),
            ));
        }
    }

    Err(Error::NonConvergence {
        solver: "geodetic latitude",
        iterations: MAX_ITERATIONS,
    })
}

/// Convert a geodetic position from one datum to another.
/// * `position` - the geodetic position on the `from` ellipsoid.
/// * `from` - the `Ellipsoid` of the source datum.
/// * `transform` - the Helmert transformation from source to destination.
/// * `to` - the `Ellipsoid` of the destination datum.
///
/// returns the geodetic position on the `to` ellipsoid.
///
/// # Errors
///
/// Returns `Error::NonConvergence` if the destination latitude does not
/// converge.
pub fn convert(
    position: &GeodeticPosition,
    from: &Ellipsoid,
    transform: &HelmertParams,
    to: &Ellipsoid,
) -> Result<GeodeticPosition, Error> {
    let p = geodetic_to_cartesian(position, from);
    cartesian_to_geodetic(&transform.transform(&p), to)
}

/// Convert a WGS 84 geodetic position to OSGB36.
/// * `position` - the WGS 84 position.
///
/// # Errors
///
/// Returns `Error::NonConvergence` if the OSGB36 latitude does not converge.
///
/// # Examples
/// ```
/// use osgb36::{datum, GeodeticPosition};
///
/// let southampton = GeodeticPosition::from_degrees(50.9, -1.4);
/// let os = datum::wgs84_to_osgb36(&southampton).unwrap();
/// assert!((os.latitude().0 - 50.899_439).abs() < 1e-6);
/// assert!((os.longitude().0 + 1.398_561).abs() < 1e-6);
/// ```
pub fn wgs84_to_osgb36(position: &GeodeticPosition) -> Result<GeodeticPosition, Error> {
    convert(position, &WGS84_ELLIPSOID, &WGS84_TO_OSGB36, &AIRY1830_ELLIPSOID)
}

/// Convert an OSGB36 geodetic position to WGS 84.
/// * `position` - the OSGB36 position.
///
/// # Errors
///
/// Returns `Error::NonConvergence` if the WGS 84 latitude does not converge.
pub fn osgb36_to_wgs84(position: &GeodeticPosition) -> Result<GeodeticPosition, Error> {
    convert(position, &AIRY1830_ELLIPSOID, &OSGB36_TO_WGS84, &WGS84_ELLIPSOID)
}
