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

//! The ellipsoid module contains types and functions for defining an ellipsoid
//! given its Semimajor and Semiminor axes.
//!
//! Unlike an ellipsoid defined by its Semimajor axis and flattening, both
//! datums used here publish their Semiminor axis directly, so the eccentricity
//! is calculated from the pair of axes.

#![allow(clippy::suboptimal_flops)]

pub mod airy1830;
pub mod wgs84;

use crate::Metres;

/// Calculate the square of the Eccentricity of an ellipsoid.
/// * `a` - the Semimajor axis of an ellipsoid.
/// * `b` - the Semiminor axis of an ellipsoid.
/// # Examples
/// ```
/// use osgb36::ellipsoid::{calculate_sq_eccentricity, airy1830};
///
/// let e_2 = calculate_sq_eccentricity(airy1830::A, airy1830::B);
/// assert!((e_2 - 0.006_670_539_761_597_337).abs() < 1e-15);
/// ```
#[must_use]
pub fn calculate_sq_eccentricity(a: Metres, b: Metres) -> f64 {
    (a.0 * a.0 - b.0 * b.0) / (a.0 * a.0)
}

/// Calculate `n`, the ratio `(a - b) / (a + b)` of an ellipsoid.
///
/// This is the third flattening when the axes are exactly consistent with
/// the flattening, it is the parameter of the meridional arc series.
/// * `a` - the Semimajor axis of an ellipsoid.
/// * `b` - the Semiminor axis of an ellipsoid.
#[must_use]
pub fn calculate_n(a: Metres, b: Metres) -> f64 {
    (a.0 - b.0) / (a.0 + b.0)
}

/// Calculate the transverse radius of curvature, `nu`, at a latitude.
/// * `a` - the Semimajor axis of an ellipsoid.
/// * `e_2` - the square of the Eccentricity of the ellipsoid.
/// * `sin_lat` - the sine of the geodetic latitude.
#[must_use]
pub fn calculate_transverse_radius(a: f64, e_2: f64, sin_lat: f64) -> f64 {
    a / libm::sqrt(1.0 - e_2 * sin_lat * sin_lat)
}

/// Calculate the meridional radius of curvature, `rho`, at a latitude.
/// * `a` - the Semimajor axis of an ellipsoid.
/// * `e_2` - the square of the Eccentricity of the ellipsoid.
/// * `sin_lat` - the sine of the geodetic latitude.
#[must_use]
pub fn calculate_meridional_radius(a: f64, e_2: f64, sin_lat: f64) -> f64 {
    a * (1.0 - e_2) / libm::pow(1.0 - e_2 * sin_lat * sin_lat, 1.5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use angle_sc::is_within_tolerance;

    #[test]
    fn test_calculate_sq_eccentricity() {
        let wgs84_e2 = calculate_sq_eccentricity(wgs84::A, wgs84::B);
        assert!(is_within_tolerance(0.006_694_38, wgs84_e2, 1e-8));

        let airy_e2 = calculate_sq_eccentricity(airy1830::A, airy1830::B);
        assert!(is_within_tolerance(0.006_670_54, airy_e2, 1e-8));

        // a sphere has no eccentricity
        assert_eq!(0.0, calculate_sq_eccentricity(Metres(1.0), Metres(1.0)));
    }

    #[test]
    fn test_calculate_n() {
        let n = calculate_n(airy1830::A, airy1830::B);
        assert!(is_within_tolerance(0.001_673_220_3, n, 1e-10));
    }

    #[test]
    fn test_radii_of_curvature() {
        let e_2 = calculate_sq_eccentricity(airy1830::A, airy1830::B);

        // At the equator nu is the Semimajor axis
        assert_eq!(airy1830::A.0, calculate_transverse_radius(airy1830::A.0, e_2, 0.0));
        assert!(is_within_tolerance(
            airy1830::A.0 * (1.0 - e_2),
            calculate_meridional_radius(airy1830::A.0, e_2, 0.0),
            1e-6
        ));

        // At the pole both radii are equal
        let nu = calculate_transverse_radius(airy1830::A.0, e_2, 1.0);
        let rho = calculate_meridional_radius(airy1830::A.0, e_2, 1.0);
        assert!(is_within_tolerance(nu, rho, 1e-6));
    }
}
