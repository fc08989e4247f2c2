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

//! The projection module contains the Transverse Mercator projection of
//! the Ordnance Survey National Grid.
//!
//! The projection converts OSGB36 latitudes and longitudes on the Airy 1830
//! ellipsoid to eastings and northings and back again, using the series
//! expansions published by the Ordnance Survey in
//! [A guide to coordinate systems in Great Britain](https://www.ordnancesurvey.co.uk/documents/resources/guide-coordinate-systems-great-britain.pdf)
//! Annex C.
//!
//! Both directions work in the OSGB36 datum only, see the `datum` module
//! for conversions to and from WGS 84.

#![allow(clippy::suboptimal_flops)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::similar_names)]

use crate::ellipsoid::{calculate_meridional_radius, calculate_transverse_radius};
use crate::{Error, GridCoordinate, AIRY1830_ELLIPSOID};
use angle_sc::Degrees;
use icao_units::si::Metres;
use unit_sphere::LatLong;

/// The scale factor on the central meridian.
pub const F0: f64 = 0.999_601_271_7;

/// The latitude of the true origin.
pub const LAT0: Degrees = Degrees(49.0);

/// The longitude of the true origin, the central meridian.
pub const LON0: Degrees = Degrees(-2.0);

/// The northing of the true origin.
pub const N0: Metres = Metres(-100_000.0);

/// The easting of the true origin.
pub const E0: Metres = Metres(400_000.0);

/// The meridional arc residual at which the inverse projection stops
/// iterating: 0.01mm.
pub const MAX_RESIDUAL: Metres = Metres(0.000_01);

/// The maximum number of iterations of the inverse projection.
pub const MAX_ITERATIONS: u32 = 30;

/// Calculate the meridional arc from the latitude of the true origin.
/// * `lat` - the latitude in radians.
///
/// returns the scaled distance along the central meridian in metres.
#[must_use]
pub fn meridional_arc(lat: f64) -> f64 {
    let b = AIRY1830_ELLIPSOID.b().0;
    let n = AIRY1830_ELLIPSOID.n();
    let n2 = n * n;
    let n3 = n2 * n;
    let lat0 = LAT0.0.to_radians();
    let d_lat = lat - lat0;
    let s_lat = lat + lat0;

    let ma = (1.0 + n + (5.0 / 4.0) * n2 + (5.0 / 4.0) * n3) * d_lat;
    let mb = (3.0 * n + 3.0 * n2 + (21.0 / 8.0) * n3) * libm::sin(d_lat) * libm::cos(s_lat);
    let mc = ((15.0 / 8.0) * n2 + (15.0 / 8.0) * n3)
        * libm::sin(2.0 * d_lat)
        * libm::cos(2.0 * s_lat);
    let md = (35.0 / 24.0) * n3 * libm::sin(3.0 * d_lat) * libm::cos(3.0 * s_lat);

    b * F0 * (ma - mb + mc - md)
}

/// The transverse and meridional radii of curvature scaled by `F0`, and
/// `eta2`, their ratio minus one.
fn scaled_radii(sin_lat: f64) -> (f64, f64, f64) {
    let a = AIRY1830_ELLIPSOID.a().0;
    let e_2 = AIRY1830_ELLIPSOID.e_2();
    let nu = F0 * calculate_transverse_radius(a, e_2, sin_lat);
    let rho = F0 * calculate_meridional_radius(a, e_2, sin_lat);
    (nu, rho, nu / rho - 1.0)
}

/// Project an OSGB36 position onto the National Grid.
/// * `position` - the OSGB36 latitude and longitude.
///
/// returns the easting and northing of the position.
/// # Examples
/// ```
/// use osgb36::{projection, LatLong, Degrees};
///
/// let position = LatLong::new(Degrees(49.0), Degrees(-2.0));
/// let grid = projection::to_grid(&position);
/// assert_eq!(400_000.0, grid.easting().0);
/// assert_eq!(-100_000.0, grid.northing().0);
/// ```
#[must_use]
pub fn to_grid(position: &LatLong) -> GridCoordinate {
    let lat = position.lat().0.to_radians();
    let lon = position.lon().0.to_radians();

    let sin_lat = libm::sin(lat);
    let cos_lat = libm::cos(lat);
    let (nu, rho, eta2) = scaled_radii(sin_lat);
    let m = meridional_arc(lat);

    let cos3lat = cos_lat * cos_lat * cos_lat;
    let cos5lat = cos3lat * cos_lat * cos_lat;
    let tan_lat = libm::tan(lat);
    let tan2lat = tan_lat * tan_lat;
    let tan4lat = tan2lat * tan2lat;

    let i = m + N0.0;
    let ii = (nu / 2.0) * sin_lat * cos_lat;
    let iii = (nu / 24.0) * sin_lat * cos3lat * (5.0 - tan2lat + 9.0 * eta2);
    let iiia = (nu / 720.0) * sin_lat * cos5lat * (61.0 - 58.0 * tan2lat + tan4lat);
    let iv = nu * cos_lat;
    let v = (nu / 6.0) * cos3lat * (nu / rho - tan2lat);
    let vi = (nu / 120.0)
        * cos5lat
        * (5.0 - 18.0 * tan2lat + tan4lat + 14.0 * eta2 - 58.0 * tan2lat * eta2);

    let d_lon = lon - LON0.0.to_radians();
    let d_lon2 = d_lon * d_lon;
    let d_lon3 = d_lon2 * d_lon;
    let d_lon4 = d_lon3 * d_lon;
    let d_lon5 = d_lon4 * d_lon;
    let d_lon6 = d_lon5 * d_lon;

    GridCoordinate::new(
        Metres(E0.0 + iv * d_lon + v * d_lon3 + vi * d_lon5),
        Metres(i + ii * d_lon2 + iii * d_lon4 + iiia * d_lon6),
    )
}

/// Find the latitude whose meridional arc matches a northing.
/// * `northing` - the northing in metres.
///
/// returns the latitude in radians.
fn solve_latitude(northing: f64) -> Result<f64, Error> {
    let a = AIRY1830_ELLIPSOID.a().0;
    let mut lat = LAT0.0.to_radians();
    let mut m = 0.0;
    for i in 1..=MAX_ITERATIONS {
        lat += (northing - N0.0 - m) / (a * F0);
        m = meridional_arc(lat);

        if libm::fabs(northing - N0.0 - m) < MAX_RESIDUAL.0 {
            tracing::trace!(iterations = i, "meridional arc converged");
            return Ok(lat);
        }
    }

    Err(Error::NonConvergence {
        solver: "meridional arc",
        iterations: MAX_ITERATIONS,
    })
}

/// Convert a National Grid easting and northing to an OSGB36 position.
/// * `coord` - the easting and northing.
///
/// returns the OSGB36 latitude and longitude.
///
/// # Errors
///
/// Returns `Error::NonConvergence` if the meridional arc does not converge,
/// e.g. for a non-finite northing.
pub fn from_grid(coord: &GridCoordinate) -> Result<LatLong, Error> {
    let lat = solve_latitude(coord.northing().0)?;

    let sin_lat = libm::sin(lat);
    let cos_lat = libm::cos(lat);
    let (nu, rho, eta2) = scaled_radii(sin_lat);

    let tan_lat = libm::tan(lat);
    let tan2lat = tan_lat * tan_lat;
    let tan4lat = tan2lat * tan2lat;
    let tan6lat = tan4lat * tan2lat;
    let sec_lat = 1.0 / cos_lat;
    let nu3 = nu * nu * nu;
    let nu5 = nu3 * nu * nu;
    let nu7 = nu5 * nu * nu;

    let vii = tan_lat / (2.0 * rho * nu);
    let viii = tan_lat / (24.0 * rho * nu3) * (5.0 + 3.0 * tan2lat + eta2 - 9.0 * tan2lat * eta2);
    let ix = tan_lat / (720.0 * rho * nu5) * (61.0 + 90.0 * tan2lat + 45.0 * tan4lat);
    let x = sec_lat / nu;
    let xi = sec_lat / (6.0 * nu3) * (nu / rho + 2.0 * tan2lat);
    let xii = sec_lat / (120.0 * nu5) * (5.0 + 28.0 * tan2lat + 24.0 * tan4lat);
    let xiia = sec_lat / (5040.0 * nu7)
        * (61.0 + 662.0 * tan2lat + 1320.0 * tan4lat + 720.0 * tan6lat);

    let d_e = coord.easting().0 - E0.0;
    let d_e2 = d_e * d_e;
    let d_e3 = d_e2 * d_e;
    let d_e4 = d_e2 * d_e2;
    let d_e5 = d_e3 * d_e2;
    let d_e6 = d_e4 * d_e2;
    let d_e7 = d_e5 * d_e2;

    let lat = lat - vii * d_e2 + viii * d_e4 - ix * d_e6;
    let lon = LON0.0.to_radians() + x * d_e - xi * d_e3 + xii * d_e5 - xiia * d_e7;

    Ok(LatLong::new(
        Degrees(lat.to_degrees()),
        Degrees(lon.to_degrees()),
    ))
}
