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

//! osgb36
//!
//! [![License](https://img.shields.io/badge/License-MIT-blue)](https://opensource.org/license/mit/)
//!
//! A library for converting positions between the global
//! [WGS 84](https://www.icao.int/NACC/Documents/Meetings/2014/ECARAIM/REF08-Doc9674.pdf)
//! datum used by satellite navigation and the British OSGB36 datum and its
//! [Ordnance Survey National Grid](https://www.ordnancesurvey.co.uk/documents/resources/guide-coordinate-systems-great-britain.pdf).
//!
//! ## Conversions
//!
//! A WGS 84 latitude and longitude is converted to OSGB36 by a seven parameter
//! Helmert transformation between the WGS 84 and Airy 1830 ellipsoids,
//! see the `datum` module.
//!
//! An OSGB36 latitude and longitude is projected onto the National Grid by a
//! Transverse Mercator projection, see the `projection` module.
//! National Grid eastings and northings are written as alphanumeric grid
//! references, e.g. `SU 42289 11340`, see the `grid_reference` module.
//!
//! The conversions are accurate to about 5 metres, they do not use the
//! OSTN15 transformation grid.
//!
//! ## Design
//!
//! The `Ellipsoid` class represents an ellipsoid of revolution defined by its
//! Semimajor and Semiminor axes.
//! The statics `WGS84_ELLIPSOID` and `AIRY1830_ELLIPSOID` represent the
//! ellipsoids of the two datums.
//!
//! The `Position` class holds a position in all three coordinate systems:
//! WGS 84, OSGB36 and the National Grid. They are calculated together when
//! a `Position` is constructed and cannot be changed afterwards.
//!
//! The `boundary` module determines whether a position is within Great Britain,
//! the `format` module displays latitudes and longitudes and the `maps` module
//! finds the Ordnance Survey map sheet containing a position.
//!
//! The library depends upon the following crates:
//!
//! - [angle-sc](https://crates.io/crates/angle-sc) - to define `Degrees`;
//! - [unit-sphere](https://crates.io/crates/unit-sphere) - to define `LatLong`;
//! - [icao_units](https://crates.io/crates/icao-units) - to define `Metres`.
//!
//! ## Example
//!
//! ```
//! use osgb36::{Degrees, Position};
//!
//! let southampton = Position::from_wgs84(Degrees(50.9), Degrees(-1.4)).unwrap();
//! assert_eq!(
//!     "SU 42289 11340",
//!     southampton.to_grid_reference(10, true).unwrap()
//! );
//! assert!(southampton.is_in_gb());
//! ```

extern crate angle_sc;
extern crate icao_units;
extern crate unit_sphere;

pub mod boundary;
pub mod datum;
pub mod ellipsoid;
pub mod error;
pub mod format;
pub mod grid_reference;
pub mod helmert;
pub mod maps;
pub mod projection;

pub use angle_sc::Degrees;
pub use error::Error;
pub use icao_units::si::Metres;
pub use unit_sphere::LatLong;

use format::{format_angle, AngleFormat, Axis};
use maps::{MapType, SheetInfo, SheetLookup};
use once_cell::sync::Lazy;

/// The parameters of an `Ellipsoid`.
#[derive(Clone, Debug, PartialEq)]
pub struct Ellipsoid {
    /// The Semimajor axis of the ellipsoid.
    a: Metres,
    /// The Semiminor axis of the ellipsoid.
    b: Metres,
    /// The flattening of the ellipsoid, a ratio.
    f: f64,

    /// The square of the Eccentricity of the ellipsoid.
    e_2: f64,
    /// The ratio `(a - b) / (a + b)` of the ellipsoid.
    n: f64,
}

impl Ellipsoid {
    /// Constructor.
    /// * `a` - the Semimajor axis of the `Ellipsoid`.
    /// * `b` - the Semiminor axis of the `Ellipsoid`.
    /// * `f` - the flattening of the `Ellipsoid`, a ratio.
    #[must_use]
    pub fn new(a: Metres, b: Metres, f: f64) -> Self {
        Self {
            a,
            b,
            f,
            e_2: ellipsoid::calculate_sq_eccentricity(a, b),
            n: ellipsoid::calculate_n(a, b),
        }
    }

    /// Construct an `Ellipsoid` with the WGS-84 parameters.
    #[must_use]
    pub fn wgs84() -> Self {
        Self::new(ellipsoid::wgs84::A, ellipsoid::wgs84::B, ellipsoid::wgs84::F)
    }

    /// Construct an `Ellipsoid` with the Airy 1830 parameters.
    #[must_use]
    pub fn airy1830() -> Self {
        Self::new(
            ellipsoid::airy1830::A,
            ellipsoid::airy1830::B,
            ellipsoid::airy1830::F,
        )
    }

    /// The Semimajor axis of the ellipsoid.
    #[must_use]
    pub const fn a(&self) -> Metres {
        self.a
    }

    /// The Semiminor axis of the ellipsoid.
    #[must_use]
    pub const fn b(&self) -> Metres {
        self.b
    }

    /// The flattening of the ellipsoid, a ratio.
    #[must_use]
    pub const fn f(&self) -> f64 {
        self.f
    }

    /// The square of the Eccentricity of the ellipsoid.
    #[must_use]
    pub const fn e_2(&self) -> f64 {
        self.e_2
    }

    /// The ratio `(a - b) / (a + b)` of the ellipsoid.
    #[must_use]
    pub const fn n(&self) -> f64 {
        self.n
    }
}

/// A static instance of the WGS-84 `Ellipsoid`.
pub static WGS84_ELLIPSOID: Lazy<Ellipsoid> = Lazy::new(Ellipsoid::wgs84);

/// A static instance of the Airy 1830 `Ellipsoid`, the OSGB36 datum.
pub static AIRY1830_ELLIPSOID: Lazy<Ellipsoid> = Lazy::new(Ellipsoid::airy1830);

/// A latitude, longitude and ellipsoidal height on a datum.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeodeticPosition {
    latitude: Degrees,
    longitude: Degrees,
    height: Metres,
}

impl GeodeticPosition {
    /// Constructor.
    /// * `latitude` - the geodetic latitude.
    /// * `longitude` - the longitude.
    /// * `height` - the height above the ellipsoid.
    #[must_use]
    pub const fn new(latitude: Degrees, longitude: Degrees, height: Metres) -> Self {
        Self {
            latitude,
            longitude,
            height,
        }
    }

    /// Construct a `GeodeticPosition` on the surface of the ellipsoid.
    /// * `latitude` - the geodetic latitude in degrees.
    /// * `longitude` - the longitude in degrees.
    #[must_use]
    pub const fn from_degrees(latitude: f64, longitude: f64) -> Self {
        Self::new(Degrees(latitude), Degrees(longitude), Metres(0.0))
    }

    /// The geodetic latitude.
    #[must_use]
    pub const fn latitude(&self) -> Degrees {
        self.latitude
    }

    /// The longitude.
    #[must_use]
    pub const fn longitude(&self) -> Degrees {
        self.longitude
    }

    /// The height above the ellipsoid.
    #[must_use]
    pub const fn height(&self) -> Metres {
        self.height
    }

    /// The latitude and longitude of the position.
    #[must_use]
    pub fn lat_long(&self) -> LatLong {
        LatLong::new(self.latitude, self.longitude)
    }
}

impl From<&LatLong> for GeodeticPosition {
    /// A `GeodeticPosition` on the surface of the ellipsoid.
    fn from(lat_long: &LatLong) -> Self {
        Self::new(lat_long.lat(), lat_long.lon(), Metres(0.0))
    }
}

/// A National Grid easting and northing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridCoordinate {
    easting: Metres,
    northing: Metres,
}

impl GridCoordinate {
    /// Constructor.
    /// * `easting` - the distance East of the National Grid false origin.
    /// * `northing` - the distance North of the National Grid false origin.
    #[must_use]
    pub const fn new(easting: Metres, northing: Metres) -> Self {
        Self { easting, northing }
    }

    /// The distance East of the National Grid false origin.
    #[must_use]
    pub const fn easting(&self) -> Metres {
        self.easting
    }

    /// The distance North of the National Grid false origin.
    #[must_use]
    pub const fn northing(&self) -> Metres {
        self.northing
    }
}

/// A position in WGS 84, OSGB36 and National Grid coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Position {
    wgs84: GeodeticPosition,
    osgb36: GeodeticPosition,
    grid: GridCoordinate,
}

impl Position {
    /// Construct a `Position` from a WGS 84 latitude and longitude.
    /// * `latitude` - the WGS 84 latitude.
    /// * `longitude` - the WGS 84 longitude.
    ///
    /// # Errors
    ///
    /// Returns `Error::NonConvergence` if the datum conversion fails,
    /// e.g. for a non-finite latitude or longitude.
    ///
    /// # Examples
    /// ```
    /// use osgb36::{Degrees, Position};
    ///
    /// let position = Position::from_wgs84(Degrees(50.9), Degrees(-1.4)).unwrap();
    /// assert_eq!(442_289, position.easting().0 as i32);
    /// assert_eq!(111_340, position.northing().0 as i32);
    /// ```
    pub fn from_wgs84(latitude: Degrees, longitude: Degrees) -> Result<Self, Error> {
        let wgs84 = GeodeticPosition::new(latitude, longitude, Metres(0.0));
        let osgb36 = datum::wgs84_to_osgb36(&wgs84)?;
        let grid = projection::to_grid(&osgb36.lat_long());
        Ok(Self {
            wgs84,
            osgb36,
            grid,
        })
    }

    /// Construct a `Position` from a National Grid reference.
    /// * `reference` - the grid reference, e.g. "SU 42289 11340".
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidFormat` if `reference` is not a valid grid
    /// reference or `Error::NonConvergence` if a conversion fails.
    ///
    /// # Examples
    /// ```
    /// use osgb36::Position;
    ///
    /// let position = Position::from_grid_reference("SU422113").unwrap();
    /// assert_eq!("50.90009", format!("{:.5}", position.latitude().0));
    /// assert_eq!("-1.40056", format!("{:.5}", position.longitude().0));
    /// ```
    pub fn from_grid_reference(reference: &str) -> Result<Self, Error> {
        let grid = grid_reference::parse(reference)?;
        Self::from_grid(grid)
    }

    /// Construct a `Position` from a National Grid easting and northing.
    /// * `easting` - the National Grid easting.
    /// * `northing` - the National Grid northing.
    ///
    /// # Errors
    ///
    /// Returns `Error::NonConvergence` if a conversion fails,
    /// e.g. for a non-finite northing.
    pub fn from_easting_northing(easting: Metres, northing: Metres) -> Result<Self, Error> {
        Self::from_grid(GridCoordinate::new(easting, northing))
    }

    fn from_grid(grid: GridCoordinate) -> Result<Self, Error> {
        let osgb36 = GeodeticPosition::from(&projection::from_grid(&grid)?);
        let wgs84 = datum::osgb36_to_wgs84(&osgb36)?;
        Ok(Self {
            wgs84,
            osgb36,
            grid,
        })
    }

    /// The WGS 84 latitude.
    #[must_use]
    pub const fn latitude(&self) -> Degrees {
        self.wgs84.latitude()
    }

    /// The WGS 84 longitude.
    #[must_use]
    pub const fn longitude(&self) -> Degrees {
        self.wgs84.longitude()
    }

    /// The height above the WGS 84 ellipsoid.
    #[must_use]
    pub const fn height(&self) -> Metres {
        self.wgs84.height()
    }

    /// The OSGB36 latitude.
    #[must_use]
    pub const fn os_latitude(&self) -> Degrees {
        self.osgb36.latitude()
    }

    /// The OSGB36 longitude.
    #[must_use]
    pub const fn os_longitude(&self) -> Degrees {
        self.osgb36.longitude()
    }

    /// The height above the Airy 1830 ellipsoid.
    #[must_use]
    pub const fn os_height(&self) -> Metres {
        self.osgb36.height()
    }

    /// The National Grid easting.
    #[must_use]
    pub const fn easting(&self) -> Metres {
        self.grid.easting()
    }

    /// The National Grid northing.
    #[must_use]
    pub const fn northing(&self) -> Metres {
        self.grid.northing()
    }

    /// The WGS 84 position.
    #[must_use]
    pub const fn wgs84(&self) -> &GeodeticPosition {
        &self.wgs84
    }

    /// The OSGB36 position on the Airy 1830 ellipsoid.
    #[must_use]
    pub const fn osgb36(&self) -> &GeodeticPosition {
        &self.osgb36
    }

    /// The National Grid easting and northing.
    /// # Examples
    /// ```
    /// use osgb36::{Metres, Position};
    ///
    /// let position = Position::from_grid_reference("SU 42250 11350").unwrap();
    /// assert_eq!(Metres(442_250.0), position.grid().easting());
    /// assert_eq!(Metres(111_350.0), position.grid().northing());
    /// assert_eq!(position.latitude(), position.wgs84().latitude());
    /// assert_eq!(position.os_longitude(), position.osgb36().longitude());
    /// ```
    #[must_use]
    pub const fn grid(&self) -> &GridCoordinate {
        &self.grid
    }

    /// The National Grid reference of the position.
    /// * `digits` - the number of digits: 0, 2, 4, 6, 8 or 10.
    /// * `with_spaces` - whether to separate the letters, easting and northing.
    ///
    /// returns the grid reference or None if `digits` is invalid or the
    /// position is outside of the National Grid.
    #[must_use]
    pub fn to_grid_reference(&self, digits: u8, with_spaces: bool) -> Option<String> {
        grid_reference::format(&self.grid, digits, with_spaces)
    }

    /// Whether the position is within Great Britain.
    #[must_use]
    pub fn is_in_gb(&self) -> bool {
        boundary::is_in_gb(&self.grid)
    }

    /// The WGS 84 latitude and longitude formatted for display.
    /// * `format` - the display format.
    /// * `digits` - the number of decimal places of the last field.
    /// * `join` - the separator between the latitude and longitude.
    ///
    /// # Examples
    /// ```
    /// use osgb36::{Degrees, Position};
    /// use osgb36::format::AngleFormat;
    ///
    /// let position = Position::from_wgs84(Degrees(50.9), Degrees(-1.4)).unwrap();
    /// assert_eq!(
    ///     "050°54'00\" N, 001°24'00\" W",
    ///     position.format_lat_long(AngleFormat::DegreesMinutesSeconds, 0, ", ")
    /// );
    /// ```
    #[must_use]
    pub fn format_lat_long(&self, format: AngleFormat, digits: u8, join: &str) -> String {
        let latitude = format_angle(self.latitude(), format, Axis::Latitude, digits);
        let longitude = format_angle(self.longitude(), format, Axis::Longitude, digits);
        format!("{latitude}{join}{longitude}")
    }

    /// Find the map sheet containing the position.
    /// * `lookup` - the map sheet lookup.
    /// * `map_type` - the type of map.
    #[must_use]
    pub fn map_sheet<L: SheetLookup + ?Sized>(
        &self,
        lookup: &L,
        map_type: MapType,
    ) -> Option<SheetInfo> {
        lookup.lookup(map_type, &self.grid)
    }
}
