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

//! The format module contains functions to display latitudes and longitudes
//! as decimal degrees, degrees and minutes or degrees, minutes and seconds.

#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]

use angle_sc::Degrees;

/// The maximum number of decimal places of a formatted angle.
pub const MAX_DIGITS: u8 = 9;

/// The display format of an angle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AngleFormat {
    /// Signed decimal degrees, e.g. `-1.40`.
    Decimal,
    /// Degrees and decimal minutes, e.g. `1°24.00'W`.
    DegreesMinutes,
    /// Degrees, minutes and seconds, e.g. `001°24'00" W`.
    DegreesMinutesSeconds,
}

/// Whether an angle is a latitude or a longitude.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    /// The hemisphere letter of an angle on this axis.
    /// * `negative` - whether the angle is South or West.
    #[must_use]
    pub const fn hemisphere(self, negative: bool) -> char {
        match (self, negative) {
            (Self::Latitude, false) => 'N',
            (Self::Latitude, true) => 'S',
            (Self::Longitude, false) => 'E',
            (Self::Longitude, true) => 'W',
        }
    }
}

/// Split an absolute angle into whole degrees and a number of `units` per
/// degree, rounded so that carries propagate into the degrees.
fn split(degrees: f64, units: u64) -> (u64, u64) {
    let total = libm::round(degrees * units as f64) as u64;
    (total / units, total % units)
}

/// Format an angle for display.
/// * `value` - the angle in decimal degrees.
/// * `format` - the display format.
/// * `axis` - whether the angle is a latitude or longitude.
/// * `digits` - the number of decimal places of the last field, at most 9.
///
/// returns the formatted angle.
/// # Examples
/// ```
/// use osgb36::Degrees;
/// use osgb36::format::{format_angle, AngleFormat, Axis};
///
/// let lat = format_angle(Degrees(50.9), AngleFormat::DegreesMinutesSeconds, Axis::Latitude, 0);
/// assert_eq!("050°54'00\" N", lat);
///
/// let lon = format_angle(Degrees(-1.4), AngleFormat::DegreesMinutes, Axis::Longitude, 2);
/// assert_eq!("1°24.00'W", lon);
/// ```
#[must_use]
pub fn format_angle(value: Degrees, format: AngleFormat, axis: Axis, digits: u8) -> String {
    let digits = digits.min(MAX_DIGITS);
    let places = usize::from(digits);
    let scale = 10_u64.pow(u32::from(digits));
    let hemisphere = axis.hemisphere(value.0 < 0.0);
    let abs = libm::fabs(value.0);

    match format {
        AngleFormat::Decimal => format!("{:.places$}", value.0),
        AngleFormat::DegreesMinutes => {
            let (deg, rem) = split(abs, 60 * scale);
            let minutes = rem as f64 / scale as f64;
            let width = if digits == 0 { 2 } else { places + 3 };
            format!("{deg}°{minutes:0width$.places$}'{hemisphere}")
        }
        AngleFormat::DegreesMinutesSeconds => {
            let (deg, rem) = split(abs, 3600 * scale);
            let minutes = rem / (60 * scale);
            let seconds = (rem % (60 * scale)) as f64 / scale as f64;
            let width = if digits == 0 { 2 } else { places + 3 };
            format!("{deg:03}°{minutes:02}'{seconds:0width$.places$}\" {hemisphere}")
        }
    }
}
