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

//! The grid_reference module contains functions to parse and format
//! Ordnance Survey National Grid references, e.g. `SU 42289 11340`.
//!
//! A grid reference is a pair of letters identifying a 100km square followed
//! by equal length easting and northing offsets within the square.
//!
//! The first letter identifies a 500km square and the second a 100km square
//! within it, both lettered from a 5 by 5 grid of the letters `A` to `Z`
//! without `I`, starting at the north west corner.
//! The false origin of the grid is the south west corner of square `SV`.

use crate::{Error, GridCoordinate};
use icao_units::si::Metres;

/// The size of a grid square, in metres.
pub const SQUARE_SIZE: f64 = 100_000.0;

/// The number of 100km squares east of the false origin.
pub const EASTING_SQUARES: i32 = 7;

/// The number of 100km squares north of the false origin.
pub const NORTHING_SQUARES: i32 = 13;

/// The maximum number of digits in a grid reference.
pub const MAX_DIGITS: u8 = 10;

/// The cell size in metres, indexed by the number of digits in each of the
/// easting and northing.
const CELL_SIZES: [f64; 6] = [100_000.0, 10_000.0, 1_000.0, 100.0, 10.0, 1.0];

/// The index of the letter 'H', letters after it shift down to skip 'I'.
const LAST_LETTER_BEFORE_I: i32 = 7;

/// Convert a grid letter to its index in the 25 letter grid alphabet.
fn letter_index(letter: char) -> Option<i32> {
    let letter = u8::try_from(letter.to_ascii_uppercase()).ok()?;
    if !letter.is_ascii_uppercase() || letter == b'I' {
        return None;
    }

    let index = i32::from(letter - b'A');
    Some(if index > LAST_LETTER_BEFORE_I {
        index - 1
    } else {
        index
    })
}

/// Convert an index in the 25 letter grid alphabet to its grid letter.
fn index_letter(index: i32) -> char {
    let index = if index > LAST_LETTER_BEFORE_I {
        index + 1
    } else {
        index
    };
    u8::try_from(index).map_or('?', |i| char::from(b'A' + i))
}

/// Test whether 100km square indices lie within the National Grid.
fn is_valid_square(e100k: i32, n100k: i32) -> bool {
    (0..EASTING_SQUARES).contains(&e100k) && (0..NORTHING_SQUARES).contains(&n100k)
}

/// Parse a grid reference into the easting and northing it identifies.
///
/// Letters are case insensitive and spaces between the letters and numbers
/// are ignored.
/// References of less than 10 digits identify a cell rather than a point,
/// the result is the centre of the cell.
/// * `reference` - the grid reference, e.g. `SU422113` or `SU 42289 11340`.
///
/// returns the easting and northing in metres.
///
/// # Errors
///
/// Returns `Error::InvalidFormat` if the reference does not start with a
/// pair of valid grid letters, the letters identify a square outside the
/// National Grid, or the remainder is not an even number of at most 10
/// digits.
///
/// # Examples
/// ```
/// use osgb36::grid_reference;
///
/// let grid = grid_reference::parse("SU422113").unwrap();
/// assert_eq!(442_250.0, grid.easting().0);
/// assert_eq!(111_350.0, grid.northing().0);
/// ```
pub fn parse(reference: &str) -> Result<GridCoordinate, Error> {
    let mut chars = reference.trim().chars();
    let (Some(first), Some(second)) = (chars.next(), chars.next()) else {
        tracing::debug!(reference, "grid reference too short");
        return Err(Error::invalid_format(reference, "missing grid square letters"));
    };

    let (Some(l1), Some(l2)) = (letter_index(first), letter_index(second)) else {
        tracing::debug!(reference, "invalid grid square letters");
        return Err(Error::invalid_format(reference, "invalid grid square letters"));
    };

    // 100km square indices from the false origin, square SV
    let e100k = ((l1 - 2) % 5) * 5 + l2 % 5;
    let n100k = (19 - (l1 / 5) * 5) - l2 / 5;
    if !is_valid_square(e100k, n100k) {
        tracing::debug!(reference, e100k, n100k, "grid square outside the National Grid");
        return Err(Error::invalid_format(
            reference,
            "grid square outside the National Grid",
        ));
    }

    let digits: String = chars.filter(|c| !c.is_whitespace()).collect();
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::invalid_format(reference, "non-numeric easting or northing"));
    }
    if digits.len() % 2 != 0 {
        return Err(Error::invalid_format(reference, "odd number of digits"));
    }
    if digits.len() > usize::from(MAX_DIGITS) {
        return Err(Error::invalid_format(reference, "more than 10 digits"));
    }

    let half = digits.len() / 2;
    let cell = CELL_SIZES[half];
    let (easting, northing) = digits.split_at(half);
    let easting = parse_offset(reference, easting)?;
    let northing = parse_offset(reference, northing)?;

    // move to the centre of the cell, 10 digit references are already 1m
    let centre = if half < CELL_SIZES.len() - 1 {
        cell / 2.0
    } else {
        0.0
    };

    Ok(GridCoordinate::new(
        Metres(f64::from(e100k) * SQUARE_SIZE + easting * cell + centre),
        Metres(f64::from(n100k) * SQUARE_SIZE + northing * cell + centre),
    ))
}

/// Parse the digits of an easting or northing offset, empty is zero.
fn parse_offset(reference: &str, digits: &str) -> Result<f64, Error> {
    if digits.is_empty() {
        Ok(0.0)
    } else {
        digits
            .parse::<u32>()
            .map(f64::from)
            .map_err(|_| Error::invalid_format(reference, "non-numeric easting or northing"))
    }
}

/// Format an easting and northing as a grid reference.
/// * `coord` - the easting and northing.
/// * `digits` - the total number of digits: 0, 2, 4, 6, 8 or 10.
/// * `with_spaces` - whether to separate the letters and numbers with spaces.
///
/// The offsets are truncated, not rounded: a grid reference identifies the
/// south west corner of its cell.
///
/// returns the grid reference.
///
/// # Errors
///
/// Returns `Error::InvalidPrecision` if `digits` is odd or greater than 10,
/// or `Error::OutOfGridExtent` if `coord` is not within a 100km square of
/// the National Grid.
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_sign_loss)]
pub fn try_format(coord: &GridCoordinate, digits: u8, with_spaces: bool) -> Result<String, Error> {
    if digits % 2 != 0 || digits > MAX_DIGITS {
        return Err(Error::InvalidPrecision(digits));
    }

    let easting = coord.easting().0;
    let northing = coord.northing().0;
    let e100k = libm::floor(easting / SQUARE_SIZE);
    let n100k = libm::floor(northing / SQUARE_SIZE);
    if !(0.0..f64::from(EASTING_SQUARES)).contains(&e100k)
        || !(0.0..f64::from(NORTHING_SQUARES)).contains(&n100k)
    {
        tracing::debug!(easting, northing, "grid coordinate outside the National Grid");
        return Err(Error::OutOfGridExtent { easting, northing });
    }

    // the ranges have been checked above
    let e100k = e100k as i32;
    let n100k = n100k as i32;

    let l1 = (19 - n100k) - (19 - n100k) % 5 + (e100k + 10) / 5;
    let l2 = (19 - n100k) * 5 % 25 + e100k % 5;
    let letters: String = [index_letter(l1), index_letter(l2)].iter().collect();
    if digits == 0 {
        return Ok(letters);
    }

    let width = usize::from(digits / 2);
    let cell = CELL_SIZES[width];
    let e = libm::floor(libm::fmod(easting, SQUARE_SIZE) / cell) as u32;
    let n = libm::floor(libm::fmod(northing, SQUARE_SIZE) / cell) as u32;
    let space = if with_spaces { " " } else { "" };

    Ok(format!("{letters}{space}{e:0width$}{space}{n:0width$}"))
}

/// Format an easting and northing as a grid reference.
/// * `coord` - the easting and northing.
/// * `digits` - the total number of digits: 0, 2, 4, 6, 8 or 10.
/// * `with_spaces` - whether to separate the letters and numbers with spaces.
///
/// returns the grid reference, or None if `coord` is outside the National
/// Grid or `digits` is invalid.
///
/// # Examples
/// ```
/// use osgb36::{grid_reference, GridCoordinate, Metres};
///
/// let grid = GridCoordinate::new(Metres(442_289.66), Metres(111_340.57));
/// assert_eq!(Some("SU 42289 11340".to_owned()), grid_reference::format(&grid, 10, true));
/// assert_eq!(Some("SU422113".to_owned()), grid_reference::format(&grid, 6, false));
///
/// let paris = GridCoordinate::new(Metres(719_204.17), Metres(-106_884.89));
/// assert_eq!(None, grid_reference::format(&paris, 10, true));
/// ```
#[must_use]
pub fn format(coord: &GridCoordinate, digits: u8, with_spaces: bool) -> Option<String> {
    try_format(coord, digits, with_spaces).ok()
}
