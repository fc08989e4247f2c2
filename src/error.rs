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

//! The error module contains the `Error` type returned by the fallible
//! conversions of this library.

/// The reasons a conversion can fail.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum Error {
    /// A malformed grid reference string.
    #[error("invalid grid reference {reference:?}: {reason}")]
    InvalidFormat {
        /// The grid reference that could not be parsed.
        reference: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// A grid reference precision that is odd or greater than 10 digits.
    #[error("invalid grid reference precision: {0} digits")]
    InvalidPrecision(u8),

    /// A grid coordinate whose 100km square lies outside the National Grid.
    #[error("easting {easting} northing {northing} is outside the National Grid")]
    OutOfGridExtent {
        /// The easting in metres.
        easting: f64,
        /// The northing in metres.
        northing: f64,
    },

    /// An iterative solution did not converge.
    #[error("{solver} did not converge within {iterations} iterations")]
    NonConvergence {
        /// The name of the iterative solver.
        solver: &'static str,
        /// The number of iterations attempted.
        iterations: u32,
    },
}

impl Error {
    /// Construct an `InvalidFormat` error.
    /// * `reference` - the rejected grid reference.
    /// * `reason` - why it was rejected.
    #[must_use]
    pub fn invalid_format(reference: &str, reason: &'static str) -> Self {
        Self::InvalidFormat {
            reference: reference.to_owned(),
            reason,
        }
    }
}
