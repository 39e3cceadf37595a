// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Every way a render can fail.  All of these are fatal to the render
//! call: there is no partial image and no silent fallback.

use std::time::Duration;

/// The error type shared by configuration, the kernel's collaborators
/// and the scheduler.
#[derive(Debug, Fail, PartialEq)]
pub enum RenderError {
    /// The iteration limit was zero.
    #[fail(display = "max_iterations must be at least 1")]
    InvalidIterations,

    /// The zoom was zero, negative or not a finite number.
    #[fail(display = "zoom must be a positive, finite number (got {})", _0)]
    InvalidZoom(f64),

    /// The color density was zero, negative or not a finite number.
    #[fail(display = "color density must be a positive, finite number (got {})", _0)]
    InvalidColorDensity(f64),

    /// The pan offset or Julia constant was not finite.
    #[fail(display = "offset must be a finite complex number")]
    InvalidOffset,

    /// A gradient needs at least one color to be indexed.
    #[fail(display = "gradient must contain at least one color")]
    EmptyGradient,

    /// The resolution cannot be split into the requested tile grid.
    #[fail(
        display = "cannot split a {}x{} image into {} rows by {} columns",
        width, height, rows, cols
    )]
    InvalidGrid {
        /// Full image width in pixels.
        width: usize,
        /// Full image height in pixels.
        height: usize,
        /// Requested row count.
        rows: usize,
        /// Requested column count.
        cols: usize,
    },

    /// The mode string named no fractal we know how to draw.
    #[fail(display = "unrecognised fractal mode: {:?}", _0)]
    UnknownMode(String),

    /// A tile worker reported an error.
    #[fail(display = "tile ({}, {}) failed: {}", row, col, reason)]
    WorkerFailed {
        /// Grid row of the failed tile.
        row: usize,
        /// Grid column of the failed tile.
        col: usize,
        /// What the worker said went wrong.
        reason: String,
    },

    /// A tile worker panicked before handing back its tile.
    #[fail(display = "a tile worker panicked")]
    WorkerPanicked,

    /// Not every tile came back before the deadline.
    #[fail(
        display = "render timed out after {:?} with {} tile(s) outstanding",
        elapsed, outstanding
    )]
    Timeout {
        /// Time spent waiting before giving up.
        elapsed: Duration,
        /// Tiles that had not completed.
        outstanding: usize,
    },

    /// The tile was abandoned because the render was already failing.
    #[fail(display = "tile rendering was cancelled")]
    Cancelled,

    /// A worker handed back the right number of pixels for a tile at
    /// the wrong place.
    #[fail(display = "tile ({}, {}) returned pixels for a different region", row, col)]
    TileMisplaced {
        /// Grid row of the offending tile.
        row: usize,
        /// Grid column of the offending tile.
        col: usize,
    },

    /// A worker handed back a buffer that does not fit its tile.
    #[fail(
        display = "tile ({}, {}) returned {} pixels, expected {}",
        row, col, got, expected
    )]
    TileSizeMismatch {
        /// Grid row of the offending tile.
        row: usize,
        /// Grid column of the offending tile.
        col: usize,
        /// Pixel count received.
        got: usize,
        /// Pixel count the tile geometry requires.
        expected: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        let e = RenderError::UnknownMode("burning-ship".to_string());
        assert_eq!(format!("{}", e), "unrecognised fractal mode: \"burning-ship\"");

        let e = RenderError::InvalidGrid {
            width: 10,
            height: 8,
            rows: 9,
            cols: 2,
        };
        assert_eq!(format!("{}", e), "cannot split a 10x8 image into 9 rows by 2 columns");
    }
}
