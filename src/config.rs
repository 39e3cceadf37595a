// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Render configuration.  Everything a render needs is carried in an
//! explicit, validated value; nothing is read from global state.

use num::Complex;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use error::RenderError;
use tiles::TileGrid;

/// Which escape-time fractal to draw.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    /// `z` starts at zero and `c` is the pixel.
    Mandelbrot,
    /// `z` starts at the pixel and `c` is the fixed Julia constant.
    Julia,
}

impl FromStr for Mode {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Mode, RenderError> {
        match s.to_ascii_lowercase().as_str() {
            "mandelbrot" => Ok(Mode::Mandelbrot),
            "julia" => Ok(Mode::Julia),
            _ => Err(RenderError::UnknownMode(s.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Mode::Mandelbrot => write!(f, "mandelbrot"),
            Mode::Julia => write!(f, "julia"),
        }
    }
}

/// The parameters of the escape-time kernel, fixed for one render.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderParams {
    /// Mandelbrot or Julia.
    pub mode: Mode,
    /// Upper bound on iterations per pixel.
    pub max_iterations: usize,
    /// Pixels per unit of the complex plane.
    pub zoom: f64,
    /// How many gradient entries one unit of smoothed iteration spans.
    pub color_density: f64,
    /// The pan center (Mandelbrot) or the Julia constant (Julia).
    pub offset: Complex<f64>,
}

impl RenderParams {
    /// Validates and bundles the kernel parameters.
    pub fn new(
        mode: Mode,
        max_iterations: usize,
        zoom: f64,
        color_density: f64,
        offset: Complex<f64>,
    ) -> Result<Self, RenderError> {
        if max_iterations == 0 {
            return Err(RenderError::InvalidIterations);
        }
        if !(zoom.is_finite() && zoom > 0.0) {
            return Err(RenderError::InvalidZoom(zoom));
        }
        if !(color_density.is_finite() && color_density > 0.0) {
            return Err(RenderError::InvalidColorDensity(color_density));
        }
        if !(offset.re.is_finite() && offset.im.is_finite()) {
            return Err(RenderError::InvalidOffset);
        }
        Ok(RenderParams {
            mode,
            max_iterations,
            zoom,
            color_density,
            offset,
        })
    }
}

/// A complete render request: kernel parameters, the full resolution,
/// how to cut it into tiles, and how long to wait for them.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderConfig {
    /// Kernel parameters.
    pub params: RenderParams,
    /// Full image width in pixels.
    pub width: usize,
    /// Full image height in pixels.
    pub height: usize,
    /// Tile grid rows.
    pub rows: usize,
    /// Tile grid columns.
    pub cols: usize,
    /// Deadline for the whole tile set, measured from dispatch.  `None`
    /// waits forever.
    pub timeout: Option<Duration>,
}

impl RenderConfig {
    /// Rejects a resolution that cannot be cut into a `rows` x `cols`
    /// grid of non-empty tiles.
    pub fn new(
        params: RenderParams,
        width: usize,
        height: usize,
        rows: usize,
        cols: usize,
    ) -> Result<Self, RenderError> {
        TileGrid::new(width, height, rows, cols)?;
        Ok(RenderConfig {
            params,
            width,
            height,
            rows,
            cols,
            timeout: None,
        })
    }

    /// Fail the render if the tiles are not all in after `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
