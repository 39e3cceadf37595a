#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tiled escape-time fractal renderer
//!
//! The Mandelbrot and Julia sets are both drawn by taking a point on
//! the complex plane and repeatedly squaring and adding, measuring
//! how quickly the result runs off to infinity.  That "velocity",
//! smoothed so that it varies continuously, picks a color out of a
//! cyclic gradient.  Points that never escape are painted black.
//!
//! Because every pixel is independent of every other, the image is
//! cut into a grid of tiles and each tile is rendered on its own
//! thread.  A tile knows where it sits in the full image, so the
//! tiles line up into one continuous picture no matter which thread
//! finishes first.
//!
//! ```no_run
//! # extern crate num;
//! # extern crate tilebrot;
//! use num::Complex;
//! use tilebrot::{render, Gradient, Mode, RenderConfig, RenderParams};
//!
//! # fn main() -> Result<(), tilebrot::RenderError> {
//! let params = RenderParams::new(Mode::Mandelbrot, 1000, 175.0, 15.0, Complex::new(-0.75, 0.0))?;
//! let config = RenderConfig::new(params, 500, 400, 2, 2)?;
//! let canvas = render(&config, &Gradient::default_palette())?;
//! assert_eq!(canvas.width(), 500);
//! # Ok(())
//! # }
//! ```

extern crate crossbeam;
#[macro_use]
extern crate failure;
extern crate itertools;
#[macro_use]
extern crate log;
extern crate num;

pub mod canvas;
pub mod config;
pub mod error;
pub mod gradient;
pub mod kernel;
pub mod planes;
pub mod scheduler;
pub mod tiles;

pub use canvas::Canvas;
pub use config::{Mode, RenderConfig, RenderParams};
pub use error::RenderError;
pub use gradient::{Color, Gradient};
pub use scheduler::{render, render_with};
pub use tiles::{EscapeTimeRenderer, Tile, TileBuffer, TileGrid, TileRenderer};
