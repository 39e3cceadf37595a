// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Cutting the image into tiles, and rendering one tile.
//!
//! A grid of `rows` x `cols` tiles covers the image exactly.  Every
//! tile is `width / cols` by `height / rows` pixels, except that the
//! last column absorbs the `width % cols` leftover pixels and the last
//! row absorbs the `height % rows` leftover pixels.  The tile at
//! (row, col) therefore starts at pixel `(col * base_width, row *
//! base_height)`.

use itertools::iproduct;
use std::sync::atomic::{AtomicBool, Ordering};

use config::{RenderConfig, RenderParams};
use error::RenderError;
use gradient::{Color, Gradient};
use kernel;
use planes::{Pixel, PlaneMapper};

/// A rectangular region of the full image.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Tile {
    /// Grid row.
    pub row: usize,
    /// Grid column.
    pub col: usize,
    /// Left edge, in full-image pixels.
    pub x: usize,
    /// Top edge, in full-image pixels.
    pub y: usize,
    /// Width in pixels.
    pub width: usize,
    /// Height in pixels.
    pub height: usize,
    /// Width of the full image.
    pub full_width: usize,
    /// Height of the full image.
    pub full_height: usize,
}

impl Tile {
    /// Pixels in this tile.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// The full-image pixel at tile-local (`left`, `top`).
    pub fn pixel(&self, left: usize, top: usize) -> Pixel {
        Pixel(self.x + left, self.y + top)
    }
}

/// The partition of one image into tiles.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TileGrid {
    width: usize,
    height: usize,
    rows: usize,
    cols: usize,
    base_width: usize,
    base_height: usize,
}

impl TileGrid {
    /// Fails if the image cannot be cut into `rows` x `cols` tiles of
    /// at least one pixel each.
    pub fn new(width: usize, height: usize, rows: usize, cols: usize) -> Result<Self, RenderError> {
        if width == 0 || height == 0 || rows == 0 || cols == 0 || rows > height || cols > width {
            return Err(RenderError::InvalidGrid {
                width,
                height,
                rows,
                cols,
            });
        }
        Ok(TileGrid {
            width,
            height,
            rows,
            cols,
            base_width: width / cols,
            base_height: height / rows,
        })
    }

    /// The grid a configuration asks for.
    pub fn from_config(config: &RenderConfig) -> Result<Self, RenderError> {
        TileGrid::new(config.width, config.height, config.rows, config.cols)
    }

    /// Number of tiles.
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    /// Row-major slot of the tile at (`row`, `col`).
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// Geometry of the tile at (`row`, `col`).
    pub fn tile(&self, row: usize, col: usize) -> Tile {
        let width = if col + 1 == self.cols {
            self.width - col * self.base_width
        } else {
            self.base_width
        };
        let height = if row + 1 == self.rows {
            self.height - row * self.base_height
        } else {
            self.base_height
        };
        Tile {
            row,
            col,
            x: col * self.base_width,
            y: row * self.base_height,
            width,
            height,
            full_width: self.width,
            full_height: self.height,
        }
    }

    /// Every tile, in row-major order.
    pub fn tiles(&self) -> Vec<Tile> {
        iproduct!(0..self.rows, 0..self.cols)
            .map(|(row, col)| self.tile(row, col))
            .collect()
    }
}

/// A finished tile: its geometry and its pixels, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct TileBuffer {
    tile: Tile,
    pixels: Vec<Color>,
}

impl TileBuffer {
    /// Refuses pixels that do not exactly fill the tile.
    pub fn new(tile: Tile, pixels: Vec<Color>) -> Result<Self, RenderError> {
        if pixels.len() != tile.len() {
            return Err(RenderError::TileSizeMismatch {
                row: tile.row,
                col: tile.col,
                got: pixels.len(),
                expected: tile.len(),
            });
        }
        Ok(TileBuffer { tile, pixels })
    }

    /// The region these pixels belong to.
    pub fn tile(&self) -> &Tile {
        &self.tile
    }

    /// Row-major pixels.
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Tile-local lookup.
    pub fn get(&self, left: usize, top: usize) -> Color {
        self.pixels[top * self.tile.width + left]
    }
}

/// Anything that can turn a tile into pixels.  The scheduler runs one
/// of these per tile, concurrently, so it must be shareable.
///
/// Implementations should return `RenderError::Cancelled` soon after
/// `cancel` is raised; the scheduler waits for every worker before it
/// returns.
pub trait TileRenderer: Sync {
    /// Render every pixel of `tile`.
    fn render(&self, tile: &Tile, cancel: &AtomicBool) -> Result<TileBuffer, RenderError>;
}

/// Render one tile with the escape-time kernel, row by row, checking
/// for cancellation between rows.
pub fn render_tile(
    tile: &Tile,
    params: &RenderParams,
    gradient: &Gradient,
    cancel: &AtomicBool,
) -> Result<TileBuffer, RenderError> {
    let plane = PlaneMapper::new(tile.full_width, tile.full_height, params.zoom);
    let mut pixels = Vec::with_capacity(tile.len());
    for top in 0..tile.height {
        if cancel.load(Ordering::Relaxed) {
            return Err(RenderError::Cancelled);
        }
        for left in 0..tile.width {
            let point = plane.pixel_to_point(&tile.pixel(left, top));
            pixels.push(kernel::shade(point, params, gradient));
        }
    }
    TileBuffer::new(*tile, pixels)
}

/// The production renderer: escape-time coloring with a shared,
/// read-only gradient.
#[derive(Copy, Clone, Debug)]
pub struct EscapeTimeRenderer<'a> {
    params: &'a RenderParams,
    gradient: &'a Gradient,
}

impl<'a> EscapeTimeRenderer<'a> {
    /// Borrows the parameters and gradient for the length of a render.
    pub fn new(params: &'a RenderParams, gradient: &'a Gradient) -> Self {
        EscapeTimeRenderer { params, gradient }
    }
}

impl<'a> TileRenderer for EscapeTimeRenderer<'a> {
    fn render(&self, tile: &Tile, cancel: &AtomicBool) -> Result<TileBuffer, RenderError> {
        render_tile(tile, self.params, self.gradient, cancel)
    }
}
