// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The full image buffer that finished tiles are composited into.

use gradient::Color;
use tiles::{Tile, TileBuffer};

/// A `width` x `height` grid of colors, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
}

impl Canvas {
    /// A black canvas.
    pub fn new(width: usize, height: usize) -> Canvas {
        Canvas {
            width,
            height,
            pixels: vec![Color::BLACK; width * height],
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Color at (`x`, `y`).
    pub fn get(&self, x: usize, y: usize) -> Color {
        self.pixels[y * self.width + x]
    }

    /// Every pixel, row-major.
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Copy a finished tile into place.
    pub fn blit(&mut self, buffer: &TileBuffer) {
        let tile: &Tile = buffer.tile();
        assert!(tile.x + tile.width <= self.width && tile.y + tile.height <= self.height);
        for (top, row) in buffer.pixels().chunks(tile.width).enumerate() {
            let start = (tile.y + top) * self.width + tile.x;
            self.pixels[start..start + tile.width].copy_from_slice(row);
        }
    }

    /// Packed 8-bit RGB, three bytes per pixel, ready for an encoder.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        let mut raw = Vec::with_capacity(self.pixels.len() * 3);
        for &Color(r, g, b) in &self.pixels {
            raw.extend_from_slice(&[r, g, b]);
        }
        raw
    }
}
