// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Colors and the cyclic gradient used to paint escape velocities.

use error::RenderError;

/// An RGB triple.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    /// The color of points that never escape.
    pub const BLACK: Color = Color(0, 0, 0);

    /// Linear interpolation between two colors, `t` in `[0, 1]`.
    pub fn lerp(self, other: Color, t: f64) -> Color {
        let mix = |a: u8, b: u8| -> u8 {
            let v = f64::from(a) + (f64::from(b) - f64::from(a)) * t;
            v.round().max(0.0).min(255.0) as u8
        };
        Color(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2))
    }
}

/// Stops of the palette used when no gradient image is supplied:
/// blue, white, orange, maroon and back to blue, so the cyclic
/// lookup has no visible seam.
const DEFAULT_STOPS: [Color; 5] = [
    Color(0, 7, 100),
    Color(237, 255, 255),
    Color(255, 170, 0),
    Color(128, 0, 32),
    Color(0, 7, 100),
];

/// An ordered, non-empty palette.  Lookups wrap around modulo the
/// palette length, so any index is a valid one.
#[derive(Clone, Debug, PartialEq)]
pub struct Gradient {
    colors: Vec<Color>,
}

impl Gradient {
    /// Rejects an empty palette; everything else is fair game.
    pub fn new(colors: Vec<Color>) -> Result<Self, RenderError> {
        if colors.is_empty() {
            return Err(RenderError::EmptyGradient);
        }
        Ok(Gradient { colors })
    }

    /// Builds a gradient of `steps` colors by interpolating linearly
    /// between consecutive stops.  A single stop yields a flat palette.
    pub fn from_stops(stops: &[Color], steps: usize) -> Result<Self, RenderError> {
        if stops.is_empty() || steps == 0 {
            return Err(RenderError::EmptyGradient);
        }
        Ok(Gradient {
            colors: interpolate(stops, steps),
        })
    }

    /// The built-in 256-entry palette.
    pub fn default_palette() -> Self {
        Gradient {
            colors: interpolate(&DEFAULT_STOPS, 256),
        }
    }

    /// Number of colors in the palette.  Never zero.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false; a gradient cannot be built empty.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Cyclic lookup.
    pub fn get(&self, index: usize) -> Color {
        self.colors[index % self.colors.len()]
    }

    /// The colors, in order.
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }
}

/// `steps` colors spread evenly over the stops, first and last stop
/// included.  Needs at least one stop and one step.
fn interpolate(stops: &[Color], steps: usize) -> Vec<Color> {
    if stops.len() == 1 || steps == 1 {
        return vec![stops[0]; steps];
    }
    let segments = (stops.len() - 1) as f64;
    (0..steps)
        .map(|i| {
            let position = (i as f64) / ((steps - 1) as f64) * segments;
            let segment = (position.floor() as usize).min(stops.len() - 2);
            stops[segment].lerp(stops[segment + 1], position - segment as f64)
        })
        .collect()
}
