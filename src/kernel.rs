// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time kernel.  Every function here is pure: a point and
//! the render parameters go in, a color comes out, and nothing else
//! is read or written.  That is all the tiled renderer needs to run
//! pixels on as many threads as it likes.
//!
//! A point escapes when `|z|` exceeds 3.  Radius 2 is the tight bound,
//! but any radius of 2 or more draws the same set.  The discrete
//! escape count is smoothed with the usual `i - log2(ln |z|)`
//! correction so that the gradient does not band.  Both the radius
//! and the smoothing formula feed into every pixel's color.

use num::Complex;

use config::{Mode, RenderParams};
use gradient::{Color, Gradient};

/// Escape radius.
pub const ESCAPE_RADIUS: f64 = 3.0;

/// Where and how a point's orbit left the escape disc.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Escape {
    /// The 1-indexed iteration after which `|z|` exceeded the radius.
    pub iteration: usize,
    /// `|z|` at that iteration.
    pub modulus: f64,
}

/// Iterate `z <- z^2 + c` from `z0`, at most `max_iterations` times.
/// Returns `None` if the orbit never escapes.
#[inline]
pub fn escape(z0: Complex<f64>, c: Complex<f64>, max_iterations: usize) -> Option<Escape> {
    let mut z = z0;
    for i in 1..=max_iterations {
        z = z * z + c;
        let modulus = z.norm();
        if modulus > ESCAPE_RADIUS {
            return Some(Escape {
                iteration: i,
                modulus,
            });
        }
    }
    None
}

/// The continuous iteration count: `i - ln(ln |z|) / ln 2`.
#[inline]
pub fn smooth_iterations(escape: &Escape) -> f64 {
    (escape.iteration as f64) - escape.modulus.ln().ln() / 2.0_f64.ln()
}

/// `floor(smooth * density) mod len`, never negative.  A smoothed
/// value that overflowed to something non-finite lands on entry 0.
#[inline]
pub fn gradient_index(smooth: f64, color_density: f64, len: usize) -> usize {
    let scaled = (smooth * color_density).floor();
    if !scaled.is_finite() {
        return 0;
    }
    // rem_euclid can round up to exactly `len` for tiny negatives.
    (scaled.rem_euclid(len as f64) as usize) % len
}

/// Color for the Mandelbrot set: `c` is the panned point, `z` starts
/// at the origin.  Points that never escape are black.
///
/// The pan offset is added to the real axis and subtracted from the
/// imaginary one, so a positive imaginary offset moves the view
/// toward the top of the image.
pub fn mandelbrot(point: Complex<f64>, params: &RenderParams, gradient: &Gradient) -> Color {
    let c = Complex::new(point.re + params.offset.re, point.im - params.offset.im);
    match escape(Complex::new(0.0, 0.0), c, params.max_iterations) {
        Some(e) => gradient.get(gradient_index(
            smooth_iterations(&e),
            params.color_density,
            gradient.len(),
        )),
        None => Color::BLACK,
    }
}

/// Color for a Julia set: `z` starts at the point and `c` is the
/// offset.  The smoothed count is shifted by one before scaling, so
/// the two modes sit a step apart on the same gradient.  Points that
/// never escape are black.
pub fn julia(point: Complex<f64>, params: &RenderParams, gradient: &Gradient) -> Color {
    match escape(point, params.offset, params.max_iterations) {
        Some(e) => gradient.get(gradient_index(
            smooth_iterations(&e) + 1.0,
            params.color_density,
            gradient.len(),
        )),
        None => Color::BLACK,
    }
}

/// Color a point according to `params.mode`.
#[inline]
pub fn shade(point: Complex<f64>, params: &RenderParams, gradient: &Gradient) -> Color {
    match params.mode {
        Mode::Mandelbrot => mandelbrot(point, params, gradient),
        Mode::Julia => julia(point, params, gradient),
    }
}
