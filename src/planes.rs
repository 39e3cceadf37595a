// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the PlaneMapper struct, which describes the relationship
//! between the integral pixel plane of the *full* image and the
//! complex plane.  The pixel at the geometric center of the image
//! maps to the origin, and every `zoom` pixels make one unit of the
//! complex plane.
//!
//! Tiles never get a mapper of their own: they hand their pixels to
//! the full image's mapper in full-image coordinates, which is what
//! makes independently rendered tiles line up into one picture.
use num::Complex;

/// Describes the x, y of a pixel in the full image.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// Maps pixels of the full image onto the complex plane.
#[derive(Copy, Clone, Debug)]
pub struct PlaneMapper {
    // The pixel coordinates (possibly fractional) of the origin.
    center: (f64, f64),
    // Pixels per unit of the complex plane.
    zoom: f64,
}

impl PlaneMapper {
    /// Constructor.  The zoom is assumed to be validated already; see
    /// `RenderParams::new`.
    pub fn new(width: usize, height: usize, zoom: f64) -> PlaneMapper {
        PlaneMapper {
            center: ((width as f64) / 2.0, (height as f64) / 2.0),
            zoom,
        }
    }

    /// Given a pixel of the full image, return its location on the
    /// complex plane, before any pan offset is applied.
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        Complex::new(
            ((pixel.0 as f64) - self.center.0) / self.zoom,
            ((pixel.1 as f64) - self.center.1) / self.zoom,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_pixel_maps_to_origin() {
        let pm = PlaneMapper::new(100, 80, 35.0);
        assert_eq!(pm.pixel_to_point(&Pixel(50, 40)), Complex::new(0.0, 0.0));
    }

    #[test]
    fn odd_sizes_have_fractional_centers() {
        let pm = PlaneMapper::new(5, 3, 1.0);
        assert_eq!(pm.pixel_to_point(&Pixel(0, 0)), Complex::new(-2.5, -1.5));
        assert_eq!(pm.pixel_to_point(&Pixel(4, 2)), Complex::new(1.5, 0.5));
    }

    #[test]
    fn zoom_scales_distance_from_center() {
        let pm = PlaneMapper::new(640, 480, 160.0);
        assert_eq!(pm.pixel_to_point(&Pixel(0, 0)), Complex::new(-2.0, -1.5));
        assert_eq!(pm.pixel_to_point(&Pixel(480, 240)), Complex::new(1.0, 0.0));
    }
}
