//! Vector median filtering
//!
//! The vector median of a window is the window pixel whose summed
//! squared colour distance to every other window pixel is smallest (the
//! medoid). Unlike a per-channel scalar median it never synthesizes a
//! colour: the output at every position is one of the input colours in
//! that position's window. This makes it a strong impulse-noise
//! suppressor for colour images.

use chromavec_core::{ColorVector, PixelGrid, Raster, Roi};

use crate::engine::{self, FilterOperator};
use crate::error::FilterResult;

/// Vector median filter operator.
#[derive(Debug, Clone)]
pub struct VectorMedian {
    width: u32,
}

impl VectorMedian {
    /// Create a vector median operator with the given window width.
    ///
    /// # Errors
    ///
    /// Fails unless the width is odd and at least 3.
    pub fn new(width: u32) -> FilterResult<Self> {
        engine::check_window(width)?;
        Ok(Self { width })
    }
}

impl FilterOperator for VectorMedian {
    type In = u8;
    type Out = u8;
    const IN_CHANNELS: u32 = 3;
    const OUT_CHANNELS: u32 = 3;

    fn eval(&mut self, x: u32, y: u32, src: &PixelGrid<'_, u8>) -> ColorVector<u8> {
        // The engine only evaluates in-bounds centres.
        let window = Roi::new(*src, x, y, self.width).unwrap();
        let width = window.width();
        let height = window.height();

        let mut best = window.color(0, 0);
        let mut best_total = i64::MAX;

        // Two nested scans: the outer one walks every candidate pixel,
        // the inner one totals its squared distances to the rest of the
        // window. The first candidate reaching the minimum total wins.
        for yi in 0..height {
            for xi in 0..width {
                let pi = window.color(xi, yi);
                let mut total: i64 = 0;
                for yj in 0..height {
                    for xj in 0..width {
                        total += pi.squared_distance(&window.color(xj, yj)) as i64;
                    }
                }

                if total < best_total {
                    best_total = total;
                    best = pi;
                }
            }
        }

        best
    }
}

/// Apply the vector median filter.
///
/// # Errors
///
/// Fails on an invalid window width or if `img` is not a 3-channel
/// 8-bit raster.
pub fn vector_median_filter(img: &Raster<u8>, window: u32) -> FilterResult<Raster<u8>> {
    engine::apply(img, &VectorMedian::new(window)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chromavec_test::{salt_noise, uniform};

    #[test]
    fn test_window_validation() {
        assert!(VectorMedian::new(3).is_ok());
        assert!(VectorMedian::new(4).is_err());
        assert!(VectorMedian::new(1).is_err());
    }

    #[test]
    fn test_uniform_image_unchanged() {
        let img = uniform(8, 8, [90, 140, 30]);
        let out = vector_median_filter(&img, 3).unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn test_removes_isolated_impulse() {
        let mut img = uniform(7, 7, [50, 60, 70]);
        img.pixel_mut(3, 3).copy_from_slice(&[255, 0, 255]);

        let out = vector_median_filter(&img, 3).unwrap();
        assert_eq!(out.pixel(3, 3), &[50, 60, 70]);
    }

    #[test]
    fn test_output_colors_come_from_window() {
        let img = salt_noise(11, 9, [80, 80, 80], 40, 77);
        let window = 5;
        let out = vector_median_filter(&img, window).unwrap();

        let grid = img.as_grid();
        for y in 0..img.height() {
            for x in 0..img.width() {
                let roi = Roi::new(grid, x, y, window).unwrap();
                let produced = out.color(x, y);
                let found = (0..roi.len()).any(|i| roi.color_at(i) == produced);
                assert!(found, "output at ({x}, {y}) is not a window colour");
            }
        }
    }

    #[test]
    fn test_wrong_encoding_rejected() {
        let gray: Raster<u8> = Raster::new(4, 4, 1).unwrap();
        assert!(vector_median_filter(&gray, 3).is_err());
    }
}
