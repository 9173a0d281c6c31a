//! Vector range filtering
//!
//! The vector range of a window is the distance between its most central
//! colour (smallest summed distance to the rest of the window, as in the
//! vector median) and its least central colour (largest summed
//! distance). Homogeneous regions produce a small range, regions
//! straddling a colour edge a large one, so the output is a grayscale
//! edge-strength map.

use chromavec_core::{ColorVector, MAX_DISTANCE, PixelGrid, Raster, Roi};

use crate::engine::{self, FilterOperator};
use crate::error::FilterResult;

/// Vector range filter operator.
#[derive(Debug, Clone)]
pub struct VectorRange {
    width: u32,
}

impl VectorRange {
    /// Create a vector range operator with the given window width.
    ///
    /// # Errors
    ///
    /// Fails unless the width is odd and at least 3.
    pub fn new(width: u32) -> FilterResult<Self> {
        engine::check_window(width)?;
        Ok(Self { width })
    }
}

impl FilterOperator for VectorRange {
    type In = u8;
    type Out = u8;
    const IN_CHANNELS: u32 = 3;
    const OUT_CHANNELS: u32 = 1;

    fn eval(&mut self, x: u32, y: u32, src: &PixelGrid<'_, u8>) -> ColorVector<u8> {
        let window = Roi::new(*src, x, y, self.width).unwrap();
        let width = window.width();
        let height = window.height();

        let mut min_total = i64::MAX;
        let mut max_total: i64 = 0;
        let mut min_color = window.color(0, 0);
        let mut max_color = window.color(0, 0);

        for yi in 0..height {
            for xi in 0..width {
                let pi = window.color(xi, yi);
                let mut total: i64 = 0;
                for yj in 0..height {
                    for xj in 0..width {
                        total += pi.squared_distance(&window.color(xj, yj)) as i64;
                    }
                }

                if total < min_total {
                    min_total = total;
                    min_color = pi;
                }
                if total > max_total {
                    max_total = total;
                    max_color = pi;
                }
            }
        }

        // Output is the distance between the two extreme colours, scaled
        // onto [0, 255] by the largest possible colour distance.
        let sqdist = min_color.squared_distance(&max_color);
        let value = (255.0 * (sqdist as f64).sqrt() / MAX_DISTANCE as f64) as u8;

        ColorVector::new(value, value, value)
    }
}

/// Apply the vector range filter, producing a grayscale edge map.
///
/// # Errors
///
/// Fails on an invalid window width or if `img` is not a 3-channel
/// 8-bit raster.
pub fn vector_range_filter(img: &Raster<u8>, window: u32) -> FilterResult<Raster<u8>> {
    engine::apply(img, &VectorRange::new(window)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chromavec_test::{uniform, vertical_step};

    #[test]
    fn test_window_validation() {
        assert!(VectorRange::new(5).is_ok());
        assert!(VectorRange::new(6).is_err());
        assert!(VectorRange::new(0).is_err());
    }

    #[test]
    fn test_uniform_image_zero_response() {
        let img = uniform(9, 9, [120, 40, 200]);
        let out = vector_range_filter(&img, 3).unwrap();
        assert_eq!(out.channels(), 1);
        assert!(out.data().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_high_response_on_edge() {
        // Maximal two-tone contrast across a vertical boundary
        let img = vertical_step(10, 6, [0, 0, 0], [255, 255, 255]);
        let out = vector_range_filter(&img, 3).unwrap();

        // Windows straddling the boundary see both tones at full distance
        let on_edge = out.pixel(5, 3)[0];
        assert!(on_edge > 250, "edge response {on_edge} too weak");

        // Windows far from the boundary see one tone only
        assert_eq!(out.pixel(0, 3)[0], 0);
        assert_eq!(out.pixel(9, 3)[0], 0);
    }
}
