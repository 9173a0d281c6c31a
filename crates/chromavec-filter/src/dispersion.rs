//! Minimum vector dispersion filtering
//!
//! An edge detector built on vector order statistics. For each window
//! the pixels are ranked by their summed squared distance to the rest of
//! the window; the `l` most central colours are averaged into a
//! reference, and the output is the smallest distance from any of the
//! `k` least central pixels to that reference. A true edge leaves even
//! its best-behaved outlier far from the window consensus, while
//! isolated noise does not, so the response separates edges from
//! impulse noise better than the plain vector range.

use chromavec_core::{ColorVector, MAX_DISTANCE, MAX_DISTANCE_SQ, PixelGrid, Raster, Roi};

use crate::engine::{self, FilterOperator};
use crate::error::{FilterError, FilterResult};

/// Minimum vector dispersion filter operator.
///
/// Carries per-instance scratch buffers for the window distance ranking;
/// the engine clones the operator per band, so the buffers are never
/// shared.
#[derive(Debug, Clone)]
pub struct MinVectorDispersion {
    width: u32,
    k: u32,
    l: u32,
    distances: Vec<i64>,
    indices: Vec<u32>,
}

impl MinVectorDispersion {
    /// Create a minimum vector dispersion operator.
    ///
    /// `k` controls the sensitivity to edges and `l` the amount of
    /// pre-smoothing; both must lie in `[1, N)` where `N` is the number
    /// of pixels in the full window.
    ///
    /// # Errors
    ///
    /// Fails if the width is not odd and at least 3, or if `k` or `l`
    /// falls outside `[1, N)`.
    pub fn new(width: u32, k: u32, l: u32) -> FilterResult<Self> {
        engine::check_window(width)?;

        let n = width * width;
        if k < 1 || l < 1 {
            return Err(FilterError::InvalidParameters(
                "'k' and 'l' must be non-zero".into(),
            ));
        }
        if k >= n || l >= n {
            return Err(FilterError::InvalidParameters(format!(
                "'k' and 'l' must be smaller than the {n} pixels in the filter window"
            )));
        }

        Ok(Self {
            width,
            k,
            l,
            distances: vec![0; n as usize],
            indices: vec![0; n as usize],
        })
    }
}

impl FilterOperator for MinVectorDispersion {
    type In = u8;
    type Out = u8;
    const IN_CHANNELS: u32 = 3;
    const OUT_CHANNELS: u32 = 1;

    fn eval(&mut self, x: u32, y: u32, src: &PixelGrid<'_, u8>) -> ColorVector<u8> {
        let window = Roi::new(*src, x, y, self.width).unwrap();
        let width = window.width();
        let height = window.height();

        // Number of pixels actually inside the clamped window.
        let n = (width * height) as usize;

        let mut i = 0;
        for yi in 0..height {
            for xi in 0..width {
                let pi = window.color(xi, yi);
                let mut total: i64 = 0;
                for yj in 0..height {
                    for xj in 0..width {
                        total += pi.squared_distance(&window.color(xj, yj)) as i64;
                    }
                }
                self.distances[i] = total;
                i += 1;
            }
        }

        // Rank the window pixels by total distance, most central first.
        let distances = &self.distances;
        let indices = &mut self.indices[..n];
        for (j, slot) in indices.iter_mut().enumerate() {
            *slot = j as u32;
        }
        indices.sort_by_key(|&j| distances[j as usize]);

        // Clamped corner windows can hold fewer than l (or k) pixels.
        let l = (self.l as usize).min(n);
        let k = (self.k as usize).min(n);

        // Average the l most central colours into the reference colour.
        let mut sum_r: u32 = 0;
        let mut sum_g: u32 = 0;
        let mut sum_b: u32 = 0;
        for &j in &indices[..l] {
            let pixel = window.get(j);
            sum_r += pixel[0] as u32;
            sum_g += pixel[1] as u32;
            sum_b += pixel[2] as u32;
        }
        let mean = ColorVector::new(
            (sum_r / l as u32) as u8,
            (sum_g / l as u32) as u8,
            (sum_b / l as u32) as u8,
        );

        // The response is the closest approach of the k least central
        // colours to the reference.
        let mut min_dist = MAX_DISTANCE_SQ;
        for &j in &indices[n - k..] {
            let sqdist = window.color_at(j).squared_distance(&mean);
            min_dist = min_dist.min(sqdist);
        }

        let value = (255.0 * (min_dist as f64).sqrt() / MAX_DISTANCE as f64) as u8;
        ColorVector::new(value, value, value)
    }
}

/// Apply the minimum vector dispersion filter, producing a grayscale
/// edge map.
///
/// # Errors
///
/// Fails on invalid parameters or if `img` is not a 3-channel 8-bit
/// raster.
pub fn minimum_vector_dispersion_filter(
    img: &Raster<u8>,
    k: u32,
    l: u32,
    window: u32,
) -> FilterResult<Raster<u8>> {
    engine::apply(img, &MinVectorDispersion::new(window, k, l)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chromavec_test::{uniform, vertical_step};

    #[test]
    fn test_parameter_validation() {
        // Even window width
        assert!(MinVectorDispersion::new(4, 3, 4).is_err());

        // k and l anywhere in [1, N) with N = 25
        assert!(MinVectorDispersion::new(5, 10, 1).is_ok());
        assert!(MinVectorDispersion::new(5, 24, 24).is_ok());

        // k = N is out of range
        assert!(MinVectorDispersion::new(5, 25, 1).is_err());
        assert!(MinVectorDispersion::new(5, 1, 25).is_err());

        // Zero is out of range
        assert!(MinVectorDispersion::new(5, 0, 1).is_err());
        assert!(MinVectorDispersion::new(5, 1, 0).is_err());
    }

    #[test]
    fn test_uniform_image_zero_response() {
        let img = uniform(9, 9, [10, 220, 160]);
        let out = minimum_vector_dispersion_filter(&img, 3, 4, 5).unwrap();
        assert!(out.data().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_edge_response_exceeds_flat_response() {
        let img = vertical_step(12, 8, [20, 20, 20], [235, 235, 235]);
        let out = minimum_vector_dispersion_filter(&img, 3, 4, 5).unwrap();

        let on_edge = out.pixel(6, 4)[0];
        let off_edge = out.pixel(0, 4)[0];
        assert!(
            on_edge > off_edge + 100,
            "edge {on_edge} vs flat {off_edge}"
        );
    }

    #[test]
    fn test_corner_windows_are_safe() {
        // A 5x5 request at the corner clamps to 3x3 = 9 pixels, smaller
        // than k = 10; the filter must still produce output there.
        let img = uniform(8, 8, [128, 128, 128]);
        let out = minimum_vector_dispersion_filter(&img, 10, 1, 5).unwrap();
        assert_eq!(out.pixel(0, 0)[0], 0);
        assert_eq!(out.pixel(7, 7)[0], 0);
    }
}
