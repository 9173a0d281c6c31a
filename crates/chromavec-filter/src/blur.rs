//! Gaussian pre-filtering
//!
//! A separable Gaussian blur for 3-channel 8-bit rasters, used to
//! suppress noise ahead of gradient computation. The two 1-D passes run
//! through the parallel filter engine and replicate edge pixels outside
//! the image bounds.

use std::sync::Arc;

use chromavec_core::{ColorVector, PixelGrid, Raster};
use log::debug;

use crate::engine::{self, FilterOperator};
use crate::error::FilterResult;

/// Sigma values below this skip the blur entirely.
pub const SIGMA_EPSILON: f64 = 0.01;

/// Build a normalised 1-D Gaussian kernel covering six sigma, with an
/// odd tap count.
fn gaussian_kernel(sigma: f64) -> Vec<f32> {
    let taps = ((sigma * 6.0).ceil() as usize) | 1;
    let half = (taps / 2) as f64;

    let mut kernel: Vec<f32> = (0..taps)
        .map(|i| {
            let x = i as f64 - half;
            (-x * x / (2.0 * sigma * sigma)).exp() as f32
        })
        .collect();

    let sum: f32 = kernel.iter().sum();
    for tap in kernel.iter_mut() {
        *tap /= sum;
    }

    kernel
}

/// Sampling direction of one separable pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PassAxis {
    Horizontal,
    Vertical,
}

/// One 1-D convolution pass of the separable blur.
#[derive(Debug, Clone)]
struct GaussianPass {
    kernel: Arc<Vec<f32>>,
    axis: PassAxis,
}

impl FilterOperator for GaussianPass {
    type In = u8;
    type Out = u8;
    const IN_CHANNELS: u32 = 3;
    const OUT_CHANNELS: u32 = 3;

    fn eval(&mut self, x: u32, y: u32, src: &PixelGrid<'_, u8>) -> ColorVector<u8> {
        let half = (self.kernel.len() / 2) as i64;

        let mut sum_r = 0.0f32;
        let mut sum_g = 0.0f32;
        let mut sum_b = 0.0f32;

        for (i, &weight) in self.kernel.iter().enumerate() {
            let offset = i as i64 - half;
            let color = match self.axis {
                PassAxis::Horizontal => src.clamped_color(x as i64 + offset, y as i64),
                PassAxis::Vertical => src.clamped_color(x as i64, y as i64 + offset),
            };
            sum_r += color.red as f32 * weight;
            sum_g += color.green as f32 * weight;
            sum_b += color.blue as f32 * weight;
        }

        ColorVector::new(
            sum_r.round().clamp(0.0, 255.0) as u8,
            sum_g.round().clamp(0.0, 255.0) as u8,
            sum_b.round().clamp(0.0, 255.0) as u8,
        )
    }
}

/// Blur a 3-channel 8-bit raster with a Gaussian of the given sigma.
///
/// Output dimensions and encoding match the input; borders are
/// replicated. A sigma below [`SIGMA_EPSILON`] returns an unmodified
/// copy rather than an error.
///
/// # Errors
///
/// Fails if `img` is not a 3-channel 8-bit raster.
pub fn gaussian_blur(img: &Raster<u8>, sigma: f64) -> FilterResult<Raster<u8>> {
    if sigma < SIGMA_EPSILON {
        return Ok(img.clone());
    }

    let kernel = Arc::new(gaussian_kernel(sigma));
    debug!("gaussian blur: sigma {sigma}, {} taps", kernel.len());

    let horizontal = engine::apply(
        img,
        &GaussianPass {
            kernel: Arc::clone(&kernel),
            axis: PassAxis::Horizontal,
        },
    )?;
    engine::apply(
        &horizontal,
        &GaussianPass {
            kernel,
            axis: PassAxis::Vertical,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chromavec_test::{uniform, vertical_step};

    #[test]
    fn test_kernel_is_odd_and_normalised() {
        for sigma in [0.5, 1.0, 1.5, 3.0] {
            let kernel = gaussian_kernel(sigma);
            assert_eq!(kernel.len() % 2, 1, "sigma {sigma}");
            let sum: f32 = kernel.iter().sum();
            assert!((sum - 1.0).abs() < 1e-5, "sigma {sigma} sums to {sum}");
        }
    }

    #[test]
    fn test_tiny_sigma_is_identity() {
        let img = vertical_step(8, 8, [0, 100, 200], [255, 50, 0]);
        let out = gaussian_blur(&img, 0.0).unwrap();
        assert_eq!(out, img);

        let out = gaussian_blur(&img, 0.009).unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn test_uniform_image_unchanged() {
        let img = uniform(16, 16, [37, 81, 164]);
        let out = gaussian_blur(&img, 2.0).unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn test_blur_softens_a_step() {
        let img = vertical_step(16, 8, [0, 0, 0], [255, 255, 255]);
        let out = gaussian_blur(&img, 1.5).unwrap();

        assert_eq!(out.width(), img.width());
        assert_eq!(out.height(), img.height());

        // Pixels adjacent to the boundary move toward the middle
        let near_edge = out.pixel(7, 4)[0];
        assert!(near_edge > 0 && near_edge < 255, "got {near_edge}");

        // Far corners keep their tone thanks to border replication
        assert_eq!(out.pixel(0, 0)[0], 0);
        assert_eq!(out.pixel(15, 7)[0], 255);
    }
}
