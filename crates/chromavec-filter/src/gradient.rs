//! Colour gradient computation
//!
//! The gradient at a pixel is found by comparing the colours of opposite
//! neighbours along four orientations. Because the response is a vector
//! norm there is no preferred direction *across* an edge, but the
//! orientation of maximum response is always perpendicular to the edge
//! itself. The output is polar: an angle bucket and a magnitude per
//! pixel, ready for non-maximum suppression or visualisation.

use chromavec_core::{ColorVector, MAX_DISTANCE, PixelGrid, Raster, color};

use crate::blur::gaussian_blur;
use crate::engine::{self, FilterOperator};
use crate::error::FilterResult;

/// Gradient angle buckets, in the order they are tested.
const ANGLES: [i32; 4] = [0, 90, 45, 135];

/// Sampling offsets for each angle bucket.
const OFFSETS: [(i64, i64); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

/// Scale a gradient magnitude in [0, 441] onto [0, 255].
#[inline]
pub(crate) fn magnitude_to_byte(magnitude: i32) -> u8 {
    (255.0 * magnitude as f64 / MAX_DISTANCE as f64) as u8
}

/// Per-pixel colour gradient operator.
///
/// Samples the colour difference across the centre pixel along four
/// orientations, with edge pixels replicated outside the bounds:
///
/// ```text
///   0-deg    90-deg    45-deg    135-deg
///   o o o    o + o     o o +     - o o
///   - x +    o x o     o x o     o x o
///   o o o    o - o     - o o     o o +
/// ```
///
/// The cardinal directions are tested first, so a diagonal must respond
/// strictly more to win. Output red is the winning angle in degrees,
/// green the magnitude (the Euclidean colour distance, in [0, 441]),
/// blue unused.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColourGradient;

impl FilterOperator for ColourGradient {
    type In = u8;
    type Out = i32;
    const IN_CHANNELS: u32 = 3;
    const OUT_CHANNELS: u32 = 3;

    fn eval(&mut self, x: u32, y: u32, src: &PixelGrid<'_, u8>) -> ColorVector<i32> {
        let mut max_index = 0;
        let mut max_grad = 0;

        for (i, &(dx, dy)) in OFFSETS.iter().enumerate() {
            let p1 = src.clamped_color(x as i64 + dx, y as i64 + dy);
            let p2 = src.clamped_color(x as i64 - dx, y as i64 - dy);
            let grad = (p1.squared_distance(&p2) as f64).sqrt() as i32;

            if grad > max_grad {
                max_grad = grad;
                max_index = i;
            }
        }

        ColorVector::new(ANGLES[max_index], max_grad, 0)
    }
}

/// Re-encode a polar gradient pixel as HSV.
///
/// The hue stores the angle bucket exactly (`255 * angle / 360`, so the
/// four buckets stay distinguishable), saturation is full, and the value
/// is the magnitude rescaled onto [0, 255].
#[derive(Debug, Clone, Copy, Default)]
pub struct GradientToHsv;

impl FilterOperator for GradientToHsv {
    type In = i32;
    type Out = u8;
    const IN_CHANNELS: u32 = 3;
    const OUT_CHANNELS: u32 = 3;

    fn eval(&mut self, x: u32, y: u32, src: &PixelGrid<'_, i32>) -> ColorVector<u8> {
        let polar = src.color(x, y);
        ColorVector::new(
            (255 * polar.red / 360) as u8,
            255,
            magnitude_to_byte(polar.green),
        )
    }
}

/// Convert an HSV-encoded pixel to RGB for viewing.
#[derive(Debug, Clone, Copy, Default)]
pub struct HsvToRgb;

impl FilterOperator for HsvToRgb {
    type In = u8;
    type Out = u8;
    const IN_CHANNELS: u32 = 3;
    const OUT_CHANNELS: u32 = 3;

    fn eval(&mut self, x: u32, y: u32, src: &PixelGrid<'_, u8>) -> ColorVector<u8> {
        let hsv = src.color(x, y);
        let (r, g, b) = color::hsv_to_rgb(hsv.red, hsv.green, hsv.blue);
        ColorVector::new(r, g, b)
    }
}

/// Extract the gradient magnitude as an 8-bit grayscale value.
#[derive(Debug, Clone, Copy, Default)]
pub struct GradientMagnitude;

impl FilterOperator for GradientMagnitude {
    type In = i32;
    type Out = u8;
    const IN_CHANNELS: u32 = 3;
    const OUT_CHANNELS: u32 = 1;

    fn eval(&mut self, x: u32, y: u32, src: &PixelGrid<'_, i32>) -> ColorVector<u8> {
        let value = magnitude_to_byte(src.color(x, y).green);
        ColorVector::new(value, value, value)
    }
}

/// Gradient output modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GradientMode {
    /// The raw polar gradient image
    DirectOutput,
    /// A grayscale magnitude image
    MagnitudeOnly,
    /// An RGB visualisation with hue from the angle and brightness from
    /// the magnitude
    #[default]
    ToHsv,
}

/// Result of [`colour_vector_gradient_filter`], shaped by the requested
/// mode.
#[derive(Debug, Clone, PartialEq)]
pub enum GradientImage {
    /// Polar gradient: red = angle bucket, green = magnitude
    Direct(Raster<i32>),
    /// Single-channel magnitude
    Magnitude(Raster<u8>),
    /// RGB visualisation
    Hsv(Raster<u8>),
}

/// Compute colour edge gradients.
///
/// The image is first smoothed with a Gaussian of the given sigma
/// (skipped entirely below `0.01`), then the per-pixel polar gradient is
/// computed and re-encoded according to `mode`.
///
/// # Errors
///
/// Fails if `img` is not a 3-channel 8-bit raster.
pub fn colour_vector_gradient_filter(
    img: &Raster<u8>,
    sigma: f64,
    mode: GradientMode,
) -> FilterResult<GradientImage> {
    let filtered = gaussian_blur(img, sigma)?;
    let gradient = engine::apply(&filtered, &ColourGradient)?;

    match mode {
        GradientMode::DirectOutput => Ok(GradientImage::Direct(gradient)),
        GradientMode::MagnitudeOnly => Ok(GradientImage::Magnitude(engine::apply(
            &gradient,
            &GradientMagnitude,
        )?)),
        GradientMode::ToHsv => {
            let hsv = engine::apply(&gradient, &GradientToHsv)?;
            Ok(GradientImage::Hsv(engine::apply(&hsv, &HsvToRgb)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chromavec_test::{horizontal_step, uniform, vertical_step};

    fn direct(img: &Raster<u8>) -> Raster<i32> {
        match colour_vector_gradient_filter(img, 0.0, GradientMode::DirectOutput).unwrap() {
            GradientImage::Direct(g) => g,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_vertical_step_has_horizontal_gradient() {
        // Colour changes along x, so the 0-degree orientation wins
        let img = vertical_step(12, 8, [0, 0, 0], [255, 255, 255]);
        let grad = direct(&img);

        for y in 1..7 {
            let polar = grad.color(5, y);
            assert_eq!(polar.red, 0, "angle at (5, {y})");
            assert_eq!(polar.green, MAX_DISTANCE, "magnitude at (5, {y})");
        }
    }

    #[test]
    fn test_horizontal_step_has_vertical_gradient() {
        // Colour changes along y, so the 90-degree bucket wins at every
        // interior pixel of the boundary rows
        let img = horizontal_step(8, 12, [10, 200, 60], [240, 20, 180]);
        let grad = direct(&img);

        for x in 1..7 {
            let above = grad.color(x, 5);
            let below = grad.color(x, 6);
            assert_eq!(above.red, 90, "angle at ({x}, 5)");
            assert_eq!(below.red, 90, "angle at ({x}, 6)");
            assert!(above.green > 0);
        }
    }

    #[test]
    fn test_uniform_image_zero_magnitude() {
        let img = uniform(9, 9, [77, 77, 77]);
        let grad = direct(&img);
        for y in 0..9 {
            for x in 0..9 {
                assert_eq!(grad.color(x, y).green, 0);
            }
        }
    }

    #[test]
    fn test_magnitude_mode_scales_to_full_range() {
        let img = vertical_step(10, 6, [0, 0, 0], [255, 255, 255]);
        let out = colour_vector_gradient_filter(&img, 0.0, GradientMode::MagnitudeOnly).unwrap();

        let GradientImage::Magnitude(mag) = out else {
            panic!("expected magnitude output");
        };
        assert_eq!(mag.channels(), 1);
        assert_eq!(mag.pixel(4, 3)[0], 255);
        assert_eq!(mag.pixel(0, 0)[0], 0);
    }

    #[test]
    fn test_hsv_hue_preserves_angle_buckets() {
        let mut op = GradientToHsv;
        let mut polar = Raster::<i32>::new(4, 1, 3).unwrap();
        for (i, angle) in [0, 45, 90, 135].into_iter().enumerate() {
            polar
                .pixel_mut(i as u32, 0)
                .copy_from_slice(&[angle, 300, 0]);
        }

        let grid = polar.as_grid();
        let hues: Vec<u8> = (0..4).map(|x| op.eval(x, 0, &grid).red).collect();

        // Each bucket maps to its own hue, exactly
        assert_eq!(hues, vec![0, 31, 63, 95]);
    }

    #[test]
    fn test_hsv_mode_produces_rgb() {
        let img = vertical_step(10, 6, [0, 0, 0], [255, 255, 255]);
        let out = colour_vector_gradient_filter(&img, 0.0, GradientMode::ToHsv).unwrap();

        let GradientImage::Hsv(rgb) = out else {
            panic!("expected HSV visualisation output");
        };
        assert_eq!(rgb.channels(), 3);

        // Hue 0 at full value is pure red on the boundary
        assert_eq!(rgb.color(4, 3), ColorVector::new(255, 0, 0));

        // Zero magnitude renders black
        assert_eq!(rgb.color(0, 0), ColorVector::new(0, 0, 0));
    }
}
