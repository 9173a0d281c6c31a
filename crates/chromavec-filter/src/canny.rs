//! Canny-style edge detection on colour gradients
//!
//! The detector runs four whole-image stages: colour gradient, thinning
//! by non-maximum suppression, double thresholding into strong / weak /
//! background classes, and an iterative linking pass that promotes weak
//! pixels connected to strong ones. The linking loop repeats until a
//! full pass promotes nothing, then every pixel that never reached the
//! strong class is dropped, leaving a strict binary edge map.

use std::sync::atomic::{AtomicBool, Ordering};

use chromavec_core::{ColorVector, PixelGrid, Raster};
use log::debug;

use crate::blur::gaussian_blur;
use crate::engine::{self, FilterOperator};
use crate::error::FilterResult;

/// Marker value for a strong edge pixel.
const STRONG: u8 = 255;

/// Marker value for a weak edge pixel.
const WEAK: u8 = 127;

/// Thin a polar gradient image by suppressing non-maximal responses.
///
/// The angle selects one of four sampling directions (sector boundaries
/// at 22.5, 67.5 and 112.5 degrees); the pixel keeps its magnitude only
/// if it is at least as large as both neighbours along that direction.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonMaximumSuppression;

impl FilterOperator for NonMaximumSuppression {
    type In = i32;
    type Out = i32;
    const IN_CHANNELS: u32 = 3;
    const OUT_CHANNELS: u32 = 1;

    fn eval(&mut self, x: u32, y: u32, src: &PixelGrid<'_, i32>) -> ColorVector<i32> {
        let polar = src.color(x, y);
        let theta = polar.red as f64;
        let magnitude = polar.green;

        // Sampling direction perpendicular to the edge
        let (dx, dy) = if theta < 22.5 {
            (1, 0)
        } else if theta < 67.5 {
            (1, 1)
        } else if theta < 112.5 {
            (0, 1)
        } else {
            (1, -1)
        };

        let m1 = src.clamped_color(x as i64 + dx, y as i64 + dy).green;
        let m2 = src.clamped_color(x as i64 - dx, y as i64 - dy).green;

        let is_max = m1 <= magnitude && m2 <= magnitude;
        let response = if is_max { magnitude } else { 0 };
        ColorVector::new(response, response, response)
    }
}

/// Classify a magnitude image with a double threshold.
///
/// Magnitudes above the high threshold become strong (255), those above
/// the low threshold weak (127), the rest background (0).
#[derive(Debug, Clone, Copy)]
pub struct HysteresisThreshold {
    low: f32,
    high: f32,
}

impl HysteresisThreshold {
    /// Create a threshold operator from the lower and upper bounds.
    pub fn new(low: f32, high: f32) -> Self {
        Self { low, high }
    }
}

impl FilterOperator for HysteresisThreshold {
    type In = i32;
    type Out = u8;
    const IN_CHANNELS: u32 = 1;
    const OUT_CHANNELS: u32 = 1;

    fn eval(&mut self, x: u32, y: u32, src: &PixelGrid<'_, i32>) -> ColorVector<u8> {
        let magnitude = src.pixel(x, y)[0] as f32;

        let class = if magnitude > self.high {
            STRONG
        } else if magnitude > self.low {
            WEAK
        } else {
            0
        };

        ColorVector::new(class, class, class)
    }
}

/// One linking pass over a classified edge image.
///
/// A weak pixel with a strong pixel anywhere in its 8-neighbourhood
/// (border-clamped) is promoted to strong; everything else passes
/// through. Each promotion raises the shared `modified` flag. The flag
/// only ever moves false to true, and it is read after the pass has
/// fully joined, so a relaxed store from any number of bands is enough.
#[derive(Debug, Clone, Copy)]
pub struct EdgeLink<'a> {
    modified: &'a AtomicBool,
}

impl<'a> EdgeLink<'a> {
    /// Create a linking pass reporting promotions through `modified`.
    pub fn new(modified: &'a AtomicBool) -> Self {
        Self { modified }
    }
}

impl FilterOperator for EdgeLink<'_> {
    type In = u8;
    type Out = u8;
    const IN_CHANNELS: u32 = 1;
    const OUT_CHANNELS: u32 = 1;

    fn eval(&mut self, x: u32, y: u32, src: &PixelGrid<'_, u8>) -> ColorVector<u8> {
        let class = src.pixel(x, y)[0];

        // Background and strong pixels pass through untouched
        if class < WEAK || class == STRONG {
            return ColorVector::new(class, class, class);
        }

        for dy in -1..=1 {
            for dx in -1..=1 {
                let neighbour = src.clamped_color(x as i64 + dx, y as i64 + dy).red;
                if neighbour == STRONG {
                    self.modified.store(true, Ordering::Relaxed);
                    return ColorVector::new(STRONG, STRONG, STRONG);
                }
            }
        }

        ColorVector::new(class, class, class)
    }
}

/// Reduce a classified edge image to strict binary output.
///
/// Weak pixels that were never linked to a strong edge are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct Binarize;

impl FilterOperator for Binarize {
    type In = u8;
    type Out = u8;
    const IN_CHANNELS: u32 = 1;
    const OUT_CHANNELS: u32 = 1;

    fn eval(&mut self, x: u32, y: u32, src: &PixelGrid<'_, u8>) -> ColorVector<u8> {
        let value = if src.pixel(x, y)[0] > WEAK { STRONG } else { 0 };
        ColorVector::new(value, value, value)
    }
}

/// Detect edges using colour gradients.
///
/// `low` and `high` are the hysteresis thresholds on the gradient
/// magnitude; `sigma` controls the Gaussian pre-blur (skipped below
/// `0.01`). The output is a single-channel raster holding 255 on edge
/// pixels and 0 elsewhere.
///
/// The linking loop terminates: every pass either promotes at least one
/// weak pixel or ends the loop, and the number of promotable pixels is
/// finite.
///
/// # Errors
///
/// Fails if `img` is not a 3-channel 8-bit raster.
pub fn colour_canny_edge_detect(
    img: &Raster<u8>,
    low: f32,
    high: f32,
    sigma: f64,
) -> FilterResult<Raster<u8>> {
    let filtered = gaussian_blur(img, sigma)?;

    let gradient = engine::apply(&filtered, &crate::gradient::ColourGradient)?;
    let thinned = engine::apply(&gradient, &NonMaximumSuppression)?;
    let mut edges = engine::apply(&thinned, &HysteresisThreshold::new(low, high))?;

    let mut passes = 0u32;
    loop {
        let modified = AtomicBool::new(false);
        edges = engine::apply(&edges, &EdgeLink::new(&modified))?;
        passes += 1;
        if !modified.load(Ordering::Relaxed) {
            break;
        }
    }
    debug!("edge linking reached a fixed point after {passes} passes");

    engine::apply(&edges, &Binarize)
}
