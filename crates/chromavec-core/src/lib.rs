//! chromavec-core - Data structures for colour-vector image filtering
//!
//! This crate provides the fundamental types used throughout the
//! chromavec library:
//!
//! - [`ColorVector`] - A three-channel colour value with overflow-safe
//!   distance arithmetic
//! - [`Raster`] / [`PixelGrid`] - The image container and its read-only
//!   borrowed view
//! - [`Roi`] - A clamped, border-safe filtering window
//! - [`PixelEncoding`] - The closed table of supported pixel layouts

pub mod error;
pub mod raster;
pub mod roi;
pub mod vector;

pub use error::{Error, Result};
pub use raster::{Element, ElementKind, PixelEncoding, PixelGrid, Raster};
pub use roi::Roi;
pub use vector::{Channel, ColorVector, MAX_DISTANCE, MAX_DISTANCE_SQ, Magnitude};

/// Colour channel indices and HSV conversion.
pub mod color {
    /// Red channel index
    pub const RED: usize = 0;
    /// Green channel index
    pub const GREEN: usize = 1;
    /// Blue channel index
    pub const BLUE: usize = 2;

    /// Convert HSV to RGB.
    ///
    /// All components are in [0, 255]; hue 0..=255 spans 0..360 degrees
    /// (h = 0 and h = 256 would coincide at red).
    pub fn hsv_to_rgb(h: u8, s: u8, v: u8) -> (u8, u8, u8) {
        if s == 0 {
            return (v, v, v);
        }

        let hf = h as f32 * 6.0 / 256.0;
        let i = hf as i32;
        let f = hf - i as f32;
        let sf = s as f32 / 255.0;
        let vf = v as f32;

        let x = (vf * (1.0 - sf) + 0.5) as u8;
        let y = (vf * (1.0 - sf * f) + 0.5) as u8;
        let z = (vf * (1.0 - sf * (1.0 - f)) + 0.5) as u8;

        match i {
            0 => (v, z, x),
            1 => (y, v, x),
            2 => (x, v, z),
            3 => (x, y, v),
            4 => (z, x, v),
            _ => (v, x, y),
        }
    }

}
