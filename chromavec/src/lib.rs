//! chromavec - Colour filtering with vector order statistics
//!
//! chromavec treats a colour image as a field of vectors in RGB space
//! and filters it with statistics over vector distances, rather than
//! per-channel scalar statistics. It provides:
//!
//! - Vector median filtering (impulse-noise suppression that never
//!   synthesizes a colour)
//! - Vector range and minimum vector dispersion filtering (edge
//!   strength maps)
//! - Colour gradients with magnitude and HSV visualisation modes
//! - A Canny-style edge detector driven by colour gradients
//! - PNG / PNM image I/O
//!
//! # Example
//!
//! ```
//! use chromavec::{Raster, filter};
//!
//! // Remove impulse noise from a colour image with a 5x5 vector median
//! let img: Raster<u8> = Raster::new(64, 64, 3).unwrap();
//! let cleaned = filter::vector_median_filter(&img, 5).unwrap();
//! assert_eq!(cleaned.width(), img.width());
//! ```

// Re-export core types (primary data structures used everywhere)
pub use chromavec_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use chromavec_filter as filter;
pub use chromavec_io as io;
