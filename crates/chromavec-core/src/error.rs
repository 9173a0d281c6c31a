//! Error types for chromavec-core
//!
//! Provides a unified error type for the core data structures. Each
//! variant captures enough context for diagnostics without exposing
//! internal implementation details.

use thiserror::Error;

/// chromavec core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid raster dimensions
    #[error("invalid raster dimensions: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// Unsupported channel count
    #[error("unsupported channel count: {0} (must be 1 or 3)")]
    UnsupportedChannels(u32),

    /// Buffer length does not match the raster geometry
    #[error("buffer length mismatch: expected {expected} elements, got {actual}")]
    BufferLength { expected: usize, actual: usize },

    /// Window centre placed outside the image
    #[error("window centre ({x}, {y}) lies outside the {width}x{height} image")]
    CentreOutsideImage {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    /// Index out of bounds
    #[error("index out of bounds: {index} >= {len}")]
    IndexOutOfBounds { index: usize, len: usize },
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;
