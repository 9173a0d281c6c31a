//! Error types for chromavec-filter

use chromavec_core::PixelEncoding;
use thiserror::Error;

/// Errors that can occur during filtering operations
#[derive(Debug, Error)]
pub enum FilterError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] chromavec_core::Error),

    /// Invalid filter parameters, raised at operator construction
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// Source raster layout does not match the operator's contract,
    /// raised at engine entry before any pixel is processed
    #[error("encoding mismatch: operator expects {expected:?}, got {actual:?}")]
    EncodingMismatch {
        /// Layout the operator declares
        expected: PixelEncoding,
        /// Layout of the supplied raster
        actual: PixelEncoding,
    },
}

/// Result type for filter operations
pub type FilterResult<T> = Result<T, FilterError>;
