//! Error types for hemingway.

use thiserror::Error;

/// Errors that can occur while building, mutating, or querying an index.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LshError {
    /// Vector length disagrees with the fixed dimensionality of a table,
    /// mask, or the other operand.
    #[error("dimension mismatch: expected {expected} dimensions, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Bit index past the end of a vector.
    #[error("index {index} out of range for vector of {len} bits")]
    IndexOutOfRange { index: usize, len: usize },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl LshError {
    /// Check that `actual` matches `expected`, producing a
    /// [`LshError::DimensionMismatch`] otherwise.
    pub(crate) fn check_dimensions(expected: usize, actual: usize) -> Result<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(LshError::DimensionMismatch { expected, actual })
        }
    }
}

pub type Result<T> = std::result::Result<T, LshError>;
