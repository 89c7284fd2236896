// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types shared by all segmap data operations.

use thiserror::Error;

/// Common error type for segmap data operations.
///
/// Every failure of the decoding pipeline is reported to the immediate caller
/// through this type. Nothing in the core retries or swallows an error.
///
/// # Examples
/// ```
/// use segmap_structures::{RawTensor, SegmapDataError};
///
/// fn check_rank(tensor: &RawTensor) -> Result<(), SegmapDataError> {
///     if tensor.shape().rank() < 2 {
///         return Err(SegmapDataError::Shape("rank must be at least 2".into()));
///     }
///     Ok(())
/// }
///
/// assert!(check_rank(&RawTensor::new(vec![4], vec![0; 4])).is_err());
/// assert!(check_rank(&RawTensor::new(vec![2, 2], vec![0; 4])).is_ok());
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SegmapDataError {
    /// Tensor rank is too small, a dimension is zero, or the shape overflows
    #[error("Shape error: {0}")]
    Shape(String),

    /// The declared shape needs more elements than the buffer holds
    #[error("Buffer underrun: shape requires {required} elements but buffer holds {available}")]
    BufferUnderrun { required: usize, available: usize },

    /// The model produced output that does not match the expected layout
    #[error("Model output mismatch: {0}")]
    ModelOutputMismatch(String),
}

impl SegmapDataError {
    /// True for errors caused by the shape declaration itself rather than the data
    pub fn is_shape_error(&self) -> bool {
        matches!(self, SegmapDataError::Shape(_))
    }
}

/// Result type for segmap data operations
pub type SegmapResult<T> = Result<T, SegmapDataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_underrun_message_names_both_counts() {
        let err = SegmapDataError::BufferUnderrun {
            required: 100,
            available: 50,
        };
        let msg = err.to_string();
        assert!(msg.contains("100"));
        assert!(msg.contains("50"));
        assert!(!err.is_shape_error());
    }

    #[test]
    fn test_shape_error_is_shape_error() {
        assert!(SegmapDataError::Shape("rank 1".into()).is_shape_error());
        assert!(!SegmapDataError::ModelOutputMismatch("x".into()).is_shape_error());
    }
}
