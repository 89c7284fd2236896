// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Raw inference output tensors.
//!
//! A [`RawTensor`] is what the inference black box hands back: a declared
//! shape plus a flat, row-major buffer of signed 32-bit values. Nothing here
//! checks that the buffer actually covers the shape. That check belongs to the
//! consumer, which reports a mismatch as an error instead of reading past the
//! end of the buffer.

use crate::error::{SegmapDataError, SegmapResult};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Ordered dimension sizes of a tensor, outermost first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TensorShape {
    dims: Vec<usize>,
}

impl TensorShape {
    pub fn new(dims: Vec<usize>) -> Self {
        TensorShape { dims }
    }

    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Product of all dimensions, or `None` on overflow. A rank 0 shape has 1 element.
    pub fn element_count(&self) -> Option<usize> {
        self.dims
            .iter()
            .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
    }

    /// The leading two dimensions as `(rows, cols)`.
    ///
    /// Trailing dimensions are ignored. Fails if the rank is below 2, if either
    /// leading dimension is zero, or if `rows * cols` does not fit in `usize`.
    pub fn spatial_dimensions(&self) -> SegmapResult<(usize, usize)> {
        if self.rank() < 2 {
            return Err(SegmapDataError::Shape(format!(
                "Grid decoding requires a tensor of rank 2 or more, got shape {}",
                self
            )));
        }
        let rows = self.dims[0];
        let cols = self.dims[1];
        if rows == 0 || cols == 0 {
            return Err(SegmapDataError::Shape(format!(
                "Tensor spatial dimensions cannot be zero, got shape {}",
                self
            )));
        }
        if rows.checked_mul(cols).is_none() {
            return Err(SegmapDataError::Shape(format!(
                "Tensor spatial dimensions {}x{} overflow the addressable element count",
                rows, cols
            )));
        }
        Ok((rows, cols))
    }
}

impl From<Vec<usize>> for TensorShape {
    fn from(dims: Vec<usize>) -> Self {
        TensorShape::new(dims)
    }
}

impl From<&[usize]> for TensorShape {
    fn from(dims: &[usize]) -> Self {
        TensorShape::new(dims.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for TensorShape {
    fn from(dims: [usize; N]) -> Self {
        TensorShape::new(dims.to_vec())
    }
}

impl Display for TensorShape {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.dims)
    }
}

/// Signed 32-bit inference output with a declared shape and flat row-major storage.
///
/// # Example
/// ```
/// use segmap_structures::RawTensor;
///
/// let tensor = RawTensor::new(vec![2, 2], vec![0, 29, -1, 58]);
/// assert_eq!(tensor.shape().dims(), &[2, 2]);
/// assert_eq!(tensor.get(2), Some(-1));
/// assert_eq!(tensor.get(4), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTensor {
    shape: TensorShape,
    data: Vec<i32>,
}

impl RawTensor {
    //region Constructors

    /// Wraps an owned buffer. The buffer length is not checked against the shape.
    pub fn new(shape: impl Into<TensorShape>, data: Vec<i32>) -> Self {
        RawTensor {
            shape: shape.into(),
            data,
        }
    }

    /// Builds a tensor from the little-endian `i32` memory of a model output.
    pub fn from_le_bytes(shape: impl Into<TensorShape>, bytes: &[u8]) -> SegmapResult<Self> {
        const ELEMENT_SIZE: usize = std::mem::size_of::<i32>();
        if bytes.len() % ELEMENT_SIZE != 0 {
            return Err(SegmapDataError::ModelOutputMismatch(format!(
                "Expected a buffer of 32-bit elements, got {} bytes which is not a multiple of {}",
                bytes.len(),
                ELEMENT_SIZE
            )));
        }
        let data = bytes
            .chunks_exact(ELEMENT_SIZE)
            .map(|chunk| i32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect();
        Ok(RawTensor::new(shape, data))
    }

    //endregion

    //region Properties

    pub fn shape(&self) -> &TensorShape {
        &self.shape
    }

    pub fn data(&self) -> &[i32] {
        &self.data
    }

    /// Number of elements actually present in the buffer
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bounds-checked read of the element at a flat offset
    pub fn get(&self, index: usize) -> Option<i32> {
        self.data.get(index).copied()
    }

    //endregion
}

impl Display for RawTensor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "RawTensor(shape: {}, elements: {})", self.shape, self.data.len())
    }
}
