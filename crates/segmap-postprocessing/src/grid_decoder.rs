// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Decoding of raw segmentation output into class grids.
//!
//! The segmentation model emits one signed 32-bit class id per pixel. Values
//! outside the taxonomy (sentinels, garbage from a mismatched model) are folded
//! back into a valid class with true modulo so a single bad value never fails
//! a whole frame. A buffer that is too short for its declared shape does fail,
//! with [`SegmapDataError::BufferUnderrun`].

use crate::numeric::{reduce_class_index, MAX_CLASS_COUNT};
use ndarray::Array2;
use segmap_structures::{ClassGrid, RawTensor, SegmapDataError, SegmapResult, NUM_CLASSES};
use tracing::debug;

/// Converts a [`RawTensor`] into a [`ClassGrid`].
///
/// Only the leading two dimensions of the tensor are decoded, as `(rows, cols)`;
/// trailing dimensions are ignored. The decoder holds no state beyond its class
/// count and can be shared freely between threads.
///
/// # Example
/// ```
/// use segmap_postprocessing::GridDecoder;
/// use segmap_structures::RawTensor;
///
/// let tensor = RawTensor::new(vec![2, 2], vec![0, 29, -1, 58]);
/// let grid = GridDecoder::new().decode(&tensor).unwrap();
/// assert_eq!(grid.to_rows(), vec![vec![0, 0], vec![28, 0]]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridDecoder {
    class_count: usize,
}

impl GridDecoder {
    /// A decoder for the standard 29-class taxonomy
    pub fn new() -> Self {
        GridDecoder {
            class_count: NUM_CLASSES,
        }
    }

    /// A decoder for a taxonomy of a different size. Cells are stored as `u8`,
    /// so at most 256 classes are supported.
    pub fn with_class_count(class_count: usize) -> SegmapResult<Self> {
        if class_count == 0 || class_count > MAX_CLASS_COUNT {
            return Err(SegmapDataError::Shape(format!(
                "Class count must be between 1 and {}, got {}",
                MAX_CLASS_COUNT, class_count
            )));
        }
        Ok(GridDecoder { class_count })
    }

    pub fn class_count(&self) -> usize {
        self.class_count
    }

    /// Decodes the tensor into a freshly allocated grid.
    ///
    /// # Errors
    /// * [`SegmapDataError::Shape`] if the rank is below 2 or a leading dimension is zero
    /// * [`SegmapDataError::BufferUnderrun`] if the buffer holds fewer than `rows * cols` elements
    pub fn decode(&self, tensor: &RawTensor) -> SegmapResult<ClassGrid> {
        let (rows, cols) = tensor.shape().spatial_dimensions()?;
        let required = rows * cols; // overflow already rejected by spatial_dimensions

        let data = tensor.data();
        let cells = data.get(..required).ok_or(SegmapDataError::BufferUnderrun {
            required,
            available: data.len(),
        })?;

        let reduced: Vec<u8> = cells
            .iter()
            .map(|&value| reduce_class_index(value, self.class_count))
            .collect::<Option<_>>()
            .ok_or_else(|| {
                SegmapDataError::Shape(format!("Unsupported class count {}", self.class_count))
            })?;

        let array = Array2::from_shape_vec((rows, cols), reduced)
            .map_err(|e| SegmapDataError::Shape(e.to_string()))?;
        let grid = ClassGrid::new(array, self.class_count)?;

        let (min, max) = grid.value_range();
        debug!(
            "Decoded {}x{} class grid from tensor {} (classes {}..={})",
            rows,
            cols,
            tensor.shape(),
            min,
            max
        );
        Ok(grid)
    }
}

impl Default for GridDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Decodes with the standard 29-class taxonomy
pub fn decode_class_grid(tensor: &RawTensor) -> SegmapResult<ClassGrid> {
    GridDecoder::new().decode(tensor)
}
