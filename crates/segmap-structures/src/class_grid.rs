// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Decoded 2D class maps.

use crate::error::{SegmapDataError, SegmapResult};
use ndarray::Array2;
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// A 2D grid of class indices, row-major, every cell below `class_count`.
///
/// Grids are created fresh by a decoder and owned by the caller afterwards.
/// The cell bound is checked once on construction and cannot be broken later
/// since the grid exposes no mutable access.
///
/// # Example
/// ```
/// use ndarray::array;
/// use segmap_structures::ClassGrid;
///
/// let grid = ClassGrid::new(array![[0, 0], [28, 0]], 29).unwrap();
/// assert_eq!(grid.rows(), 2);
/// assert_eq!(grid.get(1, 0), Some(28));
/// assert_eq!(grid.unique_classes(), vec![0, 28]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassGrid {
    cells: Array2<u8>,
    class_count: usize,
}

impl ClassGrid {
    pub fn new(cells: Array2<u8>, class_count: usize) -> SegmapResult<ClassGrid> {
        if cells.nrows() == 0 || cells.ncols() == 0 {
            return Err(SegmapDataError::Shape("Class grid cannot be empty!".into()));
        }
        if let Some(bad) = cells.iter().find(|&&cell| cell as usize >= class_count) {
            return Err(SegmapDataError::ModelOutputMismatch(format!(
                "Class index {} is outside the taxonomy of {} classes",
                bad, class_count
            )));
        }
        Ok(ClassGrid { cells, class_count })
    }

    //region Properties

    pub fn rows(&self) -> usize {
        self.cells.nrows()
    }

    pub fn cols(&self) -> usize {
        self.cells.ncols()
    }

    pub fn class_count(&self) -> usize {
        self.class_count
    }

    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        self.cells.get((row, col)).copied()
    }

    pub fn as_array(&self) -> &Array2<u8> {
        &self.cells
    }

    pub fn into_array(self) -> Array2<u8> {
        self.cells
    }

    /// Rows as nested vectors, for consumers that want plain `Vec<Vec<_>>`
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.cells.rows().into_iter().map(|row| row.to_vec()).collect()
    }

    //endregion

    //region Statistics

    /// Number of cells per class id, indexed by class id
    pub fn class_histogram(&self) -> Vec<usize> {
        let mut histogram = vec![0usize; self.class_count];
        for &cell in self.cells.iter() {
            histogram[cell as usize] += 1;
        }
        histogram
    }

    /// Sorted class ids that occur at least once
    pub fn unique_classes(&self) -> Vec<u8> {
        self.class_histogram()
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(class, _)| class as u8)
            .collect()
    }

    /// Smallest and largest class id present
    pub fn value_range(&self) -> (u8, u8) {
        self.cells
            .iter()
            .fold((u8::MAX, u8::MIN), |(min, max), &cell| {
                (min.min(cell), max.max(cell))
            })
    }

    //endregion
}

impl Display for ClassGrid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let (min, max) = self.value_range();
        write!(
            f,
            "ClassGrid({}x{}, classes {}..={})",
            self.rows(),
            self.cols(),
            min,
            max
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_rejects_cells_outside_taxonomy() {
        let err = ClassGrid::new(array![[0, 29]], 29).unwrap_err();
        assert!(matches!(err, SegmapDataError::ModelOutputMismatch(_)));
    }

    #[test]
    fn test_rejects_empty_grid() {
        let empty = Array2::<u8>::zeros((0, 3));
        assert!(ClassGrid::new(empty, 29).unwrap_err().is_shape_error());
    }

    #[test]
    fn test_histogram_and_range() {
        let grid = ClassGrid::new(array![[1, 1, 3], [17, 1, 3]], 29).unwrap();
        let histogram = grid.class_histogram();
        assert_eq!(histogram.len(), 29);
        assert_eq!(histogram[1], 3);
        assert_eq!(histogram[3], 2);
        assert_eq!(histogram[17], 1);
        assert_eq!(histogram.iter().sum::<usize>(), 6);
        assert_eq!(grid.value_range(), (1, 17));
        assert_eq!(grid.unique_classes(), vec![1, 3, 17]);
    }

    #[test]
    fn test_to_rows() {
        let grid = ClassGrid::new(array![[0, 1], [2, 3]], 29).unwrap();
        assert_eq!(grid.to_rows(), vec![vec![0, 1], vec![2, 3]]);
        assert_eq!(grid.to_string(), "ClassGrid(2x2, classes 0..=3)");
    }
}
