// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! The core crate for segmap. Defines the data structures passed between the
//! inference engine and the post-processing stages: raw output tensors,
//! decoded class grids, confidence observations and percentage distributions.

mod class_grid;
mod error;
mod observations;
pub mod taxonomy;
mod tensor;

pub use class_grid::ClassGrid;
pub use error::{SegmapDataError, SegmapResult};
pub use observations::{ClassObservation, ClassPercentage, PercentageDistribution};
pub use taxonomy::{class_name, NUM_CLASSES, SEGMENTATION_CLASS_NAMES};
pub use tensor::{RawTensor, TensorShape};
