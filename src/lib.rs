// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # segmap - Semantic Segmentation Post-processing
//!
//! segmap turns the raw output of an on-device segmentation model into data a
//! presentation layer can draw: a bounded 2D class grid and a whole-number
//! percentage summary of per-class confidences. Model execution, camera
//! capture and rendering stay with the caller.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! segmap = "0.1"
//! ```
//!
//! ```rust
//! use segmap::prelude::*;
//!
//! let tensor = RawTensor::new(vec![2, 2], vec![0, 29, -1, 58]);
//! let grid = decode_class_grid(&tensor)?;
//! assert_eq!(grid.to_rows(), vec![vec![0, 0], vec![28, 0]]);
//!
//! let summary = normalize_percentages(&[
//!     ClassObservation::new("person", 0.72),
//!     ClassObservation::new("dog", 0.27),
//! ]);
//! assert_eq!(summary.to_string(), "person (73%)\ndog (27%)");
//! # Ok::<(), segmap::SegmapDataError>(())
//! ```
//!
//! ## Crates
//!
//! - **`structures`**: tensors, class grids, observations, taxonomy, errors
//! - **`postprocessing`**: grid decoding, confidence normalization, analysis gating
//! - **`config`**: TOML configuration with environment and CLI overrides
//! - **`observability`**: logging initialization
//!
//! ## Feature Flags
//! - **`file-logging`**: daily-rotated JSON log file via `observability`

mod pipeline;

// Re-export foundation
pub use segmap_structures as structures;

// Re-export algorithms
pub use segmap_postprocessing as postprocessing;

// Re-export infrastructure
pub use segmap_config as config;
pub use segmap_observability as observability;

pub use pipeline::{SegmapError, SegmentationPostprocessor};
pub use segmap_structures::SegmapDataError;

/// Prelude - commonly used types and functions
pub mod prelude {
    pub use crate::pipeline::{SegmapError, SegmentationPostprocessor};
    pub use crate::postprocessing::{
        decode_class_grid, normalize_percentages, AnalysisGate, ConfidenceNormalizer,
        GridDecoder, RoundingMode,
    };
    pub use crate::structures::{
        ClassGrid, ClassObservation, ClassPercentage, PercentageDistribution, RawTensor,
        SegmapDataError, TensorShape, NUM_CLASSES,
    };
}
