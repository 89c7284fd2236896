// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # segmap-postprocessing
//!
//! Turns raw segmentation inference output into something a presentation
//! layer can use:
//!
//! - **[`GridDecoder`]** - raw `i32` tensor to a bounded 2D class grid
//! - **[`ConfidenceNormalizer`]** - per-class confidences to whole percentages summing to 100
//! - **[`AnalysisGate`]** - optional throttle and back-pressure for live frame streams
//!
//! The decoder and the normalizer are pure and synchronous. They keep no state
//! between calls and may be invoked concurrently.

mod analysis_gate;
mod confidence_normalizer;
mod grid_decoder;
pub mod numeric;

pub use analysis_gate::{AnalysisGate, AnalysisPermit, DEFAULT_MIN_ANALYSIS_INTERVAL};
pub use confidence_normalizer::{normalize_percentages, ConfidenceNormalizer, RoundingMode};
pub use grid_decoder::{decode_class_grid, GridDecoder};
