// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Config-driven assembly of the post-processing stages.

use segmap_config::{ConfigError, SegmapConfig};
use segmap_postprocessing::{AnalysisGate, ConfidenceNormalizer, GridDecoder, RoundingMode};
use segmap_structures::{ClassGrid, ClassObservation, PercentageDistribution, RawTensor, SegmapDataError};
use std::time::Duration;
use tracing::info;

/// Errors from building or running the post-processing stages
#[derive(Debug, thiserror::Error)]
pub enum SegmapError {
    #[error(transparent)]
    Data(#[from] SegmapDataError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A [`GridDecoder`] and a [`ConfidenceNormalizer`] configured together.
///
/// Holds no per-call state, so one instance can serve every frame and thread.
///
/// # Example
/// ```
/// use segmap::config::SegmapConfig;
/// use segmap::prelude::*;
///
/// let mut config = SegmapConfig::default();
/// config.normalization.rounding = "half_to_even".to_string();
///
/// let postprocessor = SegmentationPostprocessor::from_config(&config)?;
/// assert_eq!(postprocessor.normalizer().rounding(), RoundingMode::HalfToEven);
///
/// let grid = postprocessor.decode(&RawTensor::new(vec![1, 2], vec![-1, 29]))?;
/// assert_eq!(grid.to_rows(), vec![vec![28, 0]]);
/// # Ok::<(), SegmapError>(())
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SegmentationPostprocessor {
    decoder: GridDecoder,
    normalizer: ConfidenceNormalizer,
}

impl SegmentationPostprocessor {
    pub fn new(decoder: GridDecoder, normalizer: ConfidenceNormalizer) -> Self {
        SegmentationPostprocessor { decoder, normalizer }
    }

    pub fn from_config(config: &SegmapConfig) -> Result<Self, SegmapError> {
        let decoder = GridDecoder::with_class_count(config.decoding.class_count)?;
        let rounding: RoundingMode = config
            .normalization
            .rounding
            .parse()
            .map_err(ConfigError::ValidationError)?;
        info!(
            "Post-processing configured: {} classes, {} rounding",
            decoder.class_count(),
            rounding
        );
        Ok(SegmentationPostprocessor::new(
            decoder,
            ConfidenceNormalizer::with_rounding(rounding),
        ))
    }

    pub fn decoder(&self) -> &GridDecoder {
        &self.decoder
    }

    pub fn normalizer(&self) -> &ConfidenceNormalizer {
        &self.normalizer
    }

    pub fn decode(&self, tensor: &RawTensor) -> Result<ClassGrid, SegmapDataError> {
        self.decoder.decode(tensor)
    }

    pub fn normalize(&self, observations: &[ClassObservation]) -> PercentageDistribution {
        self.normalizer.normalize(observations)
    }

    /// A fresh gate using the configured analysis interval
    pub fn analysis_gate(config: &SegmapConfig) -> AnalysisGate {
        AnalysisGate::new(Duration::from_millis(config.analysis.min_interval_ms))
    }
}
