// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Conversion of classifier confidences into whole percentages that sum to 100.
//!
//! Each confidence is rounded independently, which in general does not add up
//! to 100. The remainder is folded into the largest bucket.

use crate::numeric::{round_half_away_from_zero, round_half_to_even, saturate_i32};
use segmap_structures::{ClassObservation, ClassPercentage, PercentageDistribution};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use tracing::{debug, warn};

/// Corrections larger than this many points are logged as suspicious
const LARGE_CORRECTION_POINTS: i64 = 10;

/// Tie-break policy used when a scaled confidence lands exactly on `.5`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// `12.5 -> 13`. Matches `f32::round`.
    #[default]
    HalfAwayFromZero,
    /// `12.5 -> 12`, `13.5 -> 14`
    HalfToEven,
}

impl RoundingMode {
    pub fn apply(&self, value: f32) -> f32 {
        match self {
            RoundingMode::HalfAwayFromZero => round_half_away_from_zero(value),
            RoundingMode::HalfToEven => round_half_to_even(value),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RoundingMode::HalfAwayFromZero => "half_away_from_zero",
            RoundingMode::HalfToEven => "half_to_even",
        }
    }
}

impl Display for RoundingMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoundingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "half_away_from_zero" => Ok(RoundingMode::HalfAwayFromZero),
            "half_to_even" => Ok(RoundingMode::HalfToEven),
            other => Err(format!(
                "Unknown rounding mode '{}', expected 'half_away_from_zero' or 'half_to_even'",
                other
            )),
        }
    }
}

/// Turns a list of [`ClassObservation`]s into a [`PercentageDistribution`].
///
/// For a non-empty input the output always sums to exactly 100. Entries keep
/// their input order and identifiers. The correction goes to the entry with
/// the largest rounded value. Ties on the rounded value go to the larger
/// confidence, and remaining ties to the earliest entry.
///
/// # Example
/// ```
/// use segmap_postprocessing::ConfidenceNormalizer;
/// use segmap_structures::ClassObservation;
///
/// let observations = vec![
///     ClassObservation::new("cat", 0.333),
///     ClassObservation::new("dog", 0.333),
///     ClassObservation::new("bird", 0.334),
/// ];
/// let distribution = ConfidenceNormalizer::new().normalize(&observations);
/// assert_eq!(distribution.total(), 100);
/// assert_eq!(distribution.to_string(), "cat (33%)\ndog (33%)\nbird (34%)");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfidenceNormalizer {
    rounding: RoundingMode,
}

impl ConfidenceNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rounding(rounding: RoundingMode) -> Self {
        ConfidenceNormalizer { rounding }
    }

    pub fn rounding(&self) -> RoundingMode {
        self.rounding
    }

    /// `round(confidence * 100)` under this normalizer's rounding mode.
    ///
    /// Non-finite results count as 0.
    pub fn raw_percentage(&self, confidence: f32) -> i32 {
        let scaled = confidence * 100.0;
        if !scaled.is_finite() {
            warn!("Non-finite confidence {} treated as 0%", confidence);
            return 0;
        }
        // float to int casts saturate
        self.rounding.apply(scaled) as i32
    }

    pub fn normalize(&self, observations: &[ClassObservation]) -> PercentageDistribution {
        if observations.is_empty() {
            return PercentageDistribution::default();
        }

        let mut percentages: Vec<i64> = observations
            .iter()
            .map(|o| self.raw_percentage(o.confidence) as i64)
            .collect();

        let sum: i64 = percentages.iter().sum();
        let diff = 100 - sum;
        if diff != 0 {
            let max_index = correction_index(&percentages, observations);
            percentages[max_index] += diff;
            if diff.abs() > LARGE_CORRECTION_POINTS {
                warn!(
                    "Large percentage correction of {} points applied to '{}' (raw sum {})",
                    diff, observations[max_index].identifier, sum
                );
            }
        }

        debug!(
            "Normalized {} observations (raw sum {}, correction {})",
            observations.len(),
            sum,
            diff
        );

        let entries = observations
            .iter()
            .zip(percentages)
            .map(|(observation, percentage)| ClassPercentage {
                identifier: observation.identifier.clone(),
                percentage: saturate_i32(percentage),
            })
            .collect();
        PercentageDistribution::new(entries)
    }
}

/// Index of the entry receiving the sum correction.
///
/// Ranks by rounded percentage, then by confidence (NaN lowest), then by
/// input order. `percentages` must be non-empty and parallel to `observations`.
fn correction_index(percentages: &[i64], observations: &[ClassObservation]) -> usize {
    let rank = |index: usize| {
        let confidence = observations[index].confidence;
        let confidence = if confidence.is_nan() { f32::NEG_INFINITY } else { confidence };
        (percentages[index], confidence)
    };

    let mut best = 0;
    for index in 1..percentages.len() {
        let (percentage, confidence) = rank(index);
        let (best_percentage, best_confidence) = rank(best);
        if percentage > best_percentage
            || (percentage == best_percentage && confidence > best_confidence)
        {
            best = index;
        }
    }
    best
}

/// Normalizes with the default rounding mode
pub fn normalize_percentages(observations: &[ClassObservation]) -> PercentageDistribution {
    ConfidenceNormalizer::new().normalize(observations)
}
