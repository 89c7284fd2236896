// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Per-class confidence observations and the integer percentage summaries built from them.

use crate::error::{SegmapDataError, SegmapResult};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// A `(label, confidence)` pair emitted by a classifier for one candidate class.
///
/// Confidence is expected in `[0, 1]` but is not validated, since model output
/// is passed through as produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassObservation {
    pub identifier: String,
    pub confidence: f32,
}

impl ClassObservation {
    pub fn new(identifier: impl Into<String>, confidence: f32) -> Self {
        ClassObservation {
            identifier: identifier.into(),
            confidence,
        }
    }
}

impl<S: Into<String>> From<(S, f32)> for ClassObservation {
    fn from((identifier, confidence): (S, f32)) -> Self {
        ClassObservation::new(identifier, confidence)
    }
}

/// One entry of a [`PercentageDistribution`].
///
/// The percentage is signed because the sum correction can push a single
/// entry outside `[0, 100]` when the input confidences are malformed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassPercentage {
    pub identifier: String,
    pub percentage: i32,
}

impl Display for ClassPercentage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}%)", self.identifier, self.percentage)
    }
}

/// Integer percentages per class, in the order the observations were given.
///
/// When built by a normalizer from a non-empty observation list the
/// percentages sum to exactly 100. An empty distribution is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PercentageDistribution {
    entries: Vec<ClassPercentage>,
}

impl PercentageDistribution {
    pub fn new(entries: Vec<ClassPercentage>) -> Self {
        PercentageDistribution { entries }
    }

    pub fn entries(&self) -> &[ClassPercentage] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<ClassPercentage> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ClassPercentage> {
        self.entries.iter()
    }

    /// Sum of all percentages, widened so malformed entries cannot overflow
    pub fn total(&self) -> i64 {
        self.entries.iter().map(|e| e.percentage as i64).sum()
    }

    /// Percentage of the first entry with this identifier
    pub fn percentage_of(&self, identifier: &str) -> Option<i32> {
        self.entries
            .iter()
            .find(|e| e.identifier == identifier)
            .map(|e| e.percentage)
    }

    pub fn to_json(&self) -> SegmapResult<String> {
        serde_json::to_string(self).map_err(|e| {
            SegmapDataError::ModelOutputMismatch(format!("Unable to serialize distribution: {}", e))
        })
    }
}

impl<'a> IntoIterator for &'a PercentageDistribution {
    type Item = &'a ClassPercentage;
    type IntoIter = std::slice::Iter<'a, ClassPercentage>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// One `identifier (NN%)` line per entry.
impl Display for PercentageDistribution {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (index, entry) in self.entries.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", entry)?;
        }
        Ok(())
    }
}
