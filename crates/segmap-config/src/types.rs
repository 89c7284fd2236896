// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! This module defines all configuration structs that map to sections in
//! `segmap.toml`. Every section falls back to its defaults when omitted.

use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SegmapConfig {
    pub analysis: AnalysisConfig,
    pub decoding: DecodingConfig,
    pub normalization: NormalizationConfig,
    pub logging: LoggingConfig,
}

/// Live-stream analysis pacing
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Minimum milliseconds between two analyzed frames
    pub min_interval_ms: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: 500,
        }
    }
}

/// Class grid decoding
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DecodingConfig {
    /// Size of the class taxonomy raw values are reduced into
    pub class_count: usize,
}

impl Default for DecodingConfig {
    fn default() -> Self {
        Self { class_count: 29 }
    }
}

/// Confidence normalization
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NormalizationConfig {
    /// `half_away_from_zero` or `half_to_even`
    pub rounding: String,
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        Self {
            rounding: "half_away_from_zero".to_string(),
        }
    }
}

/// Console log output
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// trace, debug, info, warn or error
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    /// Parses `text` or `json`, case-insensitively
    pub fn parse(value: &str) -> Option<LogFormat> {
        match value.trim().to_lowercase().as_str() {
            "text" => Some(LogFormat::Text),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }
}
