// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! Ensures configuration values are within the ranges the decoding pipeline
//! supports before anything is built from them.

use crate::{ConfigError, ConfigResult, SegmapConfig};

/// Largest taxonomy a class grid can store (cells are `u8`)
pub const MAX_CLASS_COUNT: usize = 256;

/// Accepted log levels
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Accepted rounding mode names, compared case-insensitively with `-` read as `_`
pub const ROUNDING_MODES: &[&str] = &["half_away_from_zero", "half_to_even"];

/// Validation errors that can occur during config validation
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    OutOfRange { field: String, value: String, range: String },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfRange { field, value, range } => {
                write!(f, "{} = {} is outside valid range ({})", field, value, range)
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

/// Validate the complete configuration
///
/// Checks for:
/// - Class count within `1..=256`
/// - A known rounding mode
/// - A known log level
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every problem found
pub fn validate_config(config: &SegmapConfig) -> ConfigResult<()> {
    let mut errors = Vec::new();

    validate_decoding(config, &mut errors);
    validate_normalization(config, &mut errors);
    validate_logging(config, &mut errors);

    if !errors.is_empty() {
        let error_messages = errors
            .iter()
            .map(|e| format!("  - {}", e))
            .collect::<Vec<_>>()
            .join("\n");

        return Err(ConfigError::ValidationError(format!(
            "Configuration validation failed:\n{}",
            error_messages
        )));
    }

    Ok(())
}

fn validate_decoding(config: &SegmapConfig, errors: &mut Vec<ConfigValidationError>) {
    let class_count = config.decoding.class_count;
    if class_count == 0 || class_count > MAX_CLASS_COUNT {
        errors.push(ConfigValidationError::OutOfRange {
            field: "decoding.class_count".to_string(),
            value: class_count.to_string(),
            range: format!("1-{}", MAX_CLASS_COUNT),
        });
    }
}

fn validate_normalization(config: &SegmapConfig, errors: &mut Vec<ConfigValidationError>) {
    let rounding = config.normalization.rounding.trim().to_lowercase().replace('-', "_");
    if !ROUNDING_MODES.contains(&rounding.as_str()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "normalization.rounding".to_string(),
            reason: format!(
                "'{}' is not one of {}",
                config.normalization.rounding,
                ROUNDING_MODES.join(", ")
            ),
        });
    }
}

fn validate_logging(config: &SegmapConfig, errors: &mut Vec<ConfigValidationError>) {
    let level = config.logging.level.trim().to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "logging.level".to_string(),
            reason: format!(
                "'{}' is not one of {}",
                config.logging.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }
}
