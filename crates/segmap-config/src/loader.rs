// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! This module implements the 3-tier configuration loading system:
//! 1. TOML file (base defaults)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::types::LogFormat;
use crate::validation::validate_config;
use crate::{ConfigError, ConfigResult, SegmapConfig};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "segmap.toml";

/// Find the segmap configuration file
///
/// Search order:
/// 1. `SEGMAP_CONFIG_PATH` environment variable
/// 2. Current working directory: `./segmap.toml`
/// 3. Up to 5 parent directories
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var("SEGMAP_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by SEGMAP_CONFIG_PATH not found: {}",
            path.display()
        )));
    }

    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));
        let mut current = cwd.as_path();
        for _ in 0..5 {
            match current.parent() {
                Some(parent) => {
                    search_paths.push(parent.join(CONFIG_FILE_NAME));
                    current = parent;
                }
                None => break,
            }
        }
    }

    if let Some(found) = search_paths.iter().find(|p| p.exists()) {
        return Ok(found.clone());
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "Configuration file '{}' not found in any of these locations:\n{}\n\nSet SEGMAP_CONFIG_PATH environment variable to specify custom location.",
        CONFIG_FILE_NAME, search_list
    )))
}

/// Load configuration from a TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if config file is not found, contains invalid TOML, or fails validation
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<SegmapConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: SegmapConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config);
    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli);
    }

    validate_config(&config)?;
    Ok(config)
}

/// Like [`load_config`], but starts from defaults when no file can be found.
///
/// A file that exists but fails to parse or validate is still an error.
pub fn load_config_or_default(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<SegmapConfig> {
    match load_config(config_path, cli_args) {
        Err(ConfigError::FileNotFound(_)) if config_path.is_none() => {
            let mut config = SegmapConfig::default();
            apply_environment_overrides(&mut config);
            if let Some(cli) = cli_args {
                apply_cli_overrides(&mut config, cli);
            }
            validate_config(&config)?;
            Ok(config)
        }
        other => other,
    }
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `SEGMAP_MIN_INTERVAL_MS` -> `analysis.min_interval_ms`
/// - `SEGMAP_CLASS_COUNT` -> `decoding.class_count`
/// - `SEGMAP_ROUNDING` -> `normalization.rounding`
/// - `SEGMAP_LOG_LEVEL` -> `logging.level`
/// - `SEGMAP_LOG_FORMAT` -> `logging.format`
///
/// Values that fail to parse are ignored.
pub fn apply_environment_overrides(config: &mut SegmapConfig) {
    if let Ok(value) = env::var("SEGMAP_MIN_INTERVAL_MS") {
        if let Ok(ms) = value.parse::<u64>() {
            config.analysis.min_interval_ms = ms;
        }
    }
    if let Ok(value) = env::var("SEGMAP_CLASS_COUNT") {
        if let Ok(count) = value.parse::<usize>() {
            config.decoding.class_count = count;
        }
    }
    if let Ok(value) = env::var("SEGMAP_ROUNDING") {
        config.normalization.rounding = value;
    }
    if let Ok(value) = env::var("SEGMAP_LOG_LEVEL") {
        config.logging.level = value;
    }
    if let Ok(value) = env::var("SEGMAP_LOG_FORMAT") {
        if let Some(format) = LogFormat::parse(&value) {
            config.logging.format = format;
        }
    }
}

/// Apply CLI argument overrides to configuration
///
/// # Arguments
///
/// * `config` - Configuration to modify
/// * `cli_args` - HashMap of CLI arguments (e.g., `{"min_interval_ms": "250", "log_level": "debug"}`)
pub fn apply_cli_overrides(config: &mut SegmapConfig, cli_args: &HashMap<String, String>) {
    if let Some(value) = cli_args.get("min_interval_ms") {
        if let Ok(ms) = value.parse::<u64>() {
            config.analysis.min_interval_ms = ms;
        }
    }
    if let Some(value) = cli_args.get("class_count") {
        if let Ok(count) = value.parse::<usize>() {
            config.decoding.class_count = count;
        }
    }
    if let Some(value) = cli_args.get("rounding") {
        config.normalization.rounding = value.clone();
    }
    if let Some(value) = cli_args.get("log_level") {
        config.logging.level = value.clone();
    }
    if let Some(value) = cli_args.get("log_format") {
        if let Some(format) = LogFormat::parse(value) {
            config.logging.format = format;
        }
    }
}
