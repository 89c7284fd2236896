// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Unified logging initialization for segmap
//!
//! Installs a console layer (text or JSON) and, with the `file-logging`
//! feature, a daily-rotated JSON log file.

use anyhow::{Context, Result};
use segmap_config::{LogFormat, LoggingConfig};
use std::path::{Path, PathBuf};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::cli::CrateDebugFlags;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Keeps log writers alive. Dropping it flushes buffered file output.
pub struct LoggingGuard {
    #[cfg(feature = "file-logging")]
    _file_guard: Option<tracing_appender::non_blocking::WorkerGuard>,
    log_dir: Option<PathBuf>,
}

impl LoggingGuard {
    /// Directory receiving log files, if file logging is active
    pub fn log_dir(&self) -> Option<&Path> {
        self.log_dir.as_deref()
    }
}

/// Build the event filter from debug flags and the configured base level
///
/// `RUST_LOG`, when set, replaces the computed directives entirely.
pub fn build_env_filter(debug_flags: &CrateDebugFlags, logging: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(directives) = std::env::var("RUST_LOG") {
        if !directives.trim().is_empty() {
            return EnvFilter::try_new(&directives)
                .with_context(|| format!("Invalid RUST_LOG directives: {}", directives));
        }
    }
    let filter = debug_flags.to_filter_string_with_default(&logging.level);
    EnvFilter::try_new(&filter).with_context(|| format!("Invalid log filter: {}", filter))
}

fn console_layer(logging: &LoggingConfig, filter: EnvFilter) -> BoxedLayer {
    match logging.format {
        LogFormat::Text => tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_file(false)
            .with_line_number(false)
            .with_filter(filter)
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_filter(filter)
            .boxed(),
    }
}

/// Initialize console logging
///
/// # Errors
/// Fails if the filter cannot be parsed or a global subscriber is already installed.
pub fn init_logging(debug_flags: &CrateDebugFlags, logging: &LoggingConfig) -> Result<LoggingGuard> {
    let filter = build_env_filter(debug_flags, logging)?;
    let layers = vec![console_layer(logging, filter)];

    Registry::default()
        .with(layers)
        .try_init()
        .context("Failed to install global tracing subscriber")?;

    Ok(LoggingGuard {
        #[cfg(feature = "file-logging")]
        _file_guard: None,
        log_dir: None,
    })
}

/// Initialize console logging plus a daily-rotated JSON file under `log_dir`
///
/// ```text
/// ./logs/
///   └── segmap.log.2025-01-01
/// ```
#[cfg(feature = "file-logging")]
pub fn init_logging_with_file(
    debug_flags: &CrateDebugFlags,
    logging: &LoggingConfig,
    log_dir: &Path,
) -> Result<LoggingGuard> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

    let console_filter = build_env_filter(debug_flags, logging)?;
    let file_filter = build_env_filter(debug_flags, logging)?;

    let file_appender = tracing_appender::rolling::daily(log_dir, "segmap.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .json()
        .with_filter(file_filter)
        .boxed();

    let layers: Vec<BoxedLayer> = vec![console_layer(logging, console_filter), file_layer];
    Registry::default()
        .with(layers)
        .try_init()
        .context("Failed to install global tracing subscriber")?;

    Ok(LoggingGuard {
        _file_guard: Some(guard),
        log_dir: Some(log_dir.to_path_buf()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_from_config_level() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-segmap-postprocessing".to_string()]);
        let logging = LoggingConfig {
            level: "warn".to_string(),
            format: LogFormat::Text,
        };
        let filter = build_env_filter(&flags, &logging).unwrap();
        let rendered = filter.to_string();
        if std::env::var("RUST_LOG").is_err() {
            assert!(rendered.contains("segmap_postprocessing=debug"));
            assert!(rendered.contains("warn"));
        }
    }

    #[test]
    fn test_invalid_level_is_an_error() {
        let logging = LoggingConfig {
            level: "segmap=verbose".to_string(),
            format: LogFormat::Text,
        };
        if std::env::var("RUST_LOG").is_err() {
            assert!(build_env_filter(&CrateDebugFlags::default(), &logging).is_err());
        }
    }

    #[test]
    fn test_second_init_fails_instead_of_panicking() {
        let flags = CrateDebugFlags::default();
        let logging = LoggingConfig::default();
        let first = init_logging(&flags, &logging);
        let second = init_logging(&flags, &logging);
        // only one global subscriber can ever be installed per process
        assert!(first.is_err() || second.is_err());
        if let Ok(guard) = first {
            assert!(guard.log_dir().is_none());
        }
    }

    #[cfg(feature = "file-logging")]
    #[test]
    fn test_file_logging_creates_log_dir() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("logs");
        let result = init_logging_with_file(&CrateDebugFlags::default(), &LoggingConfig::default(), &log_dir);
        // the directory is created before the subscriber is installed
        assert!(log_dir.is_dir());
        if let Ok(guard) = result {
            assert_eq!(guard.log_dir(), Some(log_dir.as_path()));
        }
    }
}
