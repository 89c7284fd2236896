// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # segmap-observability
//!
//! Unified logging setup for segmap binaries and tests.
//!
//! Library crates only emit `tracing` events. Applications call
//! [`init_logging`] once at startup to decide where those events go and at
//! which level, optionally raising individual crates to `debug` through
//! [`CrateDebugFlags`].
//!
//! ## Features
//! - `file-logging`: daily-rotated JSON log file (desktop only)

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod init;

pub use cli::*;
pub use init::*;

/// Known segmap crate names for debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "segmap",
    "segmap-structures",
    "segmap-postprocessing",
    "segmap-config",
    "segmap-observability",
];

/// Initialize console logging from process arguments, `SEGMAP_DEBUG` and the given config
pub fn init_logging_default(logging: &segmap_config::LoggingConfig) -> anyhow::Result<LoggingGuard> {
    init_logging(&parse_debug_flags(), logging)
}
