// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Offline inspection of recorded model output.
//!
//! Reads a JSON fixture holding a raw segmentation tensor and a list of
//! classifier observations, runs both post-processing stages and prints the
//! resulting class histogram and percentage summary.
//!
//! ```json
//! {
//!   "shape": [448, 448, 1],
//!   "data": [0, 17, 17, ...],
//!   "observations": [{ "identifier": "cat", "confidence": 0.61 }]
//! }
//! ```

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use segmap::config::load_config_or_default;
use segmap::observability::{debug_flags_help, init_logging, parse_debug_flags};
use segmap::prelude::*;
use segmap::structures::{class_name, ClassGrid};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
struct Fixture {
    shape: Option<Vec<usize>>,
    #[serde(default)]
    data: Vec<i32>,
    #[serde(default)]
    observations: Vec<ClassObservation>,
}

impl Fixture {
    fn tensor(&self) -> Option<RawTensor> {
        self.shape
            .as_ref()
            .map(|shape| RawTensor::new(shape.clone(), self.data.clone()))
    }
}

struct Args {
    fixture: PathBuf,
    config: Option<PathBuf>,
    overrides: HashMap<String, String>,
    json_output: bool,
}

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: segmap_inspect <fixture.json> [--config <path>] [--rounding <mode>]\n\
         \x20                     [--class-count <n>] [--json] [--debug-<crate>]\n\n\
         Options:\n\
         - config: segmap.toml to load (default: discovered, else built-in defaults)\n\
         - rounding: half_away_from_zero | half_to_even\n\
         - json: print a single JSON document instead of text\n\n\
         {}",
        debug_flags_help()
    );
    process::exit(2);
}

fn parse_args() -> Args {
    let mut fixture = None;
    let mut config = None;
    let mut overrides = HashMap::new();
    let mut json_output = false;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let v = args.next().unwrap_or_else(|| usage_and_exit());
                config = Some(PathBuf::from(v));
            }
            "--rounding" => {
                let v = args.next().unwrap_or_else(|| usage_and_exit());
                overrides.insert("rounding".to_string(), v);
            }
            "--class-count" => {
                let v = args.next().unwrap_or_else(|| usage_and_exit());
                overrides.insert("class_count".to_string(), v);
            }
            "--json" => json_output = true,
            "-h" | "--help" => usage_and_exit(),
            // consumed by parse_debug_flags
            other if other.starts_with("--debug-") => {}
            other if other.starts_with("--") => {
                eprintln!("Unknown argument: {other}");
                usage_and_exit();
            }
            other => {
                if fixture.replace(PathBuf::from(other)).is_some() {
                    eprintln!("Only one fixture file may be given");
                    usage_and_exit();
                }
            }
        }
    }

    let fixture = fixture.unwrap_or_else(|| usage_and_exit());
    Args {
        fixture,
        config,
        overrides,
        json_output,
    }
}

fn read_fixture(path: &Path) -> Fixture {
    let raw = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Failed to read fixture {}: {e}", path.display());
        process::exit(2);
    });
    serde_json::from_str(&raw).unwrap_or_else(|e| {
        eprintln!("Failed to parse fixture {}: {e}", path.display());
        process::exit(2);
    })
}

fn label(class_id: usize) -> String {
    match class_name(class_id) {
        Some(name) => format!("{class_id:>3} {name}"),
        None => format!("{class_id:>3} (unnamed)"),
    }
}

fn print_grid(grid: &ClassGrid) {
    let total = (grid.rows() * grid.cols()) as f64;
    let (low, high) = grid.value_range();
    println!("Class grid: {} x {} (values {low}..={high})", grid.rows(), grid.cols());
    for (class_id, count) in grid.class_histogram().into_iter().enumerate() {
        if count == 0 {
            continue;
        }
        println!(
            "  {:<20} {:>8} cells  {:>6.2}%",
            label(class_id),
            count,
            count as f64 * 100.0 / total
        );
    }
}

fn main() {
    let args = parse_args();

    let config = load_config_or_default(args.config.as_deref(), Some(&args.overrides))
        .unwrap_or_else(|e| {
            eprintln!("Configuration error: {e}");
            process::exit(2);
        });

    let flags = parse_debug_flags();
    let _guard = init_logging(&flags, &config.logging).unwrap_or_else(|e| {
        eprintln!("Failed to initialize logging: {e:#}");
        process::exit(2);
    });

    let postprocessor = SegmentationPostprocessor::from_config(&config).unwrap_or_else(|e| {
        eprintln!("Invalid post-processing settings: {e}");
        process::exit(2);
    });

    let fixture = read_fixture(&args.fixture);

    let grid = match fixture.tensor().map(|t| postprocessor.decode(&t)) {
        Some(Ok(grid)) => Some(grid),
        Some(Err(e)) => {
            eprintln!("Failed to decode tensor: {e}");
            process::exit(1);
        }
        None => None,
    };
    let summary = postprocessor.normalize(&fixture.observations);

    if args.json_output {
        let histogram = grid.as_ref().map(|g| g.class_histogram());
        let document = json!({
            "grid": grid.as_ref().map(|g| json!({
                "rows": g.rows(),
                "cols": g.cols(),
                "class_histogram": histogram,
            })),
            "summary": summary,
        });
        match serde_json::to_string_pretty(&document) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("Failed to render JSON: {e}");
                process::exit(1);
            }
        }
        return;
    }

    match &grid {
        Some(grid) => print_grid(grid),
        None => println!("Class grid: (no tensor in fixture)"),
    }
    println!();
    if summary.is_empty() {
        println!("Summary: (no observations)");
    } else {
        println!("Summary ({} rounding):", postprocessor.normalizer().rounding());
        for line in summary.to_string().lines() {
            println!("  {line}");
        }
    }
}
