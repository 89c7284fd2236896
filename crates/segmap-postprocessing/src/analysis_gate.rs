// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Frame admission for live analysis.
//!
//! A live camera feed produces frames faster than inference can keep up with.
//! The gate admits a frame only if no analysis is in flight and the minimum
//! interval has passed since the last admitted frame. Everything else is
//! dropped, never queued.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::trace;

/// Minimum time between two analyzed frames unless configured otherwise
pub const DEFAULT_MIN_ANALYSIS_INTERVAL: Duration = Duration::from_millis(500);

/// Throttle plus one-in-flight back-pressure for frame analysis.
///
/// # Example
/// ```
/// use segmap_postprocessing::AnalysisGate;
/// use std::time::{Duration, Instant};
///
/// let gate = AnalysisGate::new(Duration::from_millis(500));
/// let start = Instant::now();
/// {
///     let permit = gate.try_begin(start);
///     assert!(permit.is_some());
///     // still running: the next frame is dropped
///     assert!(gate.try_begin(start + Duration::from_secs(1)).is_none());
/// }
/// // finished, but too soon after the last admitted frame
/// assert!(gate.try_begin(start + Duration::from_millis(200)).is_none());
/// assert!(gate.try_begin(start + Duration::from_millis(600)).is_some());
/// assert_eq!(gate.dropped_frames(), 2);
/// ```
#[derive(Debug)]
pub struct AnalysisGate {
    min_interval: Duration,
    last_admitted: Mutex<Option<Instant>>,
    in_flight: AtomicBool,
    dropped_frames: AtomicU64,
}

impl AnalysisGate {
    pub fn new(min_interval: Duration) -> Self {
        AnalysisGate {
            min_interval,
            last_admitted: Mutex::new(None),
            in_flight: AtomicBool::new(false),
            dropped_frames: AtomicU64::new(0),
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// True while an [`AnalysisPermit`] is alive
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Frames rejected since the gate was created
    pub fn dropped_frames(&self) -> u64 {
        self.dropped_frames.load(Ordering::Relaxed)
    }

    /// Admits the frame arriving at `now`, or returns `None` if it must be dropped.
    ///
    /// A frame is admitted when nothing is in flight and strictly more than
    /// `min_interval` has elapsed since the previously admitted frame. The first
    /// frame is always admitted. The analysis counts as in flight until the
    /// returned permit is dropped.
    pub fn try_begin(&self, now: Instant) -> Option<AnalysisPermit<'_>> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            self.record_drop("analysis in flight");
            return None;
        }

        let mut last_admitted = self.last_admitted.lock();
        if let Some(previous) = *last_admitted {
            if now.saturating_duration_since(previous) <= self.min_interval {
                drop(last_admitted);
                self.in_flight.store(false, Ordering::Release);
                self.record_drop("minimum interval not reached");
                return None;
            }
        }
        *last_admitted = Some(now);
        Some(AnalysisPermit { gate: self })
    }

    fn record_drop(&self, reason: &str) {
        let dropped = self.dropped_frames.fetch_add(1, Ordering::Relaxed) + 1;
        trace!("Frame dropped ({}), {} dropped so far", reason, dropped);
    }
}

impl Default for AnalysisGate {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_ANALYSIS_INTERVAL)
    }
}

/// Marks one admitted analysis as in flight. Dropping it frees the gate.
#[derive(Debug)]
#[must_use = "the analysis ends as soon as the permit is dropped"]
pub struct AnalysisPermit<'a> {
    gate: &'a AnalysisGate,
}

impl Drop for AnalysisPermit<'_> {
    fn drop(&mut self) {
        self.gate.in_flight.store(false, Ordering::Release);
    }
}
