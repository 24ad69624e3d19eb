//! Optional phase timings, enabled via LINEDIFF_METRICS=1.
//!
//! Times the expensive steps of both entry paths: filling the LCS table,
//! backtracking it into edit ops, and parsing patch text. Durations go to the
//! `linediff::metrics` log target at info level, so
//! `RUST_LOG=linediff::metrics=info` shows them without other debug output.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

static METRICS_ENABLED: AtomicBool = AtomicBool::new(false);

/// Initialize metrics from environment. Call once at startup.
pub fn init() {
    let enabled = std::env::var("LINEDIFF_METRICS")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    set_enabled(enabled);
}

/// Turn metrics on or off explicitly.
pub fn set_enabled(enabled: bool) {
    METRICS_ENABLED.store(enabled, Ordering::Relaxed);
}

/// Check if metrics collection is enabled.
#[inline]
pub fn enabled() -> bool {
    METRICS_ENABLED.load(Ordering::Relaxed)
}

/// A timed step of the diff pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// O(m·n) fill of the LCS table.
    LcsTable,
    /// Walk from `(m, n)` back to the origin.
    Backtrack,
    /// Unified diff text to rows and hunks.
    ParsePatch,
}

impl Phase {
    /// Label used in log output.
    pub fn label(self) -> &'static str {
        match self {
            Phase::LcsTable => "lcs_table",
            Phase::Backtrack => "lcs_backtrack",
            Phase::ParsePatch => "parse_patch",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// RAII timer that logs the phase duration on drop.
pub struct Timer {
    phase: Phase,
    start: Instant,
}

impl Timer {
    /// Start timing `phase` if metrics are enabled.
    #[inline]
    pub fn start(phase: Phase) -> Option<Self> {
        enabled().then(|| Self {
            phase,
            start: Instant::now(),
        })
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        log::info!(
            target: "linediff::metrics",
            "{}: {:?}",
            self.phase,
            self.start.elapsed()
        );
    }
}
