//! Core telemetry for observability and user feedback.
//!
//! Lock-free atomic counters instrument the tracker and route engine with
//! minimal overhead; [`CoreMetrics::snapshot`] produces a point-in-time
//! copy for display.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing_subscriber::EnvFilter;

/// Atomic counters for the route/tracking core.
///
/// Shared via `Arc` between the tracker, the route engine, and whatever
/// surface displays them.
#[derive(Debug, Default)]
pub struct CoreMetrics {
    ticks: AtomicU64,
    ticks_skipped: AtomicU64,
    routes_remote: AtomicU64,
    routes_fallback: AtomicU64,
    refreshes_dropped: AtomicU64,
}

impl CoreMetrics {
    /// Create zeroed metrics.
    pub fn new() -> Self {
        Self::default()
    }

    /// A tracker tick started.
    pub fn tick(&self) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
    }

    /// A tick was skipped because the location fix failed.
    pub fn tick_skipped(&self) {
        self.ticks_skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// A route was computed by the remote service.
    pub fn route_remote(&self) {
        self.routes_remote.fetch_add(1, Ordering::Relaxed);
    }

    /// A route was synthesized locally.
    pub fn route_fallback(&self) {
        self.routes_fallback.fetch_add(1, Ordering::Relaxed);
    }

    /// A completed refresh was discarded because a newer one had
    /// already been applied.
    pub fn refresh_dropped(&self) {
        self.refreshes_dropped.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a point-in-time copy of all counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            ticks: self.ticks.load(Ordering::Relaxed),
            ticks_skipped: self.ticks_skipped.load(Ordering::Relaxed),
            routes_remote: self.routes_remote.load(Ordering::Relaxed),
            routes_fallback: self.routes_fallback.load(Ordering::Relaxed),
            refreshes_dropped: self.refreshes_dropped.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time copy of [`CoreMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Tracker ticks started.
    pub ticks: u64,
    /// Ticks skipped due to a failed location fix.
    pub ticks_skipped: u64,
    /// Routes computed remotely.
    pub routes_remote: u64,
    /// Routes synthesized locally.
    pub routes_fallback: u64,
    /// Stale refresh results discarded.
    pub refreshes_dropped: u64,
}

impl std::fmt::Display for MetricsSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ticks: {} ({} skipped), routes: {} remote / {} fallback, {} stale dropped",
            self.ticks,
            self.ticks_skipped,
            self.routes_remote,
            self.routes_fallback,
            self.refreshes_dropped
        )
    }
}

/// Initialize the global tracing subscriber.
///
/// Honors `RUST_LOG`, falling back to the given default filter. Safe to
/// call once per process; intended for binaries, not the library.
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
