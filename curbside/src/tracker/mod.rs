//! Adaptive position tracking and background route refresh.
//!
//! [`AdaptiveTracker`] owns the one recurring scheduled activity in the
//! core: a polling loop that pulls fresh location fixes at a cadence
//! chosen from the measured network quality and refreshes the displayed
//! route in the background.
//!
//! # Lifecycle
//!
//! IDLE → ACTIVE → IDLE. `start` always cancels-then-replaces, so at most
//! one session (and one timer) is ever live; `stop` on an idle tracker is
//! a no-op; dropping the tracker cancels any active session so no timer
//! outlives its consumer.
//!
//! # Refresh ordering
//!
//! Background refreshes are never cancelled, so one issued on tick N can
//! complete after one issued on tick N+1. Each refresh carries a
//! monotonically increasing sequence number and a completed refresh is
//! only applied if nothing newer has been applied already, so stale
//! results are dropped instead of overwriting fresher routes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::geo::Location;
use crate::location::{FixRequest, LocationSource};
use crate::network::{NetworkQualityMonitor, QualityTier};
use crate::parking::Destination;
use crate::route::{RoutePlanner, RouteResult};
use crate::telemetry::CoreMetrics;

/// Poll interval on a fast connection.
pub const FAST_POLL_INTERVAL: Duration = Duration::from_millis(5_000);

/// Poll interval on a medium connection.
pub const MEDIUM_POLL_INTERVAL: Duration = Duration::from_millis(10_000);

/// Poll interval on a slow (or offline) connection.
pub const SLOW_POLL_INTERVAL: Duration = Duration::from_millis(20_000);

/// Poll interval when the host exposes no network-quality signal.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(15_000);

/// Choose the poll interval from the current quality signal.
///
/// `None` means the host exposes no network-information signal at all
/// and gets the conservative default.
pub fn poll_interval(signal: Option<QualityTier>) -> Duration {
    match signal {
        None => DEFAULT_POLL_INTERVAL,
        Some(QualityTier::Fast) => FAST_POLL_INTERVAL,
        Some(QualityTier::Medium) => MEDIUM_POLL_INTERVAL,
        Some(QualityTier::Slow) | Some(QualityTier::Offline) => SLOW_POLL_INTERVAL,
    }
}

/// Subscriptions to tracker output.
///
/// Both channels hold the latest value; consumers that only care about
/// the current state can `borrow` without awaiting.
#[derive(Clone)]
pub struct TrackerEvents {
    /// Latest location published by the polling loop.
    pub location: watch::Receiver<Option<Location>>,
    /// Latest route applied by a background refresh.
    pub route: watch::Receiver<Option<RouteResult>>,
}

/// Descriptive snapshot of the active session, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionInfo {
    /// The polling cadence chosen at start.
    pub interval: Duration,
    /// The destination being tracked.
    pub destination_id: u32,
}

/// A live tracking session and its cancellation.
struct ActiveSession {
    cancel: CancellationToken,
    info: SessionInfo,
}

/// The adaptive tracking loop.
///
/// Must be started from within a Tokio runtime; the polling loop runs as
/// a spawned task until `stop` (or drop) cancels it.
pub struct AdaptiveTracker {
    location_source: Arc<dyn LocationSource>,
    planner: Arc<dyn RoutePlanner>,
    monitor: Arc<NetworkQualityMonitor>,
    metrics: Arc<CoreMetrics>,
    session: Mutex<Option<ActiveSession>>,
    location_tx: watch::Sender<Option<Location>>,
    route_tx: watch::Sender<Option<RouteResult>>,
    refresh_seq: Arc<AtomicU64>,
    last_applied: Arc<AtomicU64>,
}

impl AdaptiveTracker {
    /// Create an idle tracker over the given collaborators.
    pub fn new(
        location_source: Arc<dyn LocationSource>,
        planner: Arc<dyn RoutePlanner>,
        monitor: Arc<NetworkQualityMonitor>,
        metrics: Arc<CoreMetrics>,
    ) -> Self {
        let (location_tx, _) = watch::channel(None);
        let (route_tx, _) = watch::channel(None);
        Self {
            location_source,
            planner,
            monitor,
            metrics,
            session: Mutex::new(None),
            location_tx,
            route_tx,
            refresh_seq: Arc::new(AtomicU64::new(0)),
            last_applied: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Subscribe to location and route updates.
    pub fn events(&self) -> TrackerEvents {
        TrackerEvents {
            location: self.location_tx.subscribe(),
            route: self.route_tx.subscribe(),
        }
    }

    /// Whether a session is currently active.
    pub fn is_active(&self) -> bool {
        self.session.lock().is_some()
    }

    /// Snapshot of the active session.
    pub fn session_info(&self) -> Option<SessionInfo> {
        self.session.lock().as_ref().map(|s| s.info.clone())
    }

    /// Start tracking toward the given destination.
    ///
    /// Any prior session is cancelled first, so exactly one scheduled
    /// task is ever live. The poll interval is chosen from the freshly
    /// sampled network quality.
    pub fn start(&self, destination: Destination) {
        let mut session = self.session.lock();
        if let Some(prev) = session.take() {
            debug!(destination_id = prev.info.destination_id, "cancelling previous tracking session");
            prev.cancel.cancel();
        }

        self.monitor.refresh();
        let interval = poll_interval(self.monitor.signal());
        let info = SessionInfo {
            interval,
            destination_id: destination.id,
        };
        info!(
            destination_id = destination.id,
            destination = %destination.name,
            interval_ms = interval.as_millis() as u64,
            tier = %self.monitor.current_tier(),
            "tracking session started"
        );

        let cancel = CancellationToken::new();
        tokio::spawn(run_session(SessionContext {
            location_source: Arc::clone(&self.location_source),
            planner: Arc::clone(&self.planner),
            monitor: Arc::clone(&self.monitor),
            metrics: Arc::clone(&self.metrics),
            location_tx: self.location_tx.clone(),
            route_tx: self.route_tx.clone(),
            refresh_seq: Arc::clone(&self.refresh_seq),
            last_applied: Arc::clone(&self.last_applied),
            destination,
            interval,
            cancel: cancel.clone(),
        }));

        *session = Some(ActiveSession { cancel, info });
    }

    /// Stop tracking. No-op when idle.
    pub fn stop(&self) {
        if let Some(session) = self.session.lock().take() {
            info!(destination_id = session.info.destination_id, "tracking session stopped");
            session.cancel.cancel();
        }
    }
}

impl Drop for AdaptiveTracker {
    fn drop(&mut self) {
        // Teardown must not leave an orphaned timer running.
        if let Some(session) = self.session.lock().take() {
            session.cancel.cancel();
        }
    }
}

/// Everything a session task needs, cloned out of the tracker.
struct SessionContext {
    location_source: Arc<dyn LocationSource>,
    planner: Arc<dyn RoutePlanner>,
    monitor: Arc<NetworkQualityMonitor>,
    metrics: Arc<CoreMetrics>,
    location_tx: watch::Sender<Option<Location>>,
    route_tx: watch::Sender<Option<RouteResult>>,
    refresh_seq: Arc<AtomicU64>,
    last_applied: Arc<AtomicU64>,
    destination: Destination,
    interval: Duration,
    cancel: CancellationToken,
}

/// The polling loop: one tick per interval until cancelled.
async fn run_session(ctx: SessionContext) {
    // First tick fires after one full period, not immediately.
    let start = tokio::time::Instant::now() + ctx.interval;
    let mut ticker = tokio::time::interval_at(start, ctx.interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;

            _ = ctx.cancel.cancelled() => {
                debug!(destination_id = ctx.destination.id, "tracking loop cancelled");
                break;
            }

            _ = ticker.tick() => {
                tick(&ctx).await;
            }
        }
    }
}

/// One polling cycle: acquire a fix, publish it, and kick off a
/// background route refresh.
async fn tick(ctx: &SessionContext) {
    ctx.metrics.tick();

    let fix = match ctx
        .location_source
        .current_position(FixRequest::default())
        .await
    {
        Ok(fix) => fix,
        Err(e) => {
            // Tracking continues; the route simply does not refresh
            // this cycle.
            ctx.metrics.tick_skipped();
            debug!(error = %e, "location fix failed, skipping refresh cycle");
            return;
        }
    };

    ctx.location_tx.send_replace(Some(fix));

    let seq = ctx.refresh_seq.fetch_add(1, Ordering::Relaxed) + 1;
    let planner = Arc::clone(&ctx.planner);
    let metrics = Arc::clone(&ctx.metrics);
    let route_tx = ctx.route_tx.clone();
    let last_applied = Arc::clone(&ctx.last_applied);
    let destination = ctx.destination.position();
    let tier = ctx.monitor.current_tier();

    // Refreshes run detached so a slow one never blocks the next tick.
    tokio::spawn(async move {
        let route = planner.compute_route(fix, destination, tier).await;
        if apply_if_newest(&last_applied, seq) {
            route_tx.send_replace(Some(route));
        } else {
            metrics.refresh_dropped();
            debug!(seq, "dropping stale route refresh");
        }
    });
}

/// Record `seq` as applied unless a newer refresh already was.
///
/// Returns true when `seq` is the newest applied refresh.
fn apply_if_newest(last_applied: &AtomicU64, seq: u64) -> bool {
    last_applied.fetch_max(seq, Ordering::AcqRel) <= seq
}
