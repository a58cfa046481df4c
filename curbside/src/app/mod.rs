//! Application bootstrap.
//!
//! `CurbsideApp` wires the network monitor, route engine, and tracker
//! together from an [`AppConfig`] and a pair of injected capabilities
//! (network probe and location source). The embedding surface — CLI or
//! UI shell — owns the app and subscribes to its events.

mod config;
mod error;

pub use config::{AppConfig, DEFAULT_HTTP_TIMEOUT_SECS};
pub use error::AppError;

use std::sync::Arc;

use tracing::{info, warn};

use crate::geo::Location;
use crate::location::{LocationError, LocationSource};
use crate::network::{NetworkProbe, NetworkQualityMonitor};
use crate::route::{ReqwestRouteClient, RouteEngine};
use crate::telemetry::{CoreMetrics, MetricsSnapshot};
use crate::tracker::{AdaptiveTracker, TrackerEvents};

/// The assembled route/tracking core.
pub struct CurbsideApp {
    config: AppConfig,
    location_source: Arc<dyn LocationSource>,
    monitor: Arc<NetworkQualityMonitor>,
    tracker: AdaptiveTracker,
    metrics: Arc<CoreMetrics>,
}

impl CurbsideApp {
    /// Assemble the core from configuration and injected capabilities.
    pub fn start(
        config: AppConfig,
        probe: Arc<dyn NetworkProbe>,
        location_source: Arc<dyn LocationSource>,
    ) -> Result<Self, AppError> {
        config.validate().map_err(AppError::Config)?;

        let metrics = Arc::new(CoreMetrics::new());
        let monitor = Arc::new(NetworkQualityMonitor::new(probe));

        let client = ReqwestRouteClient::new(config.http_timeout)?;
        let engine = RouteEngine::new(client)
            .with_base_url(config.routing_base_url.clone())
            .with_metrics(Arc::clone(&metrics));

        let tracker = AdaptiveTracker::new(
            Arc::clone(&location_source),
            Arc::new(engine),
            Arc::clone(&monitor),
            Arc::clone(&metrics),
        );

        info!(
            routing_base_url = %config.routing_base_url,
            tier = %monitor.current_tier(),
            "curbside core assembled"
        );

        Ok(Self {
            config,
            location_source,
            monitor,
            tracker,
            metrics,
        })
    }

    /// Acquire the initial location fix.
    ///
    /// Unlike background tick failures, a failure here is user-visible:
    /// the caller should surface a persistent notice and fall back to a
    /// default camera.
    pub async fn initial_fix(&self) -> Result<Location, LocationError> {
        match self
            .location_source
            .current_position(self.config.fix_request)
            .await
        {
            Ok(fix) => {
                info!(%fix, "initial location acquired");
                Ok(fix)
            }
            Err(e) => {
                warn!(error = %e, "unable to acquire initial location");
                Err(e)
            }
        }
    }

    /// The tracker, for starting and stopping sessions.
    pub fn tracker(&self) -> &AdaptiveTracker {
        &self.tracker
    }

    /// The network quality monitor.
    pub fn monitor(&self) -> &Arc<NetworkQualityMonitor> {
        &self.monitor
    }

    /// Subscribe to tracker output.
    pub fn events(&self) -> TrackerEvents {
        self.tracker.events()
    }

    /// Point-in-time metrics for display.
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Stop all background activity. Dropping the app has the same
    /// effect; this form is explicit for orderly shutdown paths.
    pub fn shutdown(self) {
        self.tracker.stop();
        info!("curbside core shut down");
    }
}
