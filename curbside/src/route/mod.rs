//! Route computation with guaranteed fallback.
//!
//! [`RouteEngine`] asks the remote routing service for a driving route,
//! selecting request fidelity from the current [`QualityTier`]. Any remote
//! failure — transport error, non-success status, empty or degenerate
//! route — is absorbed by local fallback synthesis, so
//! [`RouteEngine::compute_route`] never fails to the caller.
//!
//! # Design
//!
//! The engine is stateless request/response: each call produces a new
//! immutable [`RouteResult`], and concurrent calls do not interfere.

pub mod fallback;
mod http;
mod osrm;

pub use http::{ReqwestRouteClient, RouteHttpClient};

use std::sync::Arc;

use futures::future::BoxFuture;
use thiserror::Error;
use tracing::{debug, warn};

use crate::geo::Location;
use crate::network::QualityTier;
use crate::telemetry::CoreMetrics;

/// Public base URL of the community OSRM routing service.
pub const DEFAULT_BASE_URL: &str = "https://router.project-osrm.org";

/// Where a route came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteSource {
    /// Computed by the remote routing service.
    Remote,
    /// Synthesized locally after a remote failure.
    Fallback,
}

/// A computed route.
///
/// Invariants: `geometry` holds at least two points; distance and
/// duration are non-negative. Results are immutable snapshots; a new
/// request produces a new value.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteResult {
    /// Ordered path from origin to destination.
    pub geometry: Vec<Location>,
    /// Total distance in kilometers, rounded to one decimal.
    pub distance_km: f64,
    /// Estimated duration in whole minutes.
    pub duration_min: u32,
    /// Remote or fallback.
    pub source: RouteSource,
}

/// Internal routing failures. Never escape the engine; fallback synthesis
/// is the recovery mechanism itself.
#[derive(Debug, Clone, Error)]
pub enum RouteError {
    /// Transport-level failure.
    #[error("route request failed: {0}")]
    Http(String),

    /// Non-success HTTP status from the routing service.
    #[error("routing service returned HTTP {0}")]
    Status(u16),

    /// The service returned no usable route.
    #[error("no route found")]
    NoRoute,

    /// The response body could not be parsed.
    #[error("malformed routing response: {0}")]
    Malformed(String),
}

/// Trait for route computation, the seam the tracker depends on.
pub trait RoutePlanner: Send + Sync {
    /// Compute a route. Infallible: implementations must degrade rather
    /// than error.
    fn compute_route(
        &self,
        origin: Location,
        destination: Location,
        tier: QualityTier,
    ) -> BoxFuture<'_, RouteResult>;
}

/// Network-quality-aware route engine with guaranteed local fallback.
pub struct RouteEngine<C: RouteHttpClient> {
    client: C,
    base_url: String,
    metrics: Arc<CoreMetrics>,
}

impl<C: RouteHttpClient> RouteEngine<C> {
    /// Create an engine over the given HTTP client, targeting the
    /// default public routing service.
    pub fn new(client: C) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            metrics: Arc::new(CoreMetrics::new()),
        }
    }

    /// Target a different routing service.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Share a metrics instance with the rest of the core.
    pub fn with_metrics(mut self, metrics: Arc<CoreMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Compute a route between two points.
    ///
    /// Never fails: any remote failure falls back to local synthesis,
    /// which always yields a structurally valid [`RouteResult`].
    pub async fn compute_route(
        &self,
        origin: Location,
        destination: Location,
        tier: QualityTier,
    ) -> RouteResult {
        match self.fetch_remote(origin, destination, tier).await {
            Ok(route) => {
                self.metrics.route_remote();
                debug!(
                    distance_km = route.distance_km,
                    duration_min = route.duration_min,
                    points = route.geometry.len(),
                    "remote route computed"
                );
                route
            }
            Err(e) => {
                self.metrics.route_fallback();
                warn!(error = %e, %tier, "remote routing failed, synthesizing fallback route");
                fallback::synthesize(origin, destination)
            }
        }
    }

    async fn fetch_remote(
        &self,
        origin: Location,
        destination: Location,
        tier: QualityTier,
    ) -> Result<RouteResult, RouteError> {
        let url = osrm::request_url(&self.base_url, origin, destination, tier);
        let body = self.client.get(&url).await?;
        osrm::parse_route(&body)
    }
}

impl<C: RouteHttpClient> RoutePlanner for RouteEngine<C> {
    fn compute_route(
        &self,
        origin: Location,
        destination: Location,
        tier: QualityTier,
    ) -> BoxFuture<'_, RouteResult> {
        Box::pin(RouteEngine::compute_route(self, origin, destination, tier))
    }
}

#[cfg(test)]
mod tests {
    use super::http::tests::MockRouteClient;
    use super::*;

    const ORIGIN: Location = Location { lat: 12.90, lng: 77.60 };
    const DESTINATION: Location = Location { lat: 12.95, lng: 77.65 };

    fn remote_body() -> Vec<u8> {
        br#"{"code":"Ok","routes":[{"geometry":{"type":"LineString","coordinates":[[77.60,12.90],[77.62,12.92],[77.65,12.95]]},"distance":7640.0,"duration":912.0}]}"#
            .to_vec()
    }

    fn engine(responses: Vec<Result<Vec<u8>, RouteError>>) -> RouteEngine<MockRouteClient> {
        RouteEngine::new(MockRouteClient::new(responses))
            .with_base_url("https://router.example.com")
    }

    #[tokio::test]
    async fn test_remote_route_used_when_service_answers() {
        let engine = engine(vec![Ok(remote_body())]);
        let route = engine
            .compute_route(ORIGIN, DESTINATION, QualityTier::Medium)
            .await;

        assert_eq!(route.source, RouteSource::Remote);
        assert!((route.distance_km - 7.6).abs() < 1e-9);
        assert_eq!(route.duration_min, 15);
    }

    #[tokio::test]
    async fn test_fast_tier_requests_full_geometry() {
        let engine = engine(vec![Ok(remote_body())]);
        engine
            .compute_route(ORIGIN, DESTINATION, QualityTier::Fast)
            .await;

        let url = engine.client.last_url().unwrap();
        assert!(url.contains("overview=full"));
        assert!(url.contains("annotations=true"));
    }

    #[tokio::test]
    async fn test_slow_tier_requests_simplified_geometry() {
        let engine = engine(vec![Ok(remote_body())]);
        engine
            .compute_route(ORIGIN, DESTINATION, QualityTier::Slow)
            .await;

        assert!(engine.client.last_url().unwrap().contains("overview=simplified"));
    }

    #[tokio::test]
    async fn test_transport_failure_falls_back() {
        let engine = engine(vec![Err(RouteError::Http("connection refused".into()))]);
        let route = engine
            .compute_route(ORIGIN, DESTINATION, QualityTier::Medium)
            .await;

        assert_eq!(route.source, RouteSource::Fallback);
        assert_eq!(route.geometry.len(), 21);
        assert!(route.distance_km >= 0.0);
    }

    #[tokio::test]
    async fn test_server_error_falls_back() {
        let engine = engine(vec![Err(RouteError::Status(502))]);
        let route = engine
            .compute_route(ORIGIN, DESTINATION, QualityTier::Medium)
            .await;
        assert_eq!(route.source, RouteSource::Fallback);
    }

    #[tokio::test]
    async fn test_empty_route_list_falls_back() {
        let engine = engine(vec![Ok(br#"{"code":"Ok","routes":[]}"#.to_vec())]);
        let route = engine
            .compute_route(ORIGIN, DESTINATION, QualityTier::Fast)
            .await;
        assert_eq!(route.source, RouteSource::Fallback);
    }

    #[tokio::test]
    async fn test_malformed_body_falls_back() {
        let engine = engine(vec![Ok(b"<html>gateway timeout</html>".to_vec())]);
        let route = engine
            .compute_route(ORIGIN, DESTINATION, QualityTier::Medium)
            .await;
        assert_eq!(route.source, RouteSource::Fallback);
    }

    #[tokio::test]
    async fn test_result_always_structurally_valid() {
        for responses in [
            vec![Ok(remote_body())],
            vec![Err(RouteError::Http("down".into()))],
            vec![Ok(b"{}".to_vec())],
        ] {
            let engine = engine(responses);
            let route = engine
                .compute_route(ORIGIN, DESTINATION, QualityTier::Medium)
                .await;
            assert!(route.geometry.len() >= 2);
            assert!(route.distance_km >= 0.0);
        }
    }

    #[tokio::test]
    async fn test_metrics_count_remote_and_fallback() {
        let metrics = Arc::new(CoreMetrics::new());
        let engine = RouteEngine::new(MockRouteClient::new(vec![
            Ok(remote_body()),
            Err(RouteError::Status(500)),
        ]))
        .with_metrics(Arc::clone(&metrics));

        engine.compute_route(ORIGIN, DESTINATION, QualityTier::Fast).await;
        engine.compute_route(ORIGIN, DESTINATION, QualityTier::Fast).await;

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.routes_remote, 1);
        assert_eq!(snapshot.routes_fallback, 1);
    }
}
