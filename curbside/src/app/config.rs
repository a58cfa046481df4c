//! Application configuration.
//!
//! `AppConfig` combines everything needed to bootstrap the core: the
//! routing service endpoint, the HTTP timeout, and the fix-request
//! parameters used by the tracker.

use std::time::Duration;

use crate::location::FixRequest;
use crate::route::DEFAULT_BASE_URL;

/// Default HTTP timeout for routing requests (in seconds).
///
/// Long enough for a slow cell link to answer, short enough that a dead
/// service trips the fallback path before the next poll tick lands.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Top-level configuration for [`CurbsideApp`](super::CurbsideApp).
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Base URL of the OSRM-compatible routing service.
    pub routing_base_url: String,

    /// Timeout applied to each routing request.
    pub http_timeout: Duration,

    /// Fix parameters used for the startup location acquisition.
    pub fix_request: FixRequest,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            routing_base_url: DEFAULT_BASE_URL.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            fix_request: FixRequest::default(),
        }
    }
}

impl AppConfig {
    /// Target a different routing service.
    pub fn with_routing_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.routing_base_url = base_url.into();
        self
    }

    /// Set the routing request timeout.
    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.routing_base_url.is_empty() {
            return Err("routing base URL must not be empty".to_string());
        }
        if self.http_timeout.is_zero() {
            return Err("HTTP timeout must be non-zero".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.routing_base_url, DEFAULT_BASE_URL);
        assert_eq!(config.http_timeout, Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_overrides() {
        let config = AppConfig::default()
            .with_routing_base_url("http://localhost:5000")
            .with_http_timeout(Duration::from_secs(3));
        assert_eq!(config.routing_base_url, "http://localhost:5000");
        assert_eq!(config.http_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_validate_rejects_empty_base_url() {
        let config = AppConfig::default().with_routing_base_url("");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = AppConfig::default().with_http_timeout(Duration::ZERO);
        assert!(config.validate().is_err());
    }
}
