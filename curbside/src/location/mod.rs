//! Position acquisition abstraction.
//!
//! Wraps the host's geolocation capability behind the [`LocationSource`]
//! trait so the tracker can be driven by a real device, a simulation, or
//! a deterministic test double. Each fix request carries accuracy and
//! staleness parameters; the [`CachedLocationSource`] wrapper owns the
//! last-known fix and enforces `maximum_age` and `timeout`.

mod cache;

pub use cache::CachedLocationSource;

use std::time::Duration;

use futures::future::BoxFuture;
use parking_lot::Mutex;
use thiserror::Error;

use crate::geo::Location;

/// Default bounded staleness for a fix (10 seconds).
pub const DEFAULT_MAXIMUM_AGE: Duration = Duration::from_secs(10);

/// Default acquisition timeout for a fix (5 seconds).
pub const DEFAULT_FIX_TIMEOUT: Duration = Duration::from_secs(5);

/// Parameters for a single position fix.
#[derive(Debug, Clone, Copy)]
pub struct FixRequest {
    /// Request high-accuracy positioning from the host.
    pub high_accuracy: bool,
    /// A cached fix no older than this may be returned instead of a
    /// fresh acquisition.
    pub maximum_age: Duration,
    /// Give up on acquisition after this long.
    pub timeout: Duration,
}

impl Default for FixRequest {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            maximum_age: DEFAULT_MAXIMUM_AGE,
            timeout: DEFAULT_FIX_TIMEOUT,
        }
    }
}

/// Errors from position acquisition.
#[derive(Debug, Clone, Error)]
pub enum LocationError {
    /// The host has no geolocation capability.
    #[error("location capability unavailable")]
    Unavailable,

    /// Acquisition did not complete within the requested timeout.
    #[error("location fix timed out after {0:?}")]
    Timeout(Duration),

    /// The host reported an acquisition failure.
    #[error("position acquisition failed: {0}")]
    Acquisition(String),
}

/// Capability trait for acquiring position fixes.
///
/// Implementations must be cheap to call repeatedly; the tracker issues
/// one fix request per tick.
pub trait LocationSource: Send + Sync {
    /// Acquire a single position fix.
    fn current_position(
        &self,
        request: FixRequest,
    ) -> BoxFuture<'_, Result<Location, LocationError>>;
}

/// A source that returns a configured position.
///
/// The position can be moved with [`set_position`](Self::set_position),
/// which makes this double the basis for simulated drives.
pub struct StaticLocationSource {
    position: Mutex<Location>,
}

impl StaticLocationSource {
    /// Create a source pinned at the given position.
    pub fn new(position: Location) -> Self {
        Self {
            position: Mutex::new(position),
        }
    }

    /// Replace the reported position. The previous value is superseded,
    /// not mutated; callers holding old fixes keep them.
    pub fn set_position(&self, position: Location) {
        *self.position.lock() = position;
    }

    /// The currently configured position.
    pub fn position(&self) -> Location {
        *self.position.lock()
    }
}

impl LocationSource for StaticLocationSource {
    fn current_position(
        &self,
        _request: FixRequest,
    ) -> BoxFuture<'_, Result<Location, LocationError>> {
        let position = self.position();
        Box::pin(async move { Ok(position) })
    }
}

/// A source for hosts without geolocation; every fix fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableLocationSource;

impl LocationSource for UnavailableLocationSource {
    fn current_position(
        &self,
        _request: FixRequest,
    ) -> BoxFuture<'_, Result<Location, LocationError>> {
        Box::pin(async { Err(LocationError::Unavailable) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_source_returns_configured_position() {
        let source = StaticLocationSource::new(Location::new(12.9, 77.6));
        let fix = source.current_position(FixRequest::default()).await.unwrap();
        assert_eq!(fix, Location::new(12.9, 77.6));
    }

    #[tokio::test]
    async fn test_static_source_position_can_move() {
        let source = StaticLocationSource::new(Location::new(12.9, 77.6));
        source.set_position(Location::new(12.91, 77.61));
        let fix = source.current_position(FixRequest::default()).await.unwrap();
        assert_eq!(fix, Location::new(12.91, 77.61));
    }

    #[tokio::test]
    async fn test_unavailable_source_always_fails() {
        let source = UnavailableLocationSource;
        let result = source.current_position(FixRequest::default()).await;
        assert!(matches!(result, Err(LocationError::Unavailable)));
    }

    #[test]
    fn test_fix_request_defaults() {
        let request = FixRequest::default();
        assert!(request.high_accuracy);
        assert_eq!(request.maximum_age, Duration::from_secs(10));
        assert_eq!(request.timeout, Duration::from_secs(5));
    }
}
