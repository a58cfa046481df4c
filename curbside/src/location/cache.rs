//! Last-known-fix caching for location sources.

use std::time::Instant;

use futures::future::BoxFuture;
use parking_lot::Mutex;
use tracing::trace;

use crate::geo::Location;

use super::{FixRequest, LocationError, LocationSource};

/// A recorded fix with its acquisition time.
#[derive(Debug, Clone, Copy)]
struct CachedFix {
    position: Location,
    acquired: Instant,
}

/// Wraps a [`LocationSource`] with bounded-staleness caching and an
/// acquisition timeout.
///
/// The wrapper exclusively owns the last-known fix. A request whose
/// `maximum_age` covers the cached fix is answered without touching the
/// inner source; otherwise a fresh acquisition runs under the request's
/// `timeout` and, on success, replaces the cached fix.
pub struct CachedLocationSource<S> {
    inner: S,
    last_fix: Mutex<Option<CachedFix>>,
}

impl<S> CachedLocationSource<S> {
    /// Wrap the given source with an empty cache.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            last_fix: Mutex::new(None),
        }
    }

    /// The last successfully acquired position, if any.
    pub fn last_known(&self) -> Option<Location> {
        self.last_fix.lock().map(|fix| fix.position)
    }
}

impl<S: LocationSource> LocationSource for CachedLocationSource<S> {
    fn current_position(
        &self,
        request: FixRequest,
    ) -> BoxFuture<'_, Result<Location, LocationError>> {
        Box::pin(async move {
            if let Some(fix) = *self.last_fix.lock() {
                if fix.acquired.elapsed() <= request.maximum_age {
                    trace!(age_ms = fix.acquired.elapsed().as_millis() as u64, "serving cached fix");
                    return Ok(fix.position);
                }
            }

            let position =
                match tokio::time::timeout(request.timeout, self.inner.current_position(request))
                    .await
                {
                    Ok(result) => result?,
                    Err(_) => return Err(LocationError::Timeout(request.timeout)),
                };

            *self.last_fix.lock() = Some(CachedFix {
                position,
                acquired: Instant::now(),
            });
            Ok(position)
        })
    }
}
