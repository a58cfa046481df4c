//! HTTP client abstraction for the routing service.

use std::time::Duration;

use futures::future::BoxFuture;

use super::RouteError;

/// Trait for routing-service HTTP operations.
///
/// This abstraction allows dependency injection and easier testing by
/// enabling mock HTTP clients in tests.
pub trait RouteHttpClient: Send + Sync {
    /// Performs an HTTP GET request, returning the response body.
    fn get(&self, url: &str) -> BoxFuture<'_, Result<Vec<u8>, RouteError>>;
}

/// Real HTTP client implementation using reqwest.
pub struct ReqwestRouteClient {
    client: reqwest::Client,
}

impl ReqwestRouteClient {
    /// Creates a client with the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self, RouteError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RouteError::Http(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl RouteHttpClient for ReqwestRouteClient {
    fn get(&self, url: &str) -> BoxFuture<'_, Result<Vec<u8>, RouteError>> {
        let request = self.client.get(url);
        Box::pin(async move {
            let response = request
                .send()
                .await
                .map_err(|e| RouteError::Http(format!("request failed: {e}")))?;

            let status = response.status();
            if !status.is_success() {
                return Err(RouteError::Status(status.as_u16()));
            }

            response
                .bytes()
                .await
                .map(|b| b.to_vec())
                .map_err(|e| RouteError::Http(format!("failed to read response: {e}")))
        })
    }
}
