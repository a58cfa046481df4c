//! Application error types.

use std::fmt;

use crate::route::RouteError;

/// Errors that can occur while assembling the core.
#[derive(Debug)]
pub enum AppError {
    /// Failed to construct the routing HTTP client.
    HttpClient(RouteError),

    /// Configuration error.
    Config(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::HttpClient(e) => {
                write!(f, "Failed to create routing HTTP client: {}", e)
            }
            AppError::Config(msg) => {
                write!(f, "Configuration error: {}", msg)
            }
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::HttpClient(e) => Some(e),
            AppError::Config(_) => None,
        }
    }
}

impl From<RouteError> for AppError {
    fn from(e: RouteError) -> Self {
        AppError::HttpClient(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::Config("empty base URL".to_string());
        assert!(err.to_string().contains("Configuration error"));
        assert!(err.to_string().contains("empty base URL"));
    }

    #[test]
    fn test_app_error_from_route_error() {
        let route_err = RouteError::Http("no client".to_string());
        let app_err: AppError = route_err.into();
        assert!(matches!(app_err, AppError::HttpClient(_)));
    }
}
