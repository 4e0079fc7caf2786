//! Error types for upstream fetches and cache lookups
//!
//! Upstream failures of every kind collapse into [`FetchError`]. The cache only
//! surfaces one when it has nothing to fall back to, wrapped in
//! [`CacheError::NoValueAvailable`].

use thiserror::Error;

/// Errors that can occur when fetching from the upstream source
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed (connection, TLS, timeout, body read)
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Upstream answered with a non-success status code
    #[error("Upstream returned status {0}")]
    Status(u16),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors returned by cache construction and lookups
#[derive(Debug, Error)]
pub enum CacheError {
    /// The refresh failed and there is no earlier value to serve instead
    #[error("No cached value available: {0}")]
    NoValueAvailable(#[source] FetchError),

    /// TTL must be greater than zero
    #[error("Cache TTL must be greater than zero")]
    InvalidTtl,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_status_error_message_includes_code() {
        let err = FetchError::Status(503);
        assert_eq!(err.to_string(), "Upstream returned status 503");
    }

    #[test]
    fn test_parse_error_converts_from_serde_json() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: FetchError = json_err.into();
        assert!(matches!(err, FetchError::Parse(_)));
        assert!(err.to_string().starts_with("Failed to parse JSON response"));
    }

    #[test]
    fn test_no_value_available_keeps_fetch_error_as_source() {
        let err = CacheError::NoValueAvailable(FetchError::Status(500));

        assert!(err.to_string().contains("status 500"));
        let source = err.source().expect("source should be the fetch error");
        assert_eq!(source.to_string(), "Upstream returned status 500");
    }
}
