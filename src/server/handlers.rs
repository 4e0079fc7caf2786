use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::state::AppState;
use crate::cache::{Clock, Fetcher};
use crate::upstream::BitcoinInfo;

/// Header reporting whether the body came from cache, upstream, or stale cache
pub const CACHE_STATUS_HEADER: &str = "x-cache";

/// Body of `GET /health`
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// RFC 3339 timestamp with millisecond precision
    pub timestamp: String,
}

/// JSON body for error responses
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".into(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

/// GET /bitcoin-info
///
/// 200 with the cached, refreshed, or stale snapshot; 502 if none was ever
/// fetched.
pub async fn bitcoin_info<F, C>(State(state): State<AppState<F, C>>) -> Response
where
    F: Fetcher<BitcoinInfo> + 'static,
    C: Clock + 'static,
{
    match state.bitcoin_cache.lookup().await {
        Ok(cached) => (
            [(CACHE_STATUS_HEADER, cached.status.as_str())],
            Json(cached.data),
        )
            .into_response(),
        Err(e) => {
            warn!("Failed to fetch bitcoin data: {}", e);
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse::new("Failed to fetch bitcoin info")),
            )
                .into_response()
        }
    }
}

/// Fallback for unknown routes
pub async fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::new("Not found")))
}
