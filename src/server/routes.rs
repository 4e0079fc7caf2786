use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::state::AppState;
use crate::cache::{Clock, Fetcher};
use crate::upstream::BitcoinInfo;

/// Build and configure the application router
pub fn build_router<F, C>(state: AppState<F, C>) -> Router
where
    F: Fetcher<BitcoinInfo> + 'static,
    C: Clock + 'static,
{
    Router::new()
        // Liveness, independent of the cache
        .route("/health", get(handlers::health_check))
        .route("/bitcoin-info", get(handlers::bitcoin_info::<F, C>))
        .fallback(handlers::not_found)
        // Middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
