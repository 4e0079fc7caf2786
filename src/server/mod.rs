//! HTTP boundary for the Bitcoin cache
//!
//! Exposes `/health` and `/bitcoin-info` over axum. The router is generic over
//! the fetcher and clock so tests can drive it without network access.

pub mod handlers;
pub mod routes;
pub mod state;

pub use handlers::{ErrorResponse, HealthResponse};
pub use routes::build_router;
pub use state::{AppState, BitcoinCache};
