//! btcwatch library
//!
//! A stale-tolerant single-value cache, the upstream Bitcoin client that feeds
//! it, and the HTTP server that exposes it. The binary in `main.rs` wires these
//! together; integration tests use them directly.

pub mod cache;
pub mod cli;
pub mod error;
pub mod server;
pub mod upstream;

pub use error::{CacheError, FetchError};
