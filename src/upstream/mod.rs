//! Upstream data sources
//!
//! Clients that pull payloads from third-party APIs. Each client implements
//! [`Fetcher`](crate::cache::Fetcher) so it can back a cache directly.

pub mod bitcoin;

pub use bitcoin::{BitcoinClient, BitcoinInfo, API_NINJAS_BITCOIN_URL};
