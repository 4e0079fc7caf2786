//! In-memory cache for upstream API responses
//!
//! This module provides a single-value cache with a configurable TTL
//! (time-to-live). It supports graceful degradation by serving the last good
//! value when a refresh fails, so callers keep getting data while the upstream
//! API is unavailable.

mod clock;
mod stale;

pub use clock::{Clock, ManualClock, SystemClock};
pub use stale::{CacheEntry, CacheStatus, CachedData, Fetcher, StaleTolerantCache};
