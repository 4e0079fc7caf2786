//! Single-value TTL cache that prefers stale data over failure
//!
//! Provides a `StaleTolerantCache` that serves a value from memory while it is
//! fresh, refreshes it from an upstream [`Fetcher`] once the TTL has passed, and
//! falls back to the last good value when the refresh fails.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{debug, error, warn};

use super::clock::{Clock, SystemClock};
use crate::error::{CacheError, FetchError};

/// Upstream source the cache refreshes from
pub trait Fetcher<T>: Send + Sync {
    /// Retrieves a fresh value. Any failure is reported as a `FetchError`.
    fn fetch(&self) -> impl Future<Output = Result<T, FetchError>> + Send;
}

impl<T, F: Fetcher<T> + ?Sized> Fetcher<T> for Arc<F> {
    fn fetch(&self) -> impl Future<Output = Result<T, FetchError>> + Send {
        (**self).fetch()
    }
}

/// The last successfully fetched value and when it was fetched
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<T> {
    /// The cached value
    pub value: T,
    /// When the value was fetched, in epoch milliseconds
    pub fetched_at_ms: i64,
}

/// How a lookup was answered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// Entry was still fresh; upstream was not called
    Hit,
    /// Upstream was called and returned a new value
    Refreshed,
    /// Upstream failed; the expired entry was served instead
    Stale,
}

impl CacheStatus {
    /// Short label used in the `x-cache` response header
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Refreshed => "MISS",
            CacheStatus::Stale => "STALE",
        }
    }
}

/// Result of a lookup, including metadata about cache freshness
#[derive(Debug, Clone)]
pub struct CachedData<T> {
    /// The served value
    pub data: T,
    /// When the served value was fetched, in epoch milliseconds
    pub fetched_at_ms: i64,
    /// Which path produced the value
    pub status: CacheStatus,
}

impl<T> CachedData<T> {
    /// Whether the value was served past its TTL because a refresh failed
    pub fn is_stale(&self) -> bool {
        self.status == CacheStatus::Stale
    }
}

/// Caches one value from an unreliable upstream
///
/// A value younger than the TTL is served from memory. An older one triggers a
/// synchronous refresh inside the lookup. If that refresh fails and an earlier
/// value exists, the earlier value is served and the error is swallowed; only a
/// cache that has never held a value reports the failure.
///
/// The entry lock is held just long enough to copy or replace the entry, never
/// across the upstream call. Concurrent lookups on an expired entry may each hit
/// upstream, and the last successful write wins.
pub struct StaleTolerantCache<T, F, C = SystemClock> {
    ttl: Duration,
    ttl_ms: i64,
    fetcher: F,
    clock: C,
    entry: RwLock<Option<CacheEntry<T>>>,
}

impl<T, F> StaleTolerantCache<T, F, SystemClock>
where
    T: Clone + Send + Sync,
    F: Fetcher<T>,
{
    /// Creates an empty cache backed by the system clock
    ///
    /// # Returns
    /// * `Err(CacheError::InvalidTtl)` if `ttl` is zero
    pub fn new(ttl: Duration, fetcher: F) -> Result<Self, CacheError> {
        Self::with_clock(ttl, fetcher, SystemClock)
    }
}

impl<T, F, C> StaleTolerantCache<T, F, C>
where
    T: Clone + Send + Sync,
    F: Fetcher<T>,
    C: Clock,
{
    /// Creates an empty cache with a custom time source
    pub fn with_clock(ttl: Duration, fetcher: F, clock: C) -> Result<Self, CacheError> {
        let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        if ttl_ms <= 0 {
            return Err(CacheError::InvalidTtl);
        }

        Ok(Self {
            ttl,
            ttl_ms,
            fetcher,
            clock,
            entry: RwLock::new(None),
        })
    }

    /// Returns the configured TTL
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns a copy of the current entry without touching upstream
    pub async fn peek(&self) -> Option<CacheEntry<T>> {
        self.entry.read().await.clone()
    }

    /// Returns the cached value, refreshing it first if it has expired
    ///
    /// # Returns
    /// * `Ok(T)` - fresh, refreshed, or stale value
    /// * `Err(CacheError::NoValueAvailable)` - refresh failed and nothing was ever cached
    pub async fn get(&self) -> Result<T, CacheError> {
        self.lookup().await.map(|cached| cached.data)
    }

    /// Same as [`get`](Self::get), but also reports how the value was obtained
    pub async fn lookup(&self) -> Result<CachedData<T>, CacheError> {
        let now = self.clock.now_ms();

        if let Some(entry) = self.entry.read().await.as_ref() {
            if self.is_fresh(entry, now) {
                debug!(fetched_at_ms = entry.fetched_at_ms, "cache hit");
                return Ok(CachedData {
                    data: entry.value.clone(),
                    fetched_at_ms: entry.fetched_at_ms,
                    status: CacheStatus::Hit,
                });
            }
        }

        match self.fetcher.fetch().await {
            Ok(value) => {
                let fetched_at_ms = self.clock.now_ms();
                *self.entry.write().await = Some(CacheEntry {
                    value: value.clone(),
                    fetched_at_ms,
                });
                debug!(fetched_at_ms, "cache refreshed from upstream");

                Ok(CachedData {
                    data: value,
                    fetched_at_ms,
                    status: CacheStatus::Refreshed,
                })
            }
            Err(fetch_error) => match self.entry.read().await.as_ref() {
                // Another lookup refreshed the entry while this fetch was in flight
                Some(entry) if self.is_fresh(entry, self.clock.now_ms()) => {
                    debug!(
                        error = %fetch_error,
                        fetched_at_ms = entry.fetched_at_ms,
                        "upstream fetch failed, serving concurrently refreshed value"
                    );
                    Ok(CachedData {
                        data: entry.value.clone(),
                        fetched_at_ms: entry.fetched_at_ms,
                        status: CacheStatus::Hit,
                    })
                }
                Some(entry) => {
                    warn!(
                        error = %fetch_error,
                        age_ms = self.clock.now_ms().saturating_sub(entry.fetched_at_ms),
                        "upstream fetch failed, serving stale value"
                    );
                    Ok(CachedData {
                        data: entry.value.clone(),
                        fetched_at_ms: entry.fetched_at_ms,
                        status: CacheStatus::Stale,
                    })
                }
                None => {
                    error!(error = %fetch_error, "upstream fetch failed and no cached value exists");
                    Err(CacheError::NoValueAvailable(fetch_error))
                }
            },
        }
    }

    fn is_fresh(&self, entry: &CacheEntry<T>, now: i64) -> bool {
        now.saturating_sub(entry.fetched_at_ms) < self.ttl_ms
    }
}
