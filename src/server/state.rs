use std::sync::Arc;

use crate::cache::{StaleTolerantCache, SystemClock};
use crate::upstream::{BitcoinClient, BitcoinInfo};

/// Cache of the latest Bitcoin snapshot
pub type BitcoinCache<F = BitcoinClient, C = SystemClock> = StaleTolerantCache<BitcoinInfo, F, C>;

/// Server state shared across handlers
pub struct AppState<F = BitcoinClient, C = SystemClock> {
    pub bitcoin_cache: Arc<BitcoinCache<F, C>>,
}

impl<F, C> AppState<F, C> {
    pub fn new(bitcoin_cache: BitcoinCache<F, C>) -> Self {
        Self {
            bitcoin_cache: Arc::new(bitcoin_cache),
        }
    }
}

// Manual impl: only the Arc is cloned, so F and C need not be Clone.
impl<F, C> Clone for AppState<F, C> {
    fn clone(&self) -> Self {
        Self {
            bitcoin_cache: Arc::clone(&self.bitcoin_cache),
        }
    }
}
