//! Lock-guarded pool handle for multi-threaded callers.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use rust_decimal::Decimal;

use crate::domain::SwapIntent;
use crate::pools::{Pool, SwapOutcome};

/// A [`Pool`] shared between threads.
///
/// Every mutation takes the single write lock for its whole
/// read-compute-commit sequence, so swaps on one pool never interleave.
/// Quotes and price reads share the read lock.
///
/// ```rust
/// use hydra_pool_engine::config::PoolConfig;
/// use hydra_pool_engine::domain::{FeeTier, SwapDirection, SwapIntent};
/// use hydra_pool_engine::engine::SharedPool;
/// use hydra_pool_engine::pools::ConstantProductPool;
/// use rust_decimal::Decimal;
///
/// let cfg = PoolConfig::from_tokens("ETH", "USDC", FeeTier::TIER_0_30_PERCENT).expect("valid");
/// let pool = ConstantProductPool::initialize(cfg, Decimal::from(1_000), Decimal::from(1_000))
///     .expect("pool");
/// let shared = SharedPool::new(pool);
///
/// let handle = shared.clone();
/// std::thread::spawn(move || {
///     let intent = SwapIntent::exact_in(Decimal::from(10), SwapDirection::ZeroForOne).expect("ok");
///     handle.execute_swap(&intent).expect("swap");
/// })
/// .join()
/// .expect("thread");
///
/// assert!(shared.spot_price().expect("price") < Decimal::ONE);
/// ```
#[derive(Debug, Clone)]
pub struct SharedPool {
    inner: Arc<RwLock<Pool>>,
}

impl SharedPool {
    pub fn new(pool: impl Into<Pool>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(pool.into())),
        }
    }

    /// Shared read access; blocks while a mutation is in progress.
    pub fn read(&self) -> RwLockReadGuard<'_, Pool> {
        self.inner.read()
    }

    /// Exclusive access for multi-step mutations such as position
    /// management.
    pub fn write(&self) -> RwLockWriteGuard<'_, Pool> {
        self.inner.write()
    }

    /// # Errors
    ///
    /// Anything [`Pool::spot_price`] returns.
    pub fn spot_price(&self) -> crate::error::Result<Decimal> {
        self.inner.read().spot_price()
    }

    /// # Errors
    ///
    /// Anything [`Pool::simulate_swap`] returns.
    pub fn simulate_swap(&self, intent: &SwapIntent) -> crate::error::Result<SwapOutcome> {
        self.inner.read().simulate_swap(intent)
    }

    /// Executes `intent` under the write lock.
    ///
    /// # Errors
    ///
    /// Anything [`Pool::execute_swap`] returns.
    pub fn execute_swap(&self, intent: &SwapIntent) -> crate::error::Result<SwapOutcome> {
        self.inner.write().execute_swap(intent)
    }

    /// Takes the pool back when this is the last handle.
    ///
    /// # Errors
    ///
    /// Returns `self` unchanged while other handles are alive.
    pub fn try_unwrap(self) -> Result<Pool, Self> {
        Arc::try_unwrap(self.inner)
            .map(RwLock::into_inner)
            .map_err(|inner| Self { inner })
    }
}

impl From<Pool> for SharedPool {
    fn from(pool: Pool) -> Self {
        Self::new(pool)
    }
}
