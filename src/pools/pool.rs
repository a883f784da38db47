//! Enum dispatch wrapper over both pool kinds.
//!
//! [`Pool`] wraps every concrete pool behind a single tagged enum, so the
//! engine can hold heterogeneous markets in one map and route intents with
//! a `match` instead of `dyn` trait objects.  Each variant is feature-gated
//! to match its pool type.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[cfg(feature = "clmm")]
use super::clmm::ConcentratedLiquidityPool;
#[cfg(feature = "constant-product")]
use super::constant_product::ConstantProductPool;

use crate::config::PoolVariant;
#[cfg(feature = "clmm")]
use crate::domain::{SwapResult, decimal_to_raw, raw_to_decimal};
#[cfg(feature = "constant-product")]
use crate::domain::SwapQuote;
use crate::domain::{FeeTier, SwapDirection, SwapIntent, TokenPair};
use crate::traits::SwapPool;

/// Tagged union of the pool kinds.
///
/// # Example
///
/// ```rust
/// use hydra_pool_engine::config::PoolConfig;
/// use hydra_pool_engine::domain::{FeeTier, SwapDirection, SwapIntent};
/// use hydra_pool_engine::pools::{ConstantProductPool, Pool};
/// use rust_decimal::Decimal;
///
/// let cfg = PoolConfig::from_tokens("ETH", "USDC", FeeTier::TIER_0_30_PERCENT).expect("valid");
/// let cp = ConstantProductPool::initialize(cfg, Decimal::from(1_000), Decimal::from(1_000))
///     .expect("pool created");
/// let mut pool = Pool::from(cp);
///
/// let intent = SwapIntent::exact_in(Decimal::from(100), SwapDirection::ZeroForOne).expect("valid");
/// let outcome = pool.execute_swap(&intent).expect("swap ok");
/// assert!(outcome.amount_out().expect("fits") > Decimal::from(90));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pool {
    /// Constant-product pool (Uniswap V2 style).
    #[cfg(feature = "constant-product")]
    ConstantProduct(Box<ConstantProductPool>),

    /// Concentrated-liquidity pool (Uniswap V3 style).
    #[cfg(feature = "clmm")]
    Concentrated(Box<ConcentratedLiquidityPool>),
}

/// What a routed swap produced, tagged by pool kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SwapOutcome {
    #[cfg(feature = "constant-product")]
    ConstantProduct(SwapQuote),
    #[cfg(feature = "clmm")]
    Concentrated(SwapResult),
}

/// Delegates a method call to the inner pool of every variant.
macro_rules! delegate {
    ($self:ident, $method:ident ( $($arg:expr),* )) => {
        match $self {
            #[cfg(feature = "constant-product")]
            Pool::ConstantProduct(p) => p.$method($($arg),*),
            #[cfg(feature = "clmm")]
            Pool::Concentrated(p) => p.$method($($arg),*),
        }
    };
}

impl Pool {
    /// Which kind of pool this is.
    #[must_use]
    pub const fn variant(&self) -> PoolVariant {
        match self {
            #[cfg(feature = "constant-product")]
            Self::ConstantProduct(_) => PoolVariant::ConstantProduct,
            #[cfg(feature = "clmm")]
            Self::Concentrated(_) => PoolVariant::Concentrated,
        }
    }

    #[must_use]
    pub const fn is_constant_product(&self) -> bool {
        matches!(self.variant(), PoolVariant::ConstantProduct)
    }

    #[must_use]
    pub const fn is_concentrated(&self) -> bool {
        matches!(self.variant(), PoolVariant::Concentrated)
    }

    #[cfg(feature = "constant-product")]
    #[must_use]
    pub fn as_constant_product(&self) -> Option<&ConstantProductPool> {
        match self {
            Self::ConstantProduct(p) => Some(&**p),
            #[allow(unreachable_patterns)]
            _ => None,
        }
    }

    #[cfg(feature = "constant-product")]
    pub fn as_constant_product_mut(&mut self) -> Option<&mut ConstantProductPool> {
        match self {
            Self::ConstantProduct(p) => Some(&mut **p),
            #[allow(unreachable_patterns)]
            _ => None,
        }
    }

    #[cfg(feature = "clmm")]
    #[must_use]
    pub fn as_concentrated(&self) -> Option<&ConcentratedLiquidityPool> {
        match self {
            Self::Concentrated(p) => Some(&**p),
            #[allow(unreachable_patterns)]
            _ => None,
        }
    }

    #[cfg(feature = "clmm")]
    pub fn as_concentrated_mut(&mut self) -> Option<&mut ConcentratedLiquidityPool> {
        match self {
            Self::Concentrated(p) => Some(&mut **p),
            #[allow(unreachable_patterns)]
            _ => None,
        }
    }

    /// Instantaneous price, token1 per token0.
    ///
    /// # Errors
    ///
    /// Propagates the inner pool's [`SwapPool::spot_price`] error.
    pub fn spot_price(&self) -> crate::error::Result<Decimal> {
        delegate!(self, spot_price())
    }

    #[must_use]
    pub fn token_pair(&self) -> &TokenPair {
        delegate!(self, token_pair())
    }

    #[must_use]
    pub fn fee_tier(&self) -> FeeTier {
        delegate!(self, fee_tier())
    }

    /// Quotes `intent` without touching state.  The slippage floor is not
    /// checked.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidInput`](crate::error::AmmError::InvalidInput)
    ///   if a concentrated pool receives a fractional amount.
    /// - Anything the inner pool's `simulate_swap` returns.
    pub fn simulate_swap(&self, intent: &SwapIntent) -> crate::error::Result<SwapOutcome> {
        match self {
            #[cfg(feature = "constant-product")]
            Self::ConstantProduct(p) => p
                .simulate_swap(intent.amount_in(), intent.direction())
                .map(SwapOutcome::ConstantProduct),
            #[cfg(feature = "clmm")]
            Self::Concentrated(p) => p
                .simulate_swap(decimal_to_raw(intent.amount_in())?, intent.direction())
                .map(SwapOutcome::Concentrated),
        }
    }

    /// Executes `intent`, committing only when the output clears
    /// `intent.min_amount_out()`.
    ///
    /// For concentrated pools the floor is rounded up to whole token
    /// units.
    ///
    /// # Errors
    ///
    /// Everything [`simulate_swap`](Self::simulate_swap) returns, plus
    /// [`AmmError::SlippageExceeded`](crate::error::AmmError::SlippageExceeded).
    pub fn execute_swap(&mut self, intent: &SwapIntent) -> crate::error::Result<SwapOutcome> {
        match self {
            #[cfg(feature = "constant-product")]
            Self::ConstantProduct(p) => p
                .execute_swap(
                    intent.amount_in(),
                    intent.direction(),
                    intent.min_amount_out(),
                )
                .map(SwapOutcome::ConstantProduct),
            #[cfg(feature = "clmm")]
            Self::Concentrated(p) => p
                .execute_swap(
                    decimal_to_raw(intent.amount_in())?,
                    intent.direction(),
                    decimal_to_raw(intent.min_amount_out().ceil())?,
                )
                .map(SwapOutcome::Concentrated),
        }
    }
}

#[cfg(feature = "constant-product")]
impl From<ConstantProductPool> for Pool {
    fn from(pool: ConstantProductPool) -> Self {
        Self::ConstantProduct(Box::new(pool))
    }
}

#[cfg(feature = "clmm")]
impl From<ConcentratedLiquidityPool> for Pool {
    fn from(pool: ConcentratedLiquidityPool) -> Self {
        Self::Concentrated(Box::new(pool))
    }
}

impl SwapOutcome {
    #[must_use]
    pub const fn direction(&self) -> SwapDirection {
        match self {
            #[cfg(feature = "constant-product")]
            Self::ConstantProduct(q) => q.direction(),
            #[cfg(feature = "clmm")]
            Self::Concentrated(r) => r.direction(),
        }
    }

    /// Input consumed, as a decimal.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`](crate::error::AmmError::Overflow) if
    /// a raw amount does not fit a decimal.
    pub fn amount_in(&self) -> crate::error::Result<Decimal> {
        match self {
            #[cfg(feature = "constant-product")]
            Self::ConstantProduct(q) => Ok(q.amount_in()),
            #[cfg(feature = "clmm")]
            Self::Concentrated(r) => raw_to_decimal(r.amount_in()),
        }
    }

    /// Output produced, as a decimal.
    ///
    /// # Errors
    ///
    /// Same as [`amount_in`](Self::amount_in).
    pub fn amount_out(&self) -> crate::error::Result<Decimal> {
        match self {
            #[cfg(feature = "constant-product")]
            Self::ConstantProduct(q) => Ok(q.amount_out()),
            #[cfg(feature = "clmm")]
            Self::Concentrated(r) => raw_to_decimal(r.amount_out()),
        }
    }

    /// Fee charged, as a decimal.
    ///
    /// # Errors
    ///
    /// Same as [`amount_in`](Self::amount_in).
    pub fn fee_paid(&self) -> crate::error::Result<Decimal> {
        match self {
            #[cfg(feature = "constant-product")]
            Self::ConstantProduct(q) => Ok(q.fee_paid()),
            #[cfg(feature = "clmm")]
            Self::Concentrated(r) => raw_to_decimal(r.fee_paid()),
        }
    }
}
