//! Convenience re-exports for common types and traits.
//!
//! ```rust
//! use hydra_pool_engine::prelude::*;
//! ```

pub use crate::domain::{
    AccountId, BasisPoints, FeeTier, MarketId, PositionId, RangePosition, Rounding, SwapDirection,
    SwapIntent, SwapQuote, SwapResult, Tick, TokenId, TokenPair,
};

pub use crate::traits::{FromConfig, SwapPool};

pub use crate::math::CheckedArithmetic;

pub use crate::config::{AmmConfig, ClmmConfig, ConstantProductConfig, EngineConfig, PoolConfig};

pub use crate::error::{AmmError, Result};

pub use crate::factory::DefaultPoolFactory;

pub use crate::engine::{SharedPool, SwapEngine};

#[cfg(feature = "constant-product")]
pub use crate::liquidity::LiquidityManager;

pub use crate::pools::{Pool, SwapOutcome};
#[cfg(feature = "clmm")]
pub use crate::pools::ConcentratedLiquidityPool;
#[cfg(feature = "constant-product")]
pub use crate::pools::ConstantProductPool;
