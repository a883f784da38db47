//! Top-level pool configuration enum.
//!
//! [`AmmConfig`] is the declarative blueprint for creating either pool
//! kind.  The factory matches on it to dispatch construction:
//!
//! ```text
//! match config {
//!     AmmConfig::ConstantProduct(cfg) => ConstantProductPool::from_config(&cfg),
//!     AmmConfig::Clmm(cfg)            => ConcentratedLiquidityPool::from_config(&cfg),
//! }
//! ```

use super::{ClmmConfig, ConstantProductConfig, PoolConfig};

/// Configuration of one pool, tagged by kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AmmConfig {
    /// Constant-product configuration (Uniswap V2 style).
    ConstantProduct(ConstantProductConfig),
    /// Concentrated-liquidity configuration (Uniswap V3 style).
    Clmm(ClmmConfig),
}

impl AmmConfig {
    /// Validates the inner configuration.
    ///
    /// # Errors
    ///
    /// Returns the same [`AmmError`](crate::error::AmmError) the inner
    /// config's `validate()` would return.
    pub fn validate(&self) -> crate::error::Result<()> {
        match self {
            Self::ConstantProduct(cfg) => cfg.validate(),
            Self::Clmm(cfg) => cfg.validate(),
        }
    }

    /// Shared parameters of either variant.
    #[must_use]
    pub const fn pool(&self) -> &PoolConfig {
        match self {
            Self::ConstantProduct(cfg) => cfg.pool(),
            Self::Clmm(cfg) => cfg.pool(),
        }
    }

    /// Returns `true` if this is a [`ConstantProduct`](Self::ConstantProduct) variant.
    #[must_use]
    pub const fn is_constant_product(&self) -> bool {
        matches!(self, Self::ConstantProduct(_))
    }

    /// Returns `true` if this is a [`Clmm`](Self::Clmm) variant.
    #[must_use]
    pub const fn is_clmm(&self) -> bool {
        matches!(self, Self::Clmm(_))
    }
}

impl core::fmt::Display for AmmConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ConstantProduct(_) => write!(f, "ConstantProduct"),
            Self::Clmm(_) => write!(f, "Clmm"),
        }
    }
}
