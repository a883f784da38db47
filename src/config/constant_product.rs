//! Configuration for constant-product pools (Uniswap V2 style).

use rust_decimal::Decimal;

use super::PoolConfig;
use crate::error::AmmError;

/// Configuration for a constant-product pool (`x · y = k`).
///
/// # Derived Values
///
/// - Initial invariant: `k = reserve0 × reserve1`
/// - Initial price (token1 per token0): `P₀ = reserve1 / reserve0`
///
/// # Validation
///
/// - Both reserves must be strictly positive.
/// - The fee is validated by [`PoolConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantProductConfig {
    pool: PoolConfig,
    reserve0: Decimal,
    reserve1: Decimal,
}

impl ConstantProductConfig {
    /// Creates a new `ConstantProductConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfig`] if either reserve is not
    /// strictly positive.
    pub fn new(pool: PoolConfig, reserve0: Decimal, reserve1: Decimal) -> crate::error::Result<Self> {
        let config = Self {
            pool,
            reserve0,
            reserve1,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfig`] if either reserve is not
    /// strictly positive or the fee is out of range.
    pub fn validate(&self) -> crate::error::Result<()> {
        self.pool.validate()?;
        if self.reserve0 <= Decimal::ZERO || self.reserve1 <= Decimal::ZERO {
            return Err(AmmError::InvalidConfig("reserves must be positive"));
        }
        Ok(())
    }

    /// Returns the shared pool parameters.
    #[must_use]
    pub const fn pool(&self) -> &PoolConfig {
        &self.pool
    }

    /// Returns the initial reserve of token0.
    #[must_use]
    pub const fn reserve0(&self) -> Decimal {
        self.reserve0
    }

    /// Returns the initial reserve of token1.
    #[must_use]
    pub const fn reserve1(&self) -> Decimal {
        self.reserve1
    }
}
