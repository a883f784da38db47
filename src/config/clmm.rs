//! Configuration for concentrated-liquidity pools (Uniswap V3 style).

use primitive_types::U256;

use super::PoolConfig;
use crate::domain::{MAX_TICK, RangePosition, Tick};
use crate::error::AmmError;
use crate::math::{MAX_SQRT_PRICE_X96, MIN_SQRT_PRICE_X96, sqrt_price_at_tick};

/// Configuration for a concentrated-liquidity (CLMM) pool.
///
/// # Key Relationships
///
/// - Price at tick `i`: `P(i) = 1.0001^i`
/// - The pool starts at `initial_sqrt_price_x96`; its current tick is the
///   greatest tick at or below that price.
///
/// # Validation
///
/// - `tick_spacing` must be in `1..=MAX_TICK`.
/// - `initial_sqrt_price_x96` must lie in
///   `[MIN_SQRT_PRICE_X96, MAX_SQRT_PRICE_X96]`.
/// - Each position's ticks must be multiples of `tick_spacing` and carry
///   non-zero liquidity.  Ordering is enforced by [`RangePosition`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClmmConfig {
    pool: PoolConfig,
    tick_spacing: u32,
    initial_sqrt_price_x96: U256,
    positions: Vec<RangePosition>,
}

impl ClmmConfig {
    /// Creates a new `ClmmConfig`.
    ///
    /// # Arguments
    ///
    /// - `tick_spacing`: granularity of position boundaries (standard
    ///   values: 1, 10, 60, 200).
    /// - `initial_sqrt_price_x96`: Q64.96 square-root starting price.
    /// - `positions`: liquidity opened at creation (may be empty).
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidConfig`] for a bad spacing, price, or empty
    ///   position.
    /// - [`AmmError::TickOutOfBounds`] for a misaligned position tick.
    pub fn new(
        pool: PoolConfig,
        tick_spacing: u32,
        initial_sqrt_price_x96: U256,
        positions: Vec<RangePosition>,
    ) -> crate::error::Result<Self> {
        let config = Self {
            pool,
            tick_spacing,
            initial_sqrt_price_x96,
            positions,
        };
        config.validate()?;
        Ok(config)
    }

    /// Creates a config whose starting price is the price at `tick`.
    ///
    /// # Errors
    ///
    /// Same as [`ClmmConfig::new`].
    pub fn at_tick(
        pool: PoolConfig,
        tick_spacing: u32,
        tick: Tick,
        positions: Vec<RangePosition>,
    ) -> crate::error::Result<Self> {
        Self::new(pool, tick_spacing, sqrt_price_at_tick(tick.get())?, positions)
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidConfig`] for a bad fee, spacing, price, or
    ///   empty position.
    /// - [`AmmError::TickOutOfBounds`] for a misaligned position tick.
    pub fn validate(&self) -> crate::error::Result<()> {
        self.pool.validate()?;
        if self.tick_spacing == 0 || self.tick_spacing > MAX_TICK.unsigned_abs() {
            return Err(AmmError::InvalidConfig(
                "tick spacing must be in 1..=887272",
            ));
        }
        if self.initial_sqrt_price_x96 < MIN_SQRT_PRICE_X96
            || self.initial_sqrt_price_x96 > MAX_SQRT_PRICE_X96
        {
            return Err(AmmError::InvalidConfig(
                "initial sqrt price outside [MIN_SQRT_PRICE_X96, MAX_SQRT_PRICE_X96]",
            ));
        }
        for pos in &self.positions {
            if !pos.lower_tick().is_aligned(self.tick_spacing)
                || !pos.upper_tick().is_aligned(self.tick_spacing)
            {
                return Err(AmmError::TickOutOfBounds(
                    "tick must be a multiple of the tick spacing",
                ));
            }
            if pos.liquidity() == 0 {
                return Err(AmmError::InvalidConfig(
                    "initial position liquidity must be positive",
                ));
            }
        }
        Ok(())
    }

    /// Returns the shared pool parameters.
    #[must_use]
    pub const fn pool(&self) -> &PoolConfig {
        &self.pool
    }

    /// Returns the tick spacing.
    #[must_use]
    pub const fn tick_spacing(&self) -> u32 {
        self.tick_spacing
    }

    /// Returns the starting square-root price.
    #[must_use]
    pub const fn initial_sqrt_price_x96(&self) -> U256 {
        self.initial_sqrt_price_x96
    }

    /// Returns the initial positions.
    #[must_use]
    pub fn positions(&self) -> &[RangePosition] {
        &self.positions
    }
}
