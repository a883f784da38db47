//! Concentrated liquidity range positions.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::{AccountId, Tick};
use crate::error::AmmError;

/// Identifier a concentrated-liquidity pool assigns to an opened position.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PositionId(u64);

impl PositionId {
    /// Wraps a raw identifier.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PositionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Liquidity provided by `owner` over `[lower_tick, upper_tick)`.
///
/// # Invariants
///
/// - `lower_tick < upper_tick`
/// - Both ticks lie in `[MIN_TICK, MAX_TICK]` (enforced by [`Tick`]).
///
/// Alignment to a tick spacing depends on the pool and is checked when the
/// position is opened.
///
/// # Examples
///
/// ```
/// use hydra_pool_engine::domain::{AccountId, RangePosition, Tick};
///
/// let lower = Tick::new(-1_000).unwrap_or(Tick::ZERO);
/// let upper = Tick::new(1_000).unwrap_or(Tick::ZERO);
/// let pos = RangePosition::new(AccountId::from("lp"), lower, upper, 10_000).expect("ordered");
/// assert!(pos.is_in_range(0));
/// assert!(!pos.is_in_range(1_000));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawRangePosition")]
pub struct RangePosition {
    owner: AccountId,
    lower_tick: Tick,
    upper_tick: Tick,
    liquidity: u128,
}

#[derive(Deserialize)]
struct RawRangePosition {
    owner: AccountId,
    lower_tick: Tick,
    upper_tick: Tick,
    liquidity: u128,
}

impl TryFrom<RawRangePosition> for RangePosition {
    type Error = AmmError;

    fn try_from(raw: RawRangePosition) -> Result<Self, Self::Error> {
        Self::new(raw.owner, raw.lower_tick, raw.upper_tick, raw.liquidity)
    }
}

impl RangePosition {
    /// Creates a new position with validated tick ordering.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidRange`] if `lower_tick >= upper_tick`.
    pub fn new(
        owner: AccountId,
        lower_tick: Tick,
        upper_tick: Tick,
        liquidity: u128,
    ) -> crate::error::Result<Self> {
        if lower_tick >= upper_tick {
            return Err(AmmError::InvalidRange(
                "lower tick must be less than upper tick",
            ));
        }
        Ok(Self {
            owner,
            lower_tick,
            upper_tick,
            liquidity,
        })
    }

    /// Returns the liquidity owner.
    #[must_use]
    pub const fn owner(&self) -> &AccountId {
        &self.owner
    }

    /// Returns the lower tick boundary (inclusive).
    #[must_use]
    pub const fn lower_tick(&self) -> Tick {
        self.lower_tick
    }

    /// Returns the upper tick boundary (exclusive).
    #[must_use]
    pub const fn upper_tick(&self) -> Tick {
        self.upper_tick
    }

    /// Returns the liquidity in this position.
    #[must_use]
    pub const fn liquidity(&self) -> u128 {
        self.liquidity
    }

    /// Width of the range in ticks.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.upper_tick.get() - self.lower_tick.get()
    }

    /// `lower_tick <= tick < upper_tick`.
    #[must_use]
    pub const fn is_in_range(&self, tick: i32) -> bool {
        tick >= self.lower_tick.get() && tick < self.upper_tick.get()
    }
}

impl fmt::Display for RangePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RangePosition({}, [{}, {}), liquidity={})",
            self.owner,
            self.lower_tick.get(),
            self.upper_tick.get(),
            self.liquidity
        )
    }
}

/// Identifier and token amounts deposited when a position is opened.
///
/// Amounts are rounded up: the provider pays for the full range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OpenedPosition {
    /// Identifier for later close or fee collection.
    pub id: PositionId,
    /// token0 owed to the pool.
    pub amount0: u128,
    /// token1 owed to the pool.
    pub amount1: u128,
}

/// Token amounts released when a position is closed.
///
/// `amount0`/`amount1` are the principal computed from the range and the
/// price at close; `fees0`/`fees1` are swap fees earned since the last
/// collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ClosedPosition {
    /// Principal of token0.
    pub amount0: u128,
    /// Principal of token1.
    pub amount1: u128,
    /// Uncollected token0 fees.
    pub fees0: u128,
    /// Uncollected token1 fees.
    pub fees1: u128,
}
