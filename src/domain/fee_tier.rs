//! Protocol fee tiers built on [`BasisPoints`].

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::BasisPoints;

/// A fee tier wrapping [`BasisPoints`] with the common presets.
///
/// Any `BasisPoints` value can be wrapped; pool configs reject tiers at or
/// above 100%.  The four standard tiers also carry a conventional tick
/// spacing for concentrated-liquidity pools.
///
/// # Examples
///
/// ```
/// use hydra_pool_engine::domain::FeeTier;
///
/// let tier = FeeTier::TIER_0_05_PERCENT;
/// assert_eq!(tier.basis_points().get(), 5);
/// assert_eq!(tier.default_tick_spacing(), Some(10));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeeTier(BasisPoints);

impl FeeTier {
    /// 0.01% fee (1 bp).
    pub const TIER_0_01_PERCENT: Self = Self(BasisPoints::new(1));

    /// 0.05% fee (5 bp), stable pairs.
    pub const TIER_0_05_PERCENT: Self = Self(BasisPoints::new(5));

    /// 0.30% fee (30 bp), standard volatile pairs.
    pub const TIER_0_30_PERCENT: Self = Self(BasisPoints::new(30));

    /// 1.00% fee (100 bp), exotic pairs.
    pub const TIER_1_00_PERCENT: Self = Self(BasisPoints::new(100));

    /// Creates a new `FeeTier` from arbitrary [`BasisPoints`].
    #[must_use]
    pub const fn new(basis_points: BasisPoints) -> Self {
        Self(basis_points)
    }

    /// Returns the underlying [`BasisPoints`].
    #[must_use]
    pub const fn basis_points(&self) -> BasisPoints {
        self.0
    }

    /// Computes the fee owed on `amount`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`](crate::error::AmmError::Overflow) if
    /// the intermediate product overflows.
    pub fn apply_to_amount(&self, amount: Decimal) -> crate::error::Result<Decimal> {
        self.0.apply(amount)
    }

    /// Returns `true` if this tier matches one of the four standard presets.
    #[must_use]
    pub const fn is_standard(&self) -> bool {
        matches!(self.0.get(), 1 | 5 | 30 | 100)
    }

    /// Tick spacing conventionally paired with this tier, if standard.
    #[must_use]
    pub const fn default_tick_spacing(&self) -> Option<u32> {
        match self.0.get() {
            1 => Some(1),
            5 => Some(10),
            30 => Some(60),
            100 => Some(200),
            _ => None,
        }
    }
}

impl fmt::Display for FeeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FeeTier({})", self.0)
    }
}
