//! Basis-point representation for fee rates.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::AmmError;

/// Value that represents 100%.
const MAX_BPS: u32 = 10_000;

/// A percentage expressed in basis points (1 bp = 0.01%, 10 000 bp = 100%).
///
/// All `u32` values are representable.  Pool fees must additionally be
/// strictly below 100%, see [`is_valid_fee`](Self::is_valid_fee).
///
/// # Examples
///
/// ```
/// use hydra_pool_engine::domain::BasisPoints;
///
/// let bp = BasisPoints::new(30);
/// assert_eq!(bp.get(), 30);
/// assert!(bp.is_valid_fee());
/// assert!(!BasisPoints::MAX_PERCENT.is_valid_fee());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BasisPoints(u32);

impl BasisPoints {
    /// Zero basis points (0%).
    pub const ZERO: Self = Self(0);

    /// 100% expressed in basis points.
    pub const MAX_PERCENT: Self = Self(MAX_BPS);

    /// Creates a new `BasisPoints` from a raw `u32` value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the underlying `u32` value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Returns `true` if the value is in `0..=10_000`.
    #[must_use]
    pub const fn is_valid_percent(&self) -> bool {
        self.0 <= MAX_BPS
    }

    /// Returns `true` if the value is usable as a swap fee, i.e. in
    /// `0..10_000`.  A 100% fee leaves nothing to trade.
    #[must_use]
    pub const fn is_valid_fee(&self) -> bool {
        self.0 < MAX_BPS
    }

    /// Returns `10_000 - self`, the share of an input that survives the fee.
    ///
    /// Returns `None` above 100%.
    #[must_use]
    pub const fn complement(&self) -> Option<u32> {
        MAX_BPS.checked_sub(self.0)
    }

    /// Computes `amount × self / 10 000` exactly in decimal arithmetic.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the intermediate product does not
    /// fit a [`Decimal`].
    pub fn apply(&self, amount: Decimal) -> crate::error::Result<Decimal> {
        amount
            .checked_mul(Decimal::from(self.0))
            .and_then(|p| p.checked_div(Decimal::from(MAX_BPS)))
            .ok_or(AmmError::Overflow("basis points apply overflow"))
    }
}

impl fmt::Display for BasisPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}bp", self.0)
    }
}
