//! Swap direction and routed swap intents.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::AmmError;

/// Which token is sold.
///
/// Selling token0 pushes the price (token1 per token0) down; selling token1
/// pushes it up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapDirection {
    /// token0 in, token1 out.
    ZeroForOne,
    /// token1 in, token0 out.
    OneForZero,
}

impl SwapDirection {
    /// Returns `true` when token0 is the input.
    #[must_use]
    pub const fn is_zero_for_one(&self) -> bool {
        matches!(self, Self::ZeroForOne)
    }

    /// The opposite direction.
    #[must_use]
    pub const fn reverse(&self) -> Self {
        match self {
            Self::ZeroForOne => Self::OneForZero,
            Self::OneForZero => Self::ZeroForOne,
        }
    }
}

impl fmt::Display for SwapDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroForOne => write!(f, "ZeroForOne"),
            Self::OneForZero => write!(f, "OneForZero"),
        }
    }
}

/// A swap request routed through the engine.
///
/// Amounts are decimals so the same intent can target either pool kind.
/// Concentrated-liquidity pools work in raw integer token units and
/// reject fractional amounts.
///
/// # Invariants
///
/// - `amount_in > 0`
/// - `min_amount_out >= 0`
///
/// # Examples
///
/// ```
/// use hydra_pool_engine::domain::{SwapDirection, SwapIntent};
/// use rust_decimal::Decimal;
///
/// let intent = SwapIntent::new(Decimal::from(100), SwapDirection::ZeroForOne, Decimal::ZERO);
/// assert!(intent.is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SwapIntent {
    amount_in: Decimal,
    direction: SwapDirection,
    min_amount_out: Decimal,
}

impl SwapIntent {
    /// Creates a validated intent.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidInput`] if `amount_in <= 0` or
    /// `min_amount_out < 0`.
    pub fn new(
        amount_in: Decimal,
        direction: SwapDirection,
        min_amount_out: Decimal,
    ) -> crate::error::Result<Self> {
        if amount_in <= Decimal::ZERO {
            return Err(AmmError::InvalidInput("swap amount must be positive"));
        }
        if min_amount_out.is_sign_negative() && !min_amount_out.is_zero() {
            return Err(AmmError::InvalidInput("minimum output must not be negative"));
        }
        Ok(Self {
            amount_in,
            direction,
            min_amount_out,
        })
    }

    /// Intent without a slippage floor.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidInput`] if `amount_in <= 0`.
    pub fn exact_in(amount_in: Decimal, direction: SwapDirection) -> crate::error::Result<Self> {
        Self::new(amount_in, direction, Decimal::ZERO)
    }

    /// Returns the input amount.
    #[must_use]
    pub const fn amount_in(&self) -> Decimal {
        self.amount_in
    }

    /// Returns the swap direction.
    #[must_use]
    pub const fn direction(&self) -> SwapDirection {
        self.direction
    }

    /// Returns the slippage floor.
    #[must_use]
    pub const fn min_amount_out(&self) -> Decimal {
        self.min_amount_out
    }
}

/// Converts a decimal amount into raw integer token units.
///
/// # Errors
///
/// - [`AmmError::InvalidInput`] if `amount` is negative or has a
///   fractional part.
/// - [`AmmError::Overflow`] if it does not fit `u128`.
pub fn decimal_to_raw(amount: Decimal) -> crate::error::Result<u128> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(AmmError::InvalidInput("raw token amount must not be negative"));
    }
    let normalized = amount.normalize();
    if normalized.scale() != 0 {
        return Err(AmmError::InvalidInput(
            "raw token amount must be a whole number of units",
        ));
    }
    u128::try_from(normalized.mantissa())
        .map_err(|_| AmmError::Overflow("raw token amount does not fit u128"))
}

/// Converts raw integer token units into a decimal amount.
///
/// # Errors
///
/// Returns [`AmmError::Overflow`] if `raw` exceeds the 96-bit decimal
/// mantissa.
pub fn raw_to_decimal(raw: u128) -> crate::error::Result<Decimal> {
    let signed =
        i128::try_from(raw).map_err(|_| AmmError::Overflow("raw token amount exceeds decimal range"))?;
    Decimal::try_from_i128_with_scale(signed, 0)
        .map_err(|_| AmmError::Overflow("raw token amount exceeds decimal range"))
}
