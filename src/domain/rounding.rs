//! Explicit rounding direction for arithmetic operations.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounding direction for every division in the engine.
///
/// Integer fixed-point math (`mul_div`, amount deltas) and decimal
/// quantization both take a `Rounding` so that the direction is visible
/// at each call site.  The pool always rounds in its own favour: inputs
/// up, outputs down.
///
/// # Examples
///
/// ```
/// use hydra_pool_engine::domain::Rounding;
/// use rust_decimal::Decimal;
///
/// let third = Decimal::ONE / Decimal::from(3);
/// assert_eq!(Rounding::Down.quantize(third, 2).to_string(), "0.33");
/// assert_eq!(Rounding::Up.quantize(third, 2).to_string(), "0.34");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rounding {
    /// Round towards positive infinity (ceiling).
    Up,
    /// Round towards zero (floor for the non-negative values used here).
    Down,
}

impl Rounding {
    /// Returns `true` if this is [`Rounding::Up`].
    #[must_use]
    pub const fn is_up(&self) -> bool {
        matches!(self, Self::Up)
    }

    /// Returns `true` if this is [`Rounding::Down`].
    #[must_use]
    pub const fn is_down(&self) -> bool {
        matches!(self, Self::Down)
    }

    /// The equivalent `rust_decimal` strategy.
    #[must_use]
    pub const fn decimal_strategy(&self) -> RoundingStrategy {
        match self {
            Self::Up => RoundingStrategy::ToPositiveInfinity,
            Self::Down => RoundingStrategy::ToZero,
        }
    }

    /// Rounds `value` to `decimal_places` fractional digits in this
    /// direction.
    #[must_use]
    pub fn quantize(&self, value: Decimal, decimal_places: u32) -> Decimal {
        value.round_dp_with_strategy(decimal_places, self.decimal_strategy())
    }
}
