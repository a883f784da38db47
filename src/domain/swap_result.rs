//! Outcomes of swaps against each pool kind.

use core::fmt;

use primitive_types::U256;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::SwapDirection;
use crate::error::AmmError;

/// Quote produced by a constant-product pool, simulated or executed.
///
/// Prices are token1 per token0 before and after the trade.
///
/// # Examples
///
/// ```
/// use hydra_pool_engine::domain::{SwapDirection, SwapQuote};
/// use rust_decimal::Decimal;
///
/// let q = SwapQuote::new(
///     SwapDirection::ZeroForOne,
///     Decimal::from(100),
///     Decimal::from(90),
///     Decimal::ONE,
///     Decimal::new(8, 1),
///     Decimal::new(3, 1),
/// );
/// assert_eq!(q.effective_price().ok(), Some(Decimal::new(9, 1)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SwapQuote {
    direction: SwapDirection,
    amount_in: Decimal,
    amount_out: Decimal,
    price_before: Decimal,
    price_after: Decimal,
    fee_paid: Decimal,
}

impl SwapQuote {
    /// Assembles a quote.
    #[must_use]
    pub const fn new(
        direction: SwapDirection,
        amount_in: Decimal,
        amount_out: Decimal,
        price_before: Decimal,
        price_after: Decimal,
        fee_paid: Decimal,
    ) -> Self {
        Self {
            direction,
            amount_in,
            amount_out,
            price_before,
            price_after,
            fee_paid,
        }
    }

    /// Returns the swap direction.
    #[must_use]
    pub const fn direction(&self) -> SwapDirection {
        self.direction
    }

    /// Returns the input amount, fee included.
    #[must_use]
    pub const fn amount_in(&self) -> Decimal {
        self.amount_in
    }

    /// Returns the output amount.
    #[must_use]
    pub const fn amount_out(&self) -> Decimal {
        self.amount_out
    }

    /// Spot price before the trade.
    #[must_use]
    pub const fn price_before(&self) -> Decimal {
        self.price_before
    }

    /// Spot price after the trade.
    #[must_use]
    pub const fn price_after(&self) -> Decimal {
        self.price_after
    }

    /// Fee charged on the input leg.
    #[must_use]
    pub const fn fee_paid(&self) -> Decimal {
        self.fee_paid
    }

    /// Realized rate, output per unit of input.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::DivisionByZero`] if `amount_in` is zero.
    pub fn effective_price(&self) -> crate::error::Result<Decimal> {
        self.amount_out
            .checked_div(self.amount_in)
            .ok_or(AmmError::DivisionByZero)
    }

    /// Relative spot-price move caused by the trade,
    /// `|after - before| / before`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::DivisionByZero`] if the price before is zero.
    pub fn price_impact(&self) -> crate::error::Result<Decimal> {
        (self.price_after - self.price_before)
            .abs()
            .checked_div(self.price_before)
            .ok_or(AmmError::DivisionByZero)
    }
}

impl fmt::Display for SwapQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SwapQuote({}, in={}, out={}, fee={}, price {} -> {})",
            self.direction,
            self.amount_in,
            self.amount_out,
            self.fee_paid,
            self.price_before,
            self.price_after
        )
    }
}

/// Outcome of a concentrated-liquidity swap.
///
/// Amounts are raw token units.  `final_tick` is the pool's tick after the
/// swap: the greatest tick whose price does not exceed the final price,
/// except when a downward swap stops exactly on a crossed boundary `t`,
/// where it is `t - 1`.  `steps` counts bracket iterations and never
/// exceeds the number of initialized ticks plus one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SwapResult {
    pub(crate) direction: SwapDirection,
    pub(crate) amount_in: u128,
    pub(crate) amount_out: u128,
    pub(crate) fee_paid: u128,
    pub(crate) final_sqrt_price_x96: U256,
    pub(crate) final_tick: i32,
    pub(crate) ticks_crossed: u32,
    pub(crate) steps: u32,
}

impl SwapResult {
    /// Returns the swap direction.
    #[must_use]
    pub const fn direction(&self) -> SwapDirection {
        self.direction
    }

    /// Input consumed, fee included.
    #[must_use]
    pub const fn amount_in(&self) -> u128 {
        self.amount_in
    }

    /// Output produced across all brackets.
    #[must_use]
    pub const fn amount_out(&self) -> u128 {
        self.amount_out
    }

    /// Fee charged across all brackets.
    #[must_use]
    pub const fn fee_paid(&self) -> u128 {
        self.fee_paid
    }

    /// Square-root price (Q64.96) after the swap.
    #[must_use]
    pub const fn final_sqrt_price_x96(&self) -> U256 {
        self.final_sqrt_price_x96
    }

    /// Tick after the swap.
    #[must_use]
    pub const fn final_tick(&self) -> i32 {
        self.final_tick
    }

    /// Initialized tick boundaries crossed.
    #[must_use]
    pub const fn ticks_crossed(&self) -> u32 {
        self.ticks_crossed
    }

    /// Bracket iterations performed.
    #[must_use]
    pub const fn steps(&self) -> u32 {
        self.steps
    }
}

impl fmt::Display for SwapResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SwapResult({}, in={}, out={}, fee={}, tick={}, crossed={})",
            self.direction,
            self.amount_in,
            self.amount_out,
            self.fee_paid,
            self.final_tick,
            self.ticks_crossed
        )
    }
}
