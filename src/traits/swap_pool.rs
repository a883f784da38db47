//! Core swap trait shared by both pool kinds.
//!
//! [`SwapPool`] covers the full lifecycle of a swap:
//!
//! 1. **Quote**: [`SwapPool::simulate_swap`] prices a trade without
//!    touching state.
//! 2. **Execute**: [`SwapPool::execute_swap`] re-runs the same computation
//!    and commits it only if the output clears the caller's floor.
//! 3. **Inspect**: [`SwapPool::spot_price`], [`SwapPool::token_pair`] and
//!    [`SwapPool::fee_tier`].
//!
//! # Fee Deduction Invariant
//!
//! Every implementation deducts the fee from the input **before** the
//! pricing formula is applied:
//!
//! ```text
//! fee_amount = amount_in × bps / 10_000
//! net_input  = amount_in − fee_amount
//! amount_out = price_curve(net_input)
//! ```
//!
//! # Dispatch Model
//!
//! Pools are dispatched via the [`Pool`](crate::pools::Pool) enum, not
//! `dyn` trait objects.  Amount and outcome types differ per kind (decimal
//! quotes for constant-product, raw-unit results for concentrated
//! liquidity), so they are associated types.

use rust_decimal::Decimal;

use crate::domain::{FeeTier, SwapDirection, TokenPair};

/// Core trait for both AMM pool kinds.
///
/// # Atomicity
///
/// `execute_swap` either commits the whole trade or leaves the pool
/// observably unchanged; there are no partial fills.
pub trait SwapPool {
    /// Unit in which swap amounts are expressed.
    type Amount;

    /// What a swap reports back.
    type Outcome;

    /// Prices a swap of `amount_in` without mutating the pool.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidInput`](crate::error::AmmError::InvalidInput)
    ///   if `amount_in` is not positive or too small to trade.
    /// - [`AmmError::InsufficientLiquidity`](crate::error::AmmError::InsufficientLiquidity)
    ///   if the pool cannot fill it.
    fn simulate_swap(
        &self,
        amount_in: Self::Amount,
        direction: SwapDirection,
    ) -> crate::error::Result<Self::Outcome>;

    /// Executes a swap, committing only when the output is at least
    /// `min_amount_out`.
    ///
    /// # Errors
    ///
    /// Everything [`simulate_swap`](Self::simulate_swap) returns, plus
    /// [`AmmError::SlippageExceeded`](crate::error::AmmError::SlippageExceeded)
    /// when the output falls below the floor.
    fn execute_swap(
        &mut self,
        amount_in: Self::Amount,
        direction: SwapDirection,
        min_amount_out: Self::Amount,
    ) -> crate::error::Result<Self::Outcome>;

    /// Instantaneous marginal price, token1 per token0.
    ///
    /// # Errors
    ///
    /// Returns an arithmetic error if the price cannot be represented.
    fn spot_price(&self) -> crate::error::Result<Decimal>;

    /// Returns the token pair managed by this pool.
    fn token_pair(&self) -> &TokenPair;

    /// Returns the fee tier applied to swaps.
    fn fee_tier(&self) -> FeeTier;
}
