//! Unified error types for the pool engine.
//!
//! All fallible operations across the crate return [`AmmError`] as their
//! error type.  Each variant maps to one failure kind so that callers
//! (stress scenarios, pricing code) can tell "slippage breached" from
//! "pool insolvent" from "bad input" without string matching.

/// Crate-wide result alias.
pub type Result<T> = core::result::Result<T, AmmError>;

/// Every failure the pool engine can surface.
///
/// Most variants carry a static context string describing which check
/// failed; the kind itself is the contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmmError {
    /// Pool parameters are invalid (non-positive reserves, fee out of range,
    /// zero tick spacing, price outside the representable range, ...).
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    /// A caller-supplied amount is not acceptable (non-positive, fractional
    /// where raw units are required, too small to have an effect).
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    /// A tick or price range is malformed (`lower >= upper`).
    #[error("invalid range: {0}")]
    InvalidRange(&'static str),

    /// A tick is outside `[MIN_TICK, MAX_TICK]` or misaligned to the
    /// pool's tick spacing.
    #[error("tick out of bounds: {0}")]
    TickOutOfBounds(&'static str),

    /// The swap would drain a reserve or needs to move the price through a
    /// range with no active liquidity.
    #[error("insufficient liquidity")]
    InsufficientLiquidity,

    /// Realized output fell below the caller's floor.
    #[error("slippage exceeded: amount out {amount_out} < minimum {min_amount_out}")]
    SlippageExceeded {
        /// Output the swap would have produced.
        amount_out: String,
        /// Floor requested by the caller.
        min_amount_out: String,
    },

    /// A withdrawal asks for more shares than the caller holds.
    #[error("insufficient shares: {0}")]
    InsufficientShares(&'static str),

    /// The pool tag is not recognised or its feature is not compiled in.
    #[error("unsupported pool variant: {0}")]
    UnsupportedPoolVariant(String),

    /// Arithmetic left the representable range.
    #[error("arithmetic overflow: {0}")]
    Overflow(&'static str),

    /// A subtraction would go below zero.
    #[error("arithmetic underflow: {0}")]
    Underflow(&'static str),

    /// Division by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// No position exists with the given identifier.
    #[error("position not found")]
    PositionNotFound,

    /// No pool is registered under the given market identifier.
    #[error("unknown market: {0}")]
    UnknownMarket(String),

    /// The configuration document could not be parsed.
    #[error("configuration parse error: {0}")]
    Config(String),
}

impl AmmError {
    /// Builds a [`SlippageExceeded`](Self::SlippageExceeded) error from any
    /// displayable amounts.
    pub fn slippage(amount_out: impl core::fmt::Display, min_amount_out: impl core::fmt::Display) -> Self {
        Self::SlippageExceeded {
            amount_out: amount_out.to_string(),
            min_amount_out: min_amount_out.to_string(),
        }
    }

    /// Returns `true` for errors caused by the caller's slippage floor.
    #[must_use]
    pub const fn is_slippage(&self) -> bool {
        matches!(self, Self::SlippageExceeded { .. })
    }
}
