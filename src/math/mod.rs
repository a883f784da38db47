//! Arithmetic and fixed-point price utilities.
//!
//! - [`CheckedArithmetic`] for overflow-safe `Decimal` / `u128` operations.
//! - [`mul_div`] with a 512-bit intermediate and explicit rounding.
//! - Tick ⇄ Q64.96 square-root price conversions.
//! - Closed-form token amounts of a liquidity range and in-bracket price
//!   moves.
//!
//! # Fixed-point format
//!
//! | Quantity | Type | Scale |
//! |----------|------|-------|
//! | square-root price | `U256` | Q64.96 |
//! | fee growth per liquidity | `U256` | Q128.128 |
//! | V3 amounts, liquidity | `u128` | raw units |
//! | V2 amounts, shares | `Decimal` | 18 fractional digits |

mod checked;
pub(crate) mod full_math;
mod sqrt_price_math;
mod tick_math;

pub use checked::{AMOUNT_SCALE, CheckedArithmetic};
pub use full_math::{decimal_mul_div, decimal_sqrt_mul_div, mul_div};
pub(crate) use sqrt_price_math::{amount0_between, amount1_between};
pub use sqrt_price_math::{amount0_delta, amount1_delta, next_sqrt_price_from_input};
pub use tick_math::{
    MAX_SQRT_PRICE_X96, MIN_SQRT_PRICE_X96, floor_tick_at_sqrt_price, sqrt_price_at_tick,
    sqrt_price_to_price, tick_at_sqrt_price,
};
