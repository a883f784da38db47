//! Token amounts held by a liquidity range, and in-bracket price moves.
//!
//! Over a price interval `[a, b]` (square roots in Q64.96) with liquidity
//! `L`:
//!
//! - token0: `Δx = L × (1/√a − 1/√b) = L × 2^96 × (b − a) / (a × b)`
//! - token1: `Δy = L × (√b − √a) = L × (b − a) / 2^96`
//!
//! Both are evaluated as one 512-bit numerator over one denominator, so the
//! only rounding is the final division.

use primitive_types::{U256, U512};

use super::full_math::{div_wide, mul_div, q96};
use crate::domain::{Rounding, SwapDirection};
use crate::error::AmmError;

fn check_bounds(sqrt_lower: U256, sqrt_upper: U256) -> crate::error::Result<()> {
    if sqrt_upper <= sqrt_lower {
        return Err(AmmError::InvalidRange(
            "upper sqrt price must exceed lower sqrt price",
        ));
    }
    Ok(())
}

/// Amount of token0 spanned by `liquidity` between two square-root prices.
///
/// # Errors
///
/// - [`AmmError::InvalidRange`] if `sqrt_upper <= sqrt_lower`.
/// - [`AmmError::DivisionByZero`] if `sqrt_lower` is zero.
/// - [`AmmError::Overflow`] if the amount exceeds 256 bits.
///
/// # Examples
///
/// ```
/// use hydra_pool_engine::domain::Rounding;
/// use hydra_pool_engine::math::{amount0_delta, sqrt_price_at_tick};
///
/// let lo = sqrt_price_at_tick(0).expect("in range");
/// let hi = sqrt_price_at_tick(1_000).expect("in range");
/// let down = amount0_delta(lo, hi, 10_000, Rounding::Down).expect("ordered");
/// let up = amount0_delta(lo, hi, 10_000, Rounding::Up).expect("ordered");
/// assert_eq!(down.as_u128() + 1, up.as_u128());
/// ```
pub fn amount0_delta(
    sqrt_lower: U256,
    sqrt_upper: U256,
    liquidity: u128,
    rounding: Rounding,
) -> crate::error::Result<U256> {
    check_bounds(sqrt_lower, sqrt_upper)?;
    amount0_between(sqrt_lower, sqrt_upper, liquidity, rounding)
}

/// Amount of token1 spanned by `liquidity` between two square-root prices.
///
/// # Errors
///
/// - [`AmmError::InvalidRange`] if `sqrt_upper <= sqrt_lower`.
/// - [`AmmError::Overflow`] if the amount exceeds 256 bits.
pub fn amount1_delta(
    sqrt_lower: U256,
    sqrt_upper: U256,
    liquidity: u128,
    rounding: Rounding,
) -> crate::error::Result<U256> {
    check_bounds(sqrt_lower, sqrt_upper)?;
    amount1_between(sqrt_lower, sqrt_upper, liquidity, rounding)
}

/// Unordered token0 amount; equal prices span nothing.
pub(crate) fn amount0_between(
    sqrt_a: U256,
    sqrt_b: U256,
    liquidity: u128,
    rounding: Rounding,
) -> crate::error::Result<U256> {
    let (lower, upper) = if sqrt_a <= sqrt_b {
        (sqrt_a, sqrt_b)
    } else {
        (sqrt_b, sqrt_a)
    };
    if lower == upper || liquidity == 0 {
        return Ok(U256::zero());
    }
    let scaled_liquidity = U256::from(liquidity) << 96;
    let numerator = scaled_liquidity.full_mul(upper - lower);
    let denominator = upper.full_mul(lower);
    div_wide(numerator, denominator, rounding)
}

/// Unordered token1 amount; equal prices span nothing.
pub(crate) fn amount1_between(
    sqrt_a: U256,
    sqrt_b: U256,
    liquidity: u128,
    rounding: Rounding,
) -> crate::error::Result<U256> {
    let (lower, upper) = if sqrt_a <= sqrt_b {
        (sqrt_a, sqrt_b)
    } else {
        (sqrt_b, sqrt_a)
    };
    if lower == upper || liquidity == 0 {
        return Ok(U256::zero());
    }
    mul_div(U256::from(liquidity), upper - lower, q96(), rounding)
}

/// Square-root price reached after adding `amount_in` of the input token
/// at constant `liquidity`.
///
/// - `ZeroForOne` (token0 in, price falls):
///   `√P' = L·2^96·√P / (L·2^96 + Δx·√P)`, rounded up.
/// - `OneForZero` (token1 in, price rises):
///   `√P' = √P + Δy·2^96 / L`, rounded down.
///
/// Both roundings keep the new price on the side that never over-delivers
/// output.
///
/// # Errors
///
/// - [`AmmError::InsufficientLiquidity`] if `liquidity` is zero.
/// - [`AmmError::Overflow`] if the new price leaves 256 bits.
pub fn next_sqrt_price_from_input(
    sqrt_price: U256,
    liquidity: u128,
    amount_in: U256,
    direction: SwapDirection,
) -> crate::error::Result<U256> {
    if liquidity == 0 {
        return Err(AmmError::InsufficientLiquidity);
    }
    if amount_in.is_zero() {
        return Ok(sqrt_price);
    }
    let scaled_liquidity = U256::from(liquidity) << 96;
    match direction {
        SwapDirection::ZeroForOne => {
            let numerator = scaled_liquidity.full_mul(sqrt_price);
            let denominator = U512::from(scaled_liquidity)
                .checked_add(amount_in.full_mul(sqrt_price))
                .ok_or(AmmError::Overflow("next sqrt price denominator overflow"))?;
            div_wide(numerator, denominator, Rounding::Up)
        }
        SwapDirection::OneForZero => {
            let delta = mul_div(amount_in, q96(), U256::from(liquidity), Rounding::Down)?;
            sqrt_price
                .checked_add(delta)
                .ok_or(AmmError::Overflow("next sqrt price overflow"))
        }
    }
}
