//! 512-bit intermediate multiplication and division.
//!
//! Every product of two 256-bit operands in the concentrated-liquidity
//! math is formed as a [`U512`] before dividing, so no intermediate can
//! silently wrap.  Results must fit back into [`U256`].
//!
//! The constant-product pool routes its `Decimal` products through the
//! same 512-bit path ([`decimal_mul_div`], [`decimal_sqrt_mul_div`]): a
//! `Decimal` holds at most about `7.9 × 10^28`, so `reserve × amount`
//! overflows long before the quotient does.
//!
//! # Convention
//!
//! **Always round against the user** (protocol-favorable):
//!
//! | Quantity | Direction |
//! |----------|-----------|
//! | Output amount | [`Rounding::Down`] |
//! | Input amount | [`Rounding::Up`] |
//! | Fee amount | [`Rounding::Up`] |
//!
//! # Examples
//!
//! ```
//! use hydra_pool_engine::domain::Rounding;
//! use hydra_pool_engine::math::mul_div;
//! use primitive_types::U256;
//!
//! let r = mul_div(U256::from(10), U256::from(1), U256::from(3), Rounding::Up);
//! assert_eq!(r, Ok(U256::from(4)));
//! ```

use primitive_types::{U256, U512};
use rust_decimal::Decimal;

use super::checked::AMOUNT_SCALE;
use crate::domain::Rounding;
use crate::error::AmmError;

/// `2^96` as a [`U256`].
pub(crate) fn q96() -> U256 {
    U256::one() << 96
}

/// `2^128` as a [`U256`].
pub(crate) fn q128() -> U256 {
    U256::one() << 128
}

/// Computes `a × b / denominator` with a 512-bit intermediate.
///
/// # Errors
///
/// - [`AmmError::DivisionByZero`] if `denominator` is zero.
/// - [`AmmError::Overflow`] if the quotient does not fit 256 bits.
pub fn mul_div(a: U256, b: U256, denominator: U256, rounding: Rounding) -> crate::error::Result<U256> {
    div_wide(a.full_mul(b), U512::from(denominator), rounding)
}

/// Divides a 512-bit numerator by a 512-bit denominator, rounding as asked.
///
/// # Errors
///
/// - [`AmmError::DivisionByZero`] if `denominator` is zero.
/// - [`AmmError::Overflow`] if the quotient does not fit 256 bits.
pub(crate) fn div_wide(
    numerator: U512,
    denominator: U512,
    rounding: Rounding,
) -> crate::error::Result<U256> {
    if denominator.is_zero() {
        return Err(AmmError::DivisionByZero);
    }
    let (mut quotient, remainder) = numerator.div_mod(denominator);
    if rounding.is_up() && !remainder.is_zero() {
        quotient = quotient
            .checked_add(U512::one())
            .ok_or(AmmError::Overflow("mul_div rounding overflow"))?;
    }
    U256::try_from(quotient).map_err(|_| AmmError::Overflow("mul_div result exceeds 256 bits"))
}

/// Computes `a × b / c` for non-negative decimals without forming the
/// product as a `Decimal`.
///
/// The quotient is rounded to [`AMOUNT_SCALE`] digits in the requested
/// direction.  A quotient too large to carry 18 fractional digits keeps
/// as many as fit, still rounded the same way.
///
/// # Errors
///
/// - [`AmmError::InvalidInput`] if an operand is negative.
/// - [`AmmError::DivisionByZero`] if `c` is zero.
/// - [`AmmError::Overflow`] if the quotient exceeds the `Decimal` range.
///
/// # Examples
///
/// ```
/// use hydra_pool_engine::domain::Rounding;
/// use hydra_pool_engine::math::decimal_mul_div;
/// use rust_decimal::Decimal;
///
/// let big = Decimal::from(10_000_000_000_000_000u64);
/// let r = decimal_mul_div(big, big, big, Rounding::Down);
/// assert_eq!(r, Ok(big));
/// ```
pub fn decimal_mul_div(
    a: Decimal,
    b: Decimal,
    c: Decimal,
    rounding: Rounding,
) -> crate::error::Result<Decimal> {
    let (ma, sa) = decimal_parts(a)?;
    let (mb, sb) = decimal_parts(b)?;
    let (mc, sc) = decimal_parts(c)?;
    if mc.is_zero() {
        return Err(AmmError::DivisionByZero);
    }
    // units = a·b/c · 10^18 = ma·mb·10^(sc + 18) / (mc·10^(sa + sb))
    let (numerator, denominator) = scaled_fraction(ma, mb, mc, sc + AMOUNT_SCALE, sa + sb)?;
    let (mut units, remainder) = numerator.div_mod(denominator);
    if rounding.is_up() && !remainder.is_zero() {
        units = units + U512::one();
    }
    narrow_to_decimal(units, rounding)
}

/// Computes `√(a × b / c)` for non-negative decimals, truncated to
/// [`AMOUNT_SCALE`] digits (fewer when the root is too large to carry
/// them).
///
/// With `c = 1` this is the geometric mean used for genesis LP shares.
///
/// # Errors
///
/// - [`AmmError::InvalidInput`] if an operand is negative.
/// - [`AmmError::DivisionByZero`] if `c` is zero.
/// - [`AmmError::Overflow`] if the root exceeds the `Decimal` range.
pub fn decimal_sqrt_mul_div(a: Decimal, b: Decimal, c: Decimal) -> crate::error::Result<Decimal> {
    let (ma, sa) = decimal_parts(a)?;
    let (mb, sb) = decimal_parts(b)?;
    let (mc, sc) = decimal_parts(c)?;
    if mc.is_zero() {
        return Err(AmmError::DivisionByZero);
    }
    // root·10^18 = √(ma·mb·10^(sc + 36) / (mc·10^(sa + sb))); ⌊√⌊y⌋⌋ = ⌊√y⌋
    let (numerator, denominator) =
        scaled_fraction(ma, mb, mc, sc + 2 * AMOUNT_SCALE, sa + sb)?;
    let units = (numerator / denominator).integer_sqrt();
    narrow_to_decimal(units, Rounding::Down)
}

/// Unsigned mantissa and scale of a non-negative decimal.
fn decimal_parts(value: Decimal) -> crate::error::Result<(U512, u32)> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(AmmError::InvalidInput("decimal operand must be non-negative"));
    }
    Ok((U512::from(value.mantissa().unsigned_abs()), value.scale()))
}

/// Builds `ma·mb·10^up / (mc·10^down)` with the common power of ten
/// cancelled.
fn scaled_fraction(
    ma: U512,
    mb: U512,
    mc: U512,
    up: u32,
    down: u32,
) -> crate::error::Result<(U512, U512)> {
    let overflow = || AmmError::Overflow("wide decimal intermediate overflow");
    let product = ma.checked_mul(mb).ok_or_else(overflow)?;
    if up >= down {
        let shift = U512::exp10((up - down) as usize);
        Ok((product.checked_mul(shift).ok_or_else(overflow)?, mc))
    } else {
        let shift = U512::exp10((down - up) as usize);
        Ok((product, mc.checked_mul(shift).ok_or_else(overflow)?))
    }
}

/// Converts a count of `10^-18` units into a `Decimal`, dropping
/// fractional digits (rounded as asked) until the mantissa fits 96 bits.
fn narrow_to_decimal(mut units: U512, rounding: Rounding) -> crate::error::Result<Decimal> {
    let ten = U512::from(10u8);
    let mut scale = AMOUNT_SCALE;
    while units.bits() > 96 {
        if scale == 0 {
            return Err(AmmError::Overflow("decimal result exceeds 96 bits"));
        }
        let (quotient, remainder) = units.div_mod(ten);
        units = if rounding.is_up() && !remainder.is_zero() {
            quotient + U512::one()
        } else {
            quotient
        };
        scale -= 1;
    }
    let mantissa = i128::try_from(units.low_u128())
        .map_err(|_| AmmError::Overflow("decimal result exceeds 96 bits"))?;
    Decimal::try_from_i128_with_scale(mantissa, scale)
        .map(|d| d.normalize())
        .map_err(|_| AmmError::Overflow("decimal result exceeds 96 bits"))
}

/// Narrows a [`U256`] to `u128`.
///
/// # Errors
///
/// Returns [`AmmError::Overflow`] with `context` if the value needs more
/// than 128 bits.
pub(crate) fn to_u128(value: U256, context: &'static str) -> crate::error::Result<u128> {
    if value.bits() > 128 {
        return Err(AmmError::Overflow(context));
    }
    Ok(value.low_u128())
}
