//! Checked arithmetic for the engine's quantity types.
//!
//! The [`CheckedArithmetic`] trait provides fallible arithmetic operations
//! that return [`Result<Self, AmmError>`](crate::error::AmmError) instead
//! of panicking on overflow, underflow, or division by zero.
//!
//! # Implementations
//!
//! - [`Decimal`]: constant-product reserves, amounts and shares.  Values
//!   are non-negative quantities, so a negative difference is an
//!   underflow.  Division is quantized to [`AMOUNT_SCALE`] digits.
//! - `u128`: raw concentrated-liquidity amounts and liquidity.
//!
//! # Examples
//!
//! ```
//! use hydra_pool_engine::domain::Rounding;
//! use hydra_pool_engine::math::CheckedArithmetic;
//! use rust_decimal::Decimal;
//!
//! let third = Decimal::ONE.safe_div(&Decimal::from(3), Rounding::Down);
//! assert_eq!(third.map(|d| d.to_string()).ok(), Some("0.333333333333333333".into()));
//! ```

use rust_decimal::Decimal;

use crate::domain::Rounding;
use crate::error::AmmError;

/// Fractional digits kept for constant-product amounts and shares.
pub const AMOUNT_SCALE: u32 = 18;

/// Fallible arithmetic for quantity types.
///
/// # Contract
///
/// - **No panics**: all error conditions produce `Err`.
/// - **No saturation**: errors propagate instead.
pub trait CheckedArithmetic: Sized {
    /// Checked addition.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the result exceeds the
    /// representable range.
    fn safe_add(&self, other: &Self) -> Result<Self, AmmError>;

    /// Checked subtraction.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Underflow`] if the result would be negative.
    fn safe_sub(&self, other: &Self) -> Result<Self, AmmError>;

    /// Checked multiplication.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the result exceeds the
    /// representable range.
    fn safe_mul(&self, other: &Self) -> Result<Self, AmmError>;

    /// Checked division with explicit [`Rounding`] direction.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::DivisionByZero`] if `other` is zero.
    fn safe_div(&self, other: &Self, rounding: Rounding) -> Result<Self, AmmError>;
}

// ---------------------------------------------------------------------------
// Decimal
// ---------------------------------------------------------------------------

impl CheckedArithmetic for Decimal {
    #[inline]
    fn safe_add(&self, other: &Self) -> Result<Self, AmmError> {
        self.checked_add(*other)
            .ok_or(AmmError::Overflow("decimal addition overflow"))
    }

    fn safe_sub(&self, other: &Self) -> Result<Self, AmmError> {
        let diff = self
            .checked_sub(*other)
            .ok_or(AmmError::Overflow("decimal subtraction overflow"))?;
        if diff.is_sign_negative() && !diff.is_zero() {
            return Err(AmmError::Underflow("decimal subtraction underflow"));
        }
        Ok(diff)
    }

    #[inline]
    fn safe_mul(&self, other: &Self) -> Result<Self, AmmError> {
        self.checked_mul(*other)
            .ok_or(AmmError::Overflow("decimal multiplication overflow"))
    }

    fn safe_div(&self, other: &Self, rounding: Rounding) -> Result<Self, AmmError> {
        if other.is_zero() {
            return Err(AmmError::DivisionByZero);
        }
        self.checked_div(*other)
            .map(|q| rounding.quantize(q, AMOUNT_SCALE))
            .ok_or(AmmError::Overflow("decimal division overflow"))
    }
}

// ---------------------------------------------------------------------------
// u128
// ---------------------------------------------------------------------------

impl CheckedArithmetic for u128 {
    #[inline]
    fn safe_add(&self, other: &Self) -> Result<Self, AmmError> {
        self.checked_add(*other)
            .ok_or(AmmError::Overflow("u128 addition overflow"))
    }

    #[inline]
    fn safe_sub(&self, other: &Self) -> Result<Self, AmmError> {
        self.checked_sub(*other)
            .ok_or(AmmError::Underflow("u128 subtraction underflow"))
    }

    #[inline]
    fn safe_mul(&self, other: &Self) -> Result<Self, AmmError> {
        self.checked_mul(*other)
            .ok_or(AmmError::Overflow("u128 multiplication overflow"))
    }

    fn safe_div(&self, other: &Self, rounding: Rounding) -> Result<Self, AmmError> {
        if *other == 0 {
            return Err(AmmError::DivisionByZero);
        }
        let q = self / other;
        if rounding.is_up() && self % other != 0 {
            Ok(q + 1)
        } else {
            Ok(q)
        }
    }
}
