//! Exact conversions between tick indices and Q64.96 square-root prices.
//!
//! `sqrt_price_x96(tick) = 1.0001^(tick / 2) × 2^96`, computed with integer
//! arithmetic only: `|tick|` is decomposed into bits and the matching
//! precomputed Q128 factors `1.0001^(-2^i / 2)` are multiplied together.
//! Positive ticks take the reciprocal.  The result is rounded up to Q96 so
//! that [`floor_tick_at_sqrt_price`] recovers the tick exactly.
//!
//! # Functions
//!
//! | Function | Rounding |
//! |----------|----------|
//! | [`sqrt_price_at_tick`] | exact per tick, monotonic |
//! | [`floor_tick_at_sqrt_price`] | greatest tick with price ≤ input |
//! | [`tick_at_sqrt_price`] | nearest tick in log space, ties go up |
//! | [`sqrt_price_to_price`] | decimal price, truncated at 18 digits |
//!
//! # Examples
//!
//! ```
//! use hydra_pool_engine::math::{sqrt_price_at_tick, tick_at_sqrt_price};
//!
//! let sqrt_price = sqrt_price_at_tick(-1_000).expect("in range");
//! assert_eq!(tick_at_sqrt_price(sqrt_price), Ok(-1_000));
//! ```

use primitive_types::{U256, U512};
use rust_decimal::Decimal;

use crate::domain::{MAX_TICK, MIN_TICK};
use crate::error::AmmError;

/// Square-root price at [`MIN_TICK`].
pub const MIN_SQRT_PRICE_X96: U256 = U256([4_295_128_739, 0, 0, 0]);

/// Square-root price at [`MAX_TICK`]
/// (`1461446703485210103287273052203988822378723970342`).
pub const MAX_SQRT_PRICE_X96: U256 = U256([
    0x5d95_1d52_6398_8d26,
    0xefd1_fc6a_5064_8849,
    0x0000_0000_fffd_8963,
    0,
]);

/// Fractional digits kept by [`sqrt_price_to_price`].
const PRICE_SCALE: u32 = 18;

/// Q128 factor for bit 0 of `|tick|`.
const BIT0_FACTOR: u128 = 0xfffc_b933_bd6f_ad37_aa2d_162d_1a59_4001;

/// Q128 factors `1.0001^(-2^i / 2)` for bits 1..=19 of `|tick|`.
const BIT_FACTORS: [u128; 19] = [
    0xfff9_7272_373d_4132_59a4_6990_580e_213a,
    0xfff2_e50f_5f65_6932_ef12_357c_f3c7_fdcc,
    0xffe5_caca_7e10_e4e6_1c36_24ea_a094_1cd0,
    0xffcb_9843_d60f_6159_c9db_5883_5c92_6644,
    0xff97_3b41_fa98_c081_472e_6896_dfb2_54c0,
    0xff2e_a164_66c9_6a38_43ec_78b3_26b5_2861,
    0xfe5d_ee04_6a99_a2a8_11c4_61f1_969c_3053,
    0xfcbe_86c7_900a_88ae_dcff_c83b_479a_a3a4,
    0xf987_a725_3ac4_1317_6f2b_074c_f781_5e54,
    0xf339_2b08_22b7_0005_940c_7a39_8e4b_70f3,
    0xe715_9475_a2c2_9b74_43b2_9c7f_a6e8_89d9,
    0xd097_f3bd_fd20_22b8_845a_d8f7_92aa_5825,
    0xa9f7_4646_2d87_0fdf_8a65_dc1f_90e0_61e5,
    0x70d8_69a1_56d2_a1b8_90bb_3df6_2baf_32f7,
    0x31be_135f_97d0_8fd9_8123_1505_542f_cfa6,
    0x09aa_508b_5b7a_84e1_c677_de54_f3e9_9bc9,
    0x005d_6af8_dedb_8119_6699_c329_225e_e604,
    0x0000_2216_e584_f5fa_1ea9_2604_1bed_fe98,
    0x0000_0000_048a_1703_91f7_dc42_444e_8fa2,
];

/// Computes the Q64.96 square-root price at `tick`.
///
/// The result is `⌈1.0001^(tick/2) × 2^96⌉` up to the precision of the
/// Q128 factor table: the Q128 ratio is rounded up when narrowed to Q96,
/// so a tick's price is never below its exact value.
///
/// # Errors
///
/// Returns [`AmmError::TickOutOfBounds`] if `tick` is outside
/// `[MIN_TICK, MAX_TICK]`.
pub fn sqrt_price_at_tick(tick: i32) -> crate::error::Result<U256> {
    if !(MIN_TICK..=MAX_TICK).contains(&tick) {
        return Err(AmmError::TickOutOfBounds(
            "tick out of range [-887272, 887272]",
        ));
    }
    let abs_tick = tick.unsigned_abs();

    let mut ratio = if abs_tick & 1 != 0 {
        U256::from(BIT0_FACTOR)
    } else {
        U256::one() << 128
    };
    for (bit, factor) in BIT_FACTORS.iter().enumerate() {
        if abs_tick & (2 << bit) != 0 {
            // ratio <= 2^128 and factor < 2^128
            ratio = ratio
                .checked_mul(U256::from(*factor))
                .ok_or(AmmError::Overflow("tick ratio overflow"))?
                >> 128;
        }
    }
    if tick > 0 {
        ratio = U256::MAX / ratio;
    }

    // Q128 -> Q96, rounding up
    let low_bits = ratio & U256::from(u32::MAX);
    let mut sqrt_price = ratio >> 32;
    if !low_bits.is_zero() {
        sqrt_price += U256::one();
    }
    Ok(sqrt_price)
}

fn check_sqrt_price(sqrt_price: U256) -> crate::error::Result<()> {
    if sqrt_price < MIN_SQRT_PRICE_X96 || sqrt_price > MAX_SQRT_PRICE_X96 {
        return Err(AmmError::InvalidRange(
            "sqrt price outside [MIN_SQRT_PRICE_X96, MAX_SQRT_PRICE_X96]",
        ));
    }
    Ok(())
}

/// Greatest tick whose square-root price is `<= sqrt_price`.
///
/// This is the tick a pool sits in: liquidity of a range `[lower, upper)`
/// is active exactly when `lower <= floor_tick < upper`.
///
/// # Errors
///
/// Returns [`AmmError::InvalidRange`] if `sqrt_price` is outside
/// `[MIN_SQRT_PRICE_X96, MAX_SQRT_PRICE_X96]`.
pub fn floor_tick_at_sqrt_price(sqrt_price: U256) -> crate::error::Result<i32> {
    check_sqrt_price(sqrt_price)?;
    let (mut lo, mut hi) = (MIN_TICK, MAX_TICK);
    while lo < hi {
        let mid = lo + (hi - lo + 1) / 2;
        if sqrt_price_at_tick(mid)? <= sqrt_price {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }
    Ok(lo)
}

/// Nearest tick to `sqrt_price`, measured in log space.
///
/// With `t = floor_tick_at_sqrt_price(x)`, the result is `t + 1` when
/// `x² >= S(t) × S(t + 1)` (the geometric midpoint) and `t` otherwise, so
/// an exact midpoint rounds half-up.  Every tick's own price maps back to
/// that tick.
///
/// # Errors
///
/// Returns [`AmmError::InvalidRange`] if `sqrt_price` is outside
/// `[MIN_SQRT_PRICE_X96, MAX_SQRT_PRICE_X96]`.
pub fn tick_at_sqrt_price(sqrt_price: U256) -> crate::error::Result<i32> {
    let floor = floor_tick_at_sqrt_price(sqrt_price)?;
    if floor == MAX_TICK {
        return Ok(floor);
    }
    let lower = sqrt_price_at_tick(floor)?;
    let upper = sqrt_price_at_tick(floor + 1)?;
    if sqrt_price.full_mul(sqrt_price) >= lower.full_mul(upper) {
        Ok(floor + 1)
    } else {
        Ok(floor)
    }
}

/// Converts a Q64.96 square-root price into a decimal price
/// (`(sqrt_price / 2^96)²`), truncated toward zero.
///
/// Up to 18 fractional digits are kept; very large prices keep fewer so
/// the value fits a [`Decimal`] mantissa.
///
/// # Errors
///
/// Returns [`AmmError::Overflow`] if even the integer part exceeds the
/// decimal range.
pub fn sqrt_price_to_price(sqrt_price: U256) -> crate::error::Result<Decimal> {
    let squared = sqrt_price.full_mul(sqrt_price);
    for scale in (0..=PRICE_SCALE).rev() {
        let scaled = squared
            .checked_mul(U512::from(10u64.pow(scale)))
            .ok_or(AmmError::Overflow("price scaling overflow"))?
            >> 192;
        if scaled.bits() <= 96 {
            let mantissa = i128::try_from(scaled.low_u128())
                .map_err(|_| AmmError::Overflow("price mantissa overflow"))?;
            return Decimal::try_from_i128_with_scale(mantissa, scale)
                .map_err(|_| AmmError::Overflow("price does not fit a decimal"));
        }
    }
    Err(AmmError::Overflow("price does not fit a decimal"))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn at(tick: i32) -> U256 {
        let Ok(s) = sqrt_price_at_tick(tick) else {
            panic!("tick {tick} in range");
        };
        s
    }

    fn dec_u256(s: &str) -> U256 {
        let Ok(v) = U256::from_dec_str(s) else {
            panic!("valid decimal literal");
        };
        v
    }

    // -- sqrt_price_at_tick -------------------------------------------------

    #[test]
    fn tick_zero_is_q96() {
        assert_eq!(at(0), U256::one() << 96);
    }

    #[test]
    fn bounds_match_constants() {
        assert_eq!(at(MIN_TICK), MIN_SQRT_PRICE_X96);
        assert_eq!(at(MAX_TICK), MAX_SQRT_PRICE_X96);
        assert_eq!(
            MAX_SQRT_PRICE_X96,
            dec_u256("1461446703485210103287273052203988822378723970342")
        );
    }

    #[test]
    fn known_values() {
        assert_eq!(at(1), dec_u256("79232123823359799118286999568"));
        assert_eq!(at(-1), dec_u256("79224201403219477170569942574"));
        assert_eq!(at(100), dec_u256("79625275426524748796330556128"));
        assert_eq!(at(-1_000), dec_u256("75364347830767020784054125655"));
        assert_eq!(at(6_931), dec_u256("112040957517951813098925484553"));
        assert_eq!(at(-887_271), U256::from(4_295_343_490u64));
    }

    #[test]
    fn narrowing_rounds_up() {
        // exact values: ...999567.36, ...942573.10, ...556127.07
        assert_eq!(at(1) - U256::one(), dec_u256("79232123823359799118286999567"));
        assert_eq!(at(-1) - U256::one(), dec_u256("79224201403219477170569942573"));
        assert_eq!(at(100) - U256::one(), dec_u256("79625275426524748796330556127"));
        for t in [-1_000, -1, 1, 100, 6_931] {
            assert_eq!(floor_tick_at_sqrt_price(at(t)), Ok(t));
            assert_eq!(floor_tick_at_sqrt_price(at(t) - U256::one()), Ok(t - 1));
        }
    }

    #[test]
    fn out_of_range_ticks_rejected() {
        assert!(matches!(
            sqrt_price_at_tick(MAX_TICK + 1),
            Err(AmmError::TickOutOfBounds(_))
        ));
        assert!(sqrt_price_at_tick(MIN_TICK - 1).is_err());
    }

    #[test]
    fn strictly_monotonic_around_zero() {
        let mut prev = at(-50);
        for t in -49..=50 {
            let s = at(t);
            assert!(s > prev, "tick {t} not increasing");
            prev = s;
        }
    }

    // -- floor / nearest ----------------------------------------------------

    #[test]
    fn exact_tick_prices_round_trip() {
        for t in [MIN_TICK, -887_271, -1_000, -1, 0, 1, 60, 6_931, 887_271, MAX_TICK] {
            assert_eq!(floor_tick_at_sqrt_price(at(t)), Ok(t));
            assert_eq!(tick_at_sqrt_price(at(t)), Ok(t));
        }
    }

    #[test]
    fn just_below_a_tick() {
        let s = at(100) - U256::one();
        assert_eq!(floor_tick_at_sqrt_price(s), Ok(99));
        assert_eq!(tick_at_sqrt_price(s), Ok(100));
    }

    #[test]
    fn geometric_midpoint_rounds_half_up() {
        let product = at(0).full_mul(at(1));
        // integer square root of the product, by bisection
        let (mut lo, mut hi) = (at(0), at(1));
        while lo < hi {
            let mid = (lo + hi + U256::one()) >> 1;
            if mid.full_mul(mid) <= product {
                lo = mid;
            } else {
                hi = mid - U256::one();
            }
        }
        assert_eq!(lo, dec_u256("79230143144055124337141488499"));
        assert_eq!(tick_at_sqrt_price(lo), Ok(0));
        assert_eq!(tick_at_sqrt_price(lo + U256::one()), Ok(1));
        assert_eq!(floor_tick_at_sqrt_price(lo + U256::one()), Ok(0));
    }

    #[test]
    fn out_of_range_prices_rejected() {
        assert!(matches!(
            tick_at_sqrt_price(MIN_SQRT_PRICE_X96 - U256::one()),
            Err(AmmError::InvalidRange(_))
        ));
        assert!(floor_tick_at_sqrt_price(MAX_SQRT_PRICE_X96 + U256::one()).is_err());
    }

    // -- sqrt_price_to_price ------------------------------------------------

    #[test]
    fn price_at_tick_zero_is_one() {
        assert_eq!(sqrt_price_to_price(at(0)), Ok(dec!(1)));
    }

    #[test]
    fn price_at_tick_6931_is_about_two() {
        let Ok(p) = sqrt_price_to_price(at(6_931)) else {
            panic!("expected Ok");
        };
        assert!((p - dec!(2)).abs() < dec!(0.001), "got {p}");
    }

    #[test]
    fn price_at_max_tick_keeps_integer_part() {
        let Ok(p) = sqrt_price_to_price(MAX_SQRT_PRICE_X96) else {
            panic!("expected Ok");
        };
        assert!(p > dec!(3.4e38) / dec!(10_000_000_000), "got {p}");
    }
}
