//! Property-based tests using `proptest` for pool invariants.
//!
//! 1. **Invariant non-decrease**: `k` never falls across constant-product
//!    swaps with a positive fee.
//! 2. **Zero-fee round trip**: A→B→A with no fee restores the reserves.
//! 3. **Tick/price bijection**: `tick_at_sqrt_price(sqrt_price_at_tick(t)) == t`.
//! 4. **Position amount conservation**: open then close returns the
//!    amounts of the range at the current price.
//! 5. **Bracket termination**: a swap takes at most `N + 1` steps over
//!    `N` initialized ticks.
//! 6. **Active liquidity**: the tracked value always matches a recompute
//!    from the tick map.

use primitive_types::U256;
use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::config::PoolConfig;
use crate::domain::{AccountId, BasisPoints, FeeTier, Rounding, SwapDirection};
use crate::error::AmmError;
use crate::math::{
    amount0_between, amount1_between, floor_tick_at_sqrt_price, sqrt_price_at_tick,
    tick_at_sqrt_price,
};
use crate::pools::{ConcentratedLiquidityPool, ConstantProductPool};
use crate::traits::SwapPool;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn config(fee_bps: u32) -> PoolConfig {
    let Ok(cfg) = PoolConfig::from_tokens("ETH", "USDC", FeeTier::new(BasisPoints::new(fee_bps)))
    else {
        panic!("valid config");
    };
    cfg
}

fn make_cp(r0: u64, r1: u64, fee_bps: u32) -> ConstantProductPool {
    let Ok(pool) =
        ConstantProductPool::initialize(config(fee_bps), Decimal::from(r0), Decimal::from(r1))
    else {
        panic!("valid constant-product pool");
    };
    pool
}

fn make_clmm(tick: i32, fee_bps: u32) -> ConcentratedLiquidityPool {
    let Ok(start) = sqrt_price_at_tick(tick) else {
        panic!("tick in range");
    };
    let Ok(pool) = ConcentratedLiquidityPool::initialize(config(fee_bps), SPACING, start) else {
        panic!("valid concentrated pool");
    };
    pool
}

const SPACING: u32 = 10;

fn direction(zero_for_one: bool) -> SwapDirection {
    if zero_for_one {
        SwapDirection::ZeroForOne
    } else {
        SwapDirection::OneForZero
    }
}

/// Errors a well-formed swap may legitimately hit.
fn is_expected_swap_error(e: &AmmError) -> bool {
    matches!(
        e,
        AmmError::InsufficientLiquidity | AmmError::InvalidInput(_)
    )
}

// ---------------------------------------------------------------------------
// Custom strategies
// ---------------------------------------------------------------------------

/// Reserve values in [10_000, 10_000_000].
fn reserve_strategy() -> impl Strategy<Value = u64> {
    10_000u64..=10_000_000u64
}

fn tick_strategy() -> impl Strategy<Value = i32> {
    crate::domain::MIN_TICK..=crate::domain::MAX_TICK
}

/// `(lower, upper, liquidity)` with spacing-aligned ticks around zero.
fn range_strategy() -> impl Strategy<Value = (i32, i32, u128)> {
    (-200i32..200, 1i32..60, 1_000u64..1_000_000_000)
        .prop_map(|(lower, width, liquidity)| {
            let spacing = SPACING as i32;
            (lower * spacing, (lower + width) * spacing, u128::from(liquidity))
        })
}

fn swaps_strategy() -> impl Strategy<Value = Vec<(bool, u64)>> {
    prop::collection::vec((any::<bool>(), 1u64..5_000_000), 1..12)
}

// ---------------------------------------------------------------------------
// Property 1: Invariant non-decrease
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_invariant_never_decreases(
        r0 in reserve_strategy(),
        r1 in reserve_strategy(),
        fee_bps in 1u32..=100,
        swaps in swaps_strategy(),
    ) {
        let mut pool = make_cp(r0, r1, fee_bps);
        for (zero_for_one, amount) in swaps {
            let Ok(k_before) = pool.invariant() else {
                return Ok(());
            };
            match pool.execute_swap(Decimal::from(amount), direction(zero_for_one), Decimal::ZERO) {
                Ok(_) => {}
                Err(e) => {
                    prop_assert!(is_expected_swap_error(&e), "unexpected error {e}");
                    continue;
                }
            }
            let Ok(k_after) = pool.invariant() else {
                return Ok(());
            };
            prop_assert!(
                k_after >= k_before,
                "k decreased: {} < {}",
                k_after, k_before
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Property 2: Zero-fee round trip
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_zero_fee_round_trip_restores_reserves(
        r0 in reserve_strategy(),
        r1 in reserve_strategy(),
        divisor in 2u64..1_000,
    ) {
        let mut pool = make_cp(r0, r1, 0);
        let amount_in = Decimal::from((r0 / divisor).max(1));

        let Ok(there) = pool.execute_swap(amount_in, SwapDirection::ZeroForOne, Decimal::ZERO)
        else {
            return Ok(());
        };
        let Ok(back) = pool.execute_swap(there.amount_out(), SwapDirection::OneForZero, Decimal::ZERO)
        else {
            return Ok(());
        };

        let tolerance = Decimal::new(1, 9);
        prop_assert!(back.amount_out() <= amount_in);
        prop_assert!((pool.reserve0() - Decimal::from(r0)).abs() <= tolerance);
        prop_assert!((pool.reserve1() - Decimal::from(r1)).abs() <= tolerance);
    }
}

// ---------------------------------------------------------------------------
// Property 3: Tick/price bijection
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_tick_price_bijection(tick in tick_strategy()) {
        let Ok(sqrt_price) = sqrt_price_at_tick(tick) else {
            panic!("tick in range");
        };
        prop_assert_eq!(tick_at_sqrt_price(sqrt_price), Ok(tick));
        prop_assert_eq!(floor_tick_at_sqrt_price(sqrt_price), Ok(tick));
    }

    #[test]
    fn prop_sqrt_price_strictly_increasing(tick in -887_271i32..=887_271) {
        let (Ok(here), Ok(next)) = (sqrt_price_at_tick(tick), sqrt_price_at_tick(tick + 1)) else {
            panic!("ticks in range");
        };
        prop_assert!(here < next);
    }
}

// ---------------------------------------------------------------------------
// Property 4: Position amount conservation
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_open_close_conserves_amounts(
        start in -3_000i32..3_000,
        (lower, upper, liquidity) in range_strategy(),
    ) {
        let mut pool = make_clmm(start, 30);
        let fresh = pool.clone();
        let Ok(opened) = pool.open_position(AccountId::from("lp"), lower, upper, liquidity) else {
            panic!("valid range");
        };
        let Ok(closed) = pool.close_position(opened.id) else {
            panic!("position open");
        };

        let (Ok(sa), Ok(sb)) = (sqrt_price_at_tick(lower), sqrt_price_at_tick(upper)) else {
            panic!("ticks in range");
        };
        let s = pool.sqrt_price_x96();
        let current = pool.current_tick();
        let (expected0, expected1) = if current < lower {
            (amount0_between(sa, sb, liquidity, Rounding::Down), Ok(U256::zero()))
        } else if current >= upper {
            (Ok(U256::zero()), amount1_between(sa, sb, liquidity, Rounding::Down))
        } else {
            (
                amount0_between(s, sb, liquidity, Rounding::Down),
                amount1_between(sa, s, liquidity, Rounding::Down),
            )
        };

        prop_assert_eq!(expected0, Ok(U256::from(closed.amount0)));
        prop_assert_eq!(expected1, Ok(U256::from(closed.amount1)));
        prop_assert!(opened.amount0 - closed.amount0 <= 1);
        prop_assert!(opened.amount1 - closed.amount1 <= 1);
        prop_assert_eq!(pool.active_liquidity(), fresh.active_liquidity());
        prop_assert_eq!(pool.initialized_ticks().count(), 0);
    }
}

// ---------------------------------------------------------------------------
// Properties 5 and 6: Bracket termination and active liquidity
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(96))]

    #[test]
    fn prop_steps_bounded_by_initialized_ticks(
        ranges in prop::collection::vec(range_strategy(), 1..8),
        zero_for_one in any::<bool>(),
        amount in 1u64..u64::MAX,
    ) {
        let mut pool = make_clmm(0, 5);
        for (lower, upper, liquidity) in ranges {
            let Ok(_) = pool.open_position(AccountId::from("lp"), lower, upper, liquidity) else {
                panic!("valid range");
            };
        }
        let bound = pool.initialized_ticks().count() + 1;
        match pool.simulate_swap(u128::from(amount), direction(zero_for_one)) {
            Ok(result) => {
                let steps = usize::try_from(result.steps()).unwrap_or(usize::MAX);
                prop_assert!(steps <= bound, "{} steps over {} brackets", steps, bound);
                prop_assert!(result.ticks_crossed() <= result.steps());
            }
            Err(e) => prop_assert!(is_expected_swap_error(&e), "unexpected error {e}"),
        }
    }

    #[test]
    fn prop_active_liquidity_matches_tick_map(
        ranges in prop::collection::vec(range_strategy(), 1..8),
        swaps in swaps_strategy(),
    ) {
        let mut pool = make_clmm(0, 30);
        for (lower, upper, liquidity) in ranges {
            let Ok(_) = pool.open_position(AccountId::from("lp"), lower, upper, liquidity) else {
                panic!("valid range");
            };
        }
        for (zero_for_one, amount) in swaps {
            let before = pool.clone();
            match pool.execute_swap(u128::from(amount), direction(zero_for_one), 0) {
                Ok(result) => {
                    prop_assert_eq!(result.final_tick(), pool.current_tick());
                    prop_assert_eq!(result.final_sqrt_price_x96(), pool.sqrt_price_x96());
                }
                Err(e) => {
                    prop_assert!(is_expected_swap_error(&e), "unexpected error {e}");
                    prop_assert_eq!(&pool, &before);
                }
            }
            prop_assert_eq!(pool.recompute_active_liquidity(), Ok(pool.active_liquidity()));
        }

        let ids: Vec<_> = pool.positions().map(|(id, _)| id).collect();
        for id in ids {
            let Ok(_) = pool.close_position(id) else {
                panic!("position open");
            };
            prop_assert_eq!(pool.recompute_active_liquidity(), Ok(pool.active_liquidity()));
        }
        prop_assert_eq!(pool.active_liquidity(), 0);
        prop_assert_eq!(pool.initialized_ticks().count(), 0);
    }
}
