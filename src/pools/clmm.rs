//! Concentrated-liquidity pool implementation (Uniswap V3 style).
//!
//! Liquidity is provided over tick ranges `[lower, upper)`.  Inside a
//! single bracket between two initialized ticks the pool behaves as a
//! constant-product curve parameterised by `√P` (Q64.96) and the active
//! liquidity `L`.
//!
//! # Swap Algorithm
//!
//! 1. Find the next initialized tick in the swap direction (or the price
//!    bound when none is left).
//! 2. Compute the input the bracket can absorb before the price reaches that
//!    boundary, and compare it with the remaining input net of fee.
//! 3. If the bracket is exhausted, move to the boundary, apply the tick's
//!    `liquidity_net` and repeat.
//! 4. Otherwise solve the partial move inside the bracket and stop.
//!
//! The whole loop runs against local copies of the state; nothing is
//! written back unless the swap succeeds and clears the slippage floor.
//!
//! # Fee Tracking
//!
//! Global Q128 `fee_growth_global{0,1}` counters track fees per unit of
//! liquidity.  Per-tick `fee_growth_outside` values and per-position
//! `fee_growth_inside_last` snapshots give each position its share.  All
//! fee-growth arithmetic wraps modulo 2^256.

use std::collections::BTreeMap;
use std::ops::Bound;

use primitive_types::U256;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::config::{ClmmConfig, PoolConfig};
use crate::domain::{
    AccountId, ClosedPosition, FeeTier, OpenedPosition, PositionId, RangePosition, Rounding,
    SwapDirection, SwapResult, Tick, TokenPair,
};
use crate::error::AmmError;
use crate::math::full_math::{q128, to_u128};
use crate::math::{
    CheckedArithmetic, MAX_SQRT_PRICE_X96, MIN_SQRT_PRICE_X96, amount0_between, amount1_between,
    floor_tick_at_sqrt_price, mul_div, next_sqrt_price_from_input, sqrt_price_at_tick,
    sqrt_price_to_price,
};
use crate::traits::{FromConfig, SwapPool};

/// Basis-point denominator (10 000 = 100%).
const BPS_DENOMINATOR: u32 = 10_000;

// ---------------------------------------------------------------------------
// Internal data structures
// ---------------------------------------------------------------------------

/// Per-tick state stored in the tick map.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct TickState {
    /// Total liquidity referencing this tick; the entry is dropped at zero.
    liquidity_gross: u128,
    /// Net liquidity change when the price crosses this tick upwards.
    liquidity_net: i128,
    /// Fee growth (token0) on the other side of this tick, Q128.
    fee_growth_outside0: U256,
    /// Fee growth (token1) on the other side of this tick, Q128.
    fee_growth_outside1: U256,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PositionState {
    range: RangePosition,
    fee_growth_inside0_last: U256,
    fee_growth_inside1_last: U256,
}

/// A tick crossed during a swap, with the global fee growth at the moment
/// of crossing.
#[derive(Debug, Clone, Copy)]
struct Crossing {
    tick: i32,
    fee_growth_global0: U256,
    fee_growth_global1: U256,
}

/// Everything a swap would change, computed without touching the pool.
#[derive(Debug, Clone)]
struct SwapComputation {
    result: SwapResult,
    liquidity: u128,
    fee_growth_global0: U256,
    fee_growth_global1: U256,
    crossings: Vec<Crossing>,
}

fn wrapping_sub(a: U256, b: U256) -> U256 {
    a.overflowing_sub(b).0
}

fn wrapping_add(a: U256, b: U256) -> U256 {
    a.overflowing_add(b).0
}

fn apply_liquidity_delta(liquidity: u128, delta: i128) -> crate::error::Result<u128> {
    if delta >= 0 {
        liquidity
            .checked_add(delta.unsigned_abs())
            .ok_or(AmmError::Overflow("active liquidity overflow"))
    } else {
        liquidity
            .checked_sub(delta.unsigned_abs())
            .ok_or(AmmError::Underflow("active liquidity underflow"))
    }
}

// ---------------------------------------------------------------------------
// ConcentratedLiquidityPool
// ---------------------------------------------------------------------------

/// A concentrated-liquidity pool.
///
/// # State
///
/// - `sqrt_price_x96`: the authoritative price, Q64.96
/// - `current_tick`: `floor_tick_at_sqrt_price(sqrt_price_x96)`, or `t - 1`
///   right after a downward swap stopped exactly on a crossed tick `t`
/// - `active_liquidity`: sum of the liquidity of every position whose range
///   contains `current_tick`
/// - `ticks`: ordered map of initialized ticks
/// - `positions`: open positions keyed by [`PositionId`]
///
/// # Example
///
/// ```rust
/// use hydra_pool_engine::config::PoolConfig;
/// use hydra_pool_engine::domain::{AccountId, FeeTier, SwapDirection};
/// use hydra_pool_engine::math::sqrt_price_at_tick;
/// use hydra_pool_engine::pools::ConcentratedLiquidityPool;
/// use hydra_pool_engine::traits::SwapPool;
///
/// let cfg = PoolConfig::from_tokens("ETH", "USDC", FeeTier::TIER_0_05_PERCENT).expect("valid");
/// let start = sqrt_price_at_tick(0).expect("in range");
/// let mut pool = ConcentratedLiquidityPool::initialize(cfg, 10, start).expect("pool created");
/// pool.open_position(AccountId::from("lp"), -1_000, 1_000, 10_000).expect("opened");
///
/// let result = pool.execute_swap(100, SwapDirection::ZeroForOne, 90).expect("swap ok");
/// assert_eq!(result.amount_out(), 98);
/// assert_eq!(pool.current_tick(), -198);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcentratedLiquidityPool {
    config: PoolConfig,
    tick_spacing: u32,
    sqrt_price_x96: U256,
    current_tick: i32,
    active_liquidity: u128,
    fee_growth_global0: U256,
    fee_growth_global1: U256,
    ticks: BTreeMap<i32, TickState>,
    positions: BTreeMap<PositionId, PositionState>,
    next_position_id: u64,
}

impl ConcentratedLiquidityPool {
    /// Creates an empty pool at `initial_sqrt_price_x96`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidConfig`] if the spacing is outside
    ///   `1..=887272` or the price is outside
    ///   `[MIN_SQRT_PRICE_X96, MAX_SQRT_PRICE_X96]`.
    pub fn initialize(
        config: PoolConfig,
        tick_spacing: u32,
        initial_sqrt_price_x96: U256,
    ) -> crate::error::Result<Self> {
        config.validate()?;
        if tick_spacing == 0 || tick_spacing > crate::domain::MAX_TICK.unsigned_abs() {
            return Err(AmmError::InvalidConfig("tick spacing must be in 1..=887272"));
        }
        if initial_sqrt_price_x96 < MIN_SQRT_PRICE_X96
            || initial_sqrt_price_x96 > MAX_SQRT_PRICE_X96
        {
            return Err(AmmError::InvalidConfig(
                "initial sqrt price outside [MIN_SQRT_PRICE_X96, MAX_SQRT_PRICE_X96]",
            ));
        }
        let current_tick = floor_tick_at_sqrt_price(initial_sqrt_price_x96)?;

        info!(
            token0 = %config.token_pair().token0(),
            token1 = %config.token_pair().token1(),
            fee = %config.fee_tier(),
            tick_spacing,
            current_tick,
            "Concentrated-liquidity pool initialized"
        );

        Ok(Self {
            config,
            tick_spacing,
            sqrt_price_x96: initial_sqrt_price_x96,
            current_tick,
            active_liquidity: 0,
            fee_growth_global0: U256::zero(),
            fee_growth_global1: U256::zero(),
            ticks: BTreeMap::new(),
            positions: BTreeMap::new(),
            next_position_id: 1,
        })
    }

    /// Current square-root price, Q64.96.
    #[must_use]
    pub const fn sqrt_price_x96(&self) -> U256 {
        self.sqrt_price_x96
    }

    /// Current tick.
    #[must_use]
    pub const fn current_tick(&self) -> i32 {
        self.current_tick
    }

    /// Liquidity active at the current tick.
    #[must_use]
    pub const fn active_liquidity(&self) -> u128 {
        self.active_liquidity
    }

    /// Spacing every position boundary must be a multiple of.
    #[must_use]
    pub const fn tick_spacing(&self) -> u32 {
        self.tick_spacing
    }

    /// Global token0 fee growth per unit of liquidity, Q128.
    #[must_use]
    pub const fn fee_growth_global0(&self) -> U256 {
        self.fee_growth_global0
    }

    /// Global token1 fee growth per unit of liquidity, Q128.
    #[must_use]
    pub const fn fee_growth_global1(&self) -> U256 {
        self.fee_growth_global1
    }

    /// Snapshot of an open position.
    #[must_use]
    pub fn position(&self, id: PositionId) -> Option<&RangePosition> {
        self.positions.get(&id).map(|state| &state.range)
    }

    /// Open positions in id order.
    pub fn positions(&self) -> impl Iterator<Item = (PositionId, &RangePosition)> {
        self.positions.iter().map(|(id, state)| (*id, &state.range))
    }

    /// Number of open positions.
    #[must_use]
    pub fn position_count(&self) -> usize {
        self.positions.len()
    }

    /// Initialized ticks in ascending order.
    pub fn initialized_ticks(&self) -> impl Iterator<Item = i32> + '_ {
        self.ticks.keys().copied()
    }

    /// `liquidity_net` stored at `tick`, if initialized.
    #[must_use]
    pub fn liquidity_net(&self, tick: i32) -> Option<i128> {
        self.ticks.get(&tick).map(|state| state.liquidity_net)
    }

    /// Recomputes the active liquidity from the tick map: the sum of
    /// `liquidity_net` over every initialized tick `<= current_tick`.
    ///
    /// Always equals [`active_liquidity`](Self::active_liquidity).
    ///
    /// # Errors
    ///
    /// Returns an arithmetic error if the running sum leaves `u128`.
    pub fn recompute_active_liquidity(&self) -> crate::error::Result<u128> {
        self.ticks
            .range(..=self.current_tick)
            .try_fold(0u128, |acc, (_, state)| {
                apply_liquidity_delta(acc, state.liquidity_net)
            })
    }

    // -- positions ------------------------------------------------------------

    /// Opens a position of `liquidity` over `[lower_tick, upper_tick)`.
    ///
    /// Returns the new id and the token amounts the owner deposits, both
    /// rounded up.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidRange`] if `lower_tick >= upper_tick`.
    /// - [`AmmError::TickOutOfBounds`] if a tick is outside
    ///   `[MIN_TICK, MAX_TICK]` or not a multiple of the spacing.
    /// - [`AmmError::InvalidInput`] if `liquidity` is zero or above
    ///   `i128::MAX`.
    pub fn open_position(
        &mut self,
        owner: AccountId,
        lower_tick: i32,
        upper_tick: i32,
        liquidity: u128,
    ) -> crate::error::Result<OpenedPosition> {
        if lower_tick >= upper_tick {
            return Err(AmmError::InvalidRange(
                "lower tick must be less than upper tick",
            ));
        }
        let lower = Tick::aligned(lower_tick, self.tick_spacing)?;
        let upper = Tick::aligned(upper_tick, self.tick_spacing)?;
        if liquidity == 0 {
            return Err(AmmError::InvalidInput("position liquidity must be positive"));
        }
        let net = i128::try_from(liquidity)
            .map_err(|_| AmmError::InvalidInput("position liquidity exceeds i128::MAX"))?;
        let range = RangePosition::new(owner, lower, upper, liquidity)?;

        let lower_state = self.tick_with_added(lower_tick, liquidity, net)?;
        let upper_state = self.tick_with_added(upper_tick, liquidity, -net)?;
        let active = if range.is_in_range(self.current_tick) {
            self.active_liquidity.safe_add(&liquidity)?
        } else {
            self.active_liquidity
        };
        let (amount0, amount1) =
            self.range_amounts(lower_tick, upper_tick, liquidity, Rounding::Up)?;
        let id = PositionId::new(self.next_position_id);
        let next_position_id = self
            .next_position_id
            .checked_add(1)
            .ok_or(AmmError::Overflow("position id overflow"))?;

        self.ticks.insert(lower_tick, lower_state);
        self.ticks.insert(upper_tick, upper_state);
        self.active_liquidity = active;
        self.next_position_id = next_position_id;
        let (inside0, inside1) = self.fee_growth_inside(lower_tick, upper_tick);

        info!(
            position = %id,
            range = %range,
            amount0,
            amount1,
            active_liquidity = self.active_liquidity,
            "Opened concentrated position"
        );

        self.positions.insert(
            id,
            PositionState {
                range,
                fee_growth_inside0_last: inside0,
                fee_growth_inside1_last: inside1,
            },
        );
        Ok(OpenedPosition {
            id,
            amount0,
            amount1,
        })
    }

    /// Closes a position, returning its token amounts (rounded down) and
    /// any uncollected fees.
    ///
    /// # Errors
    ///
    /// - [`AmmError::PositionNotFound`] if `id` is not open.
    pub fn close_position(&mut self, id: PositionId) -> crate::error::Result<ClosedPosition> {
        let state = self.positions.get(&id).ok_or(AmmError::PositionNotFound)?;
        let lower_tick = state.range.lower_tick().get();
        let upper_tick = state.range.upper_tick().get();
        let liquidity = state.range.liquidity();
        let in_range = state.range.is_in_range(self.current_tick);
        let (fees0, fees1, _, _) = self.fees_owed(state)?;
        let (amount0, amount1) =
            self.range_amounts(lower_tick, upper_tick, liquidity, Rounding::Down)?;
        let net = i128::try_from(liquidity)
            .map_err(|_| AmmError::Overflow("position liquidity exceeds i128::MAX"))?;

        let lower_state = self.tick_with_removed(lower_tick, liquidity, net)?;
        let upper_state = self.tick_with_removed(upper_tick, liquidity, -net)?;
        let active = if in_range {
            self.active_liquidity.safe_sub(&liquidity)?
        } else {
            self.active_liquidity
        };

        for (tick, tick_state) in [(lower_tick, lower_state), (upper_tick, upper_state)] {
            if tick_state.liquidity_gross == 0 {
                self.ticks.remove(&tick);
            } else {
                self.ticks.insert(tick, tick_state);
            }
        }
        self.active_liquidity = active;
        self.positions.remove(&id);

        info!(
            position = %id,
            amount0,
            amount1,
            fees0,
            fees1,
            active_liquidity = self.active_liquidity,
            "Closed concentrated position"
        );
        Ok(ClosedPosition {
            amount0,
            amount1,
            fees0,
            fees1,
        })
    }

    /// Pays out the fees a position has earned since its last settlement.
    ///
    /// # Errors
    ///
    /// - [`AmmError::PositionNotFound`] if `id` is not open.
    pub fn collect_fees(&mut self, id: PositionId) -> crate::error::Result<(u128, u128)> {
        let state = self.positions.get(&id).ok_or(AmmError::PositionNotFound)?;
        let (fees0, fees1, inside0, inside1) = self.fees_owed(state)?;
        if let Some(state) = self.positions.get_mut(&id) {
            state.fee_growth_inside0_last = inside0;
            state.fee_growth_inside1_last = inside1;
        }
        info!(position = %id, fees0, fees1, "Collected position fees");
        Ok((fees0, fees1))
    }

    /// Fees owed to `state` plus the fee-growth-inside values they were
    /// settled against.
    fn fees_owed(&self, state: &PositionState) -> crate::error::Result<(u128, u128, U256, U256)> {
        let (inside0, inside1) = self.fee_growth_inside(
            state.range.lower_tick().get(),
            state.range.upper_tick().get(),
        );
        let liquidity = U256::from(state.range.liquidity());
        let fees0 = mul_div(
            wrapping_sub(inside0, state.fee_growth_inside0_last),
            liquidity,
            q128(),
            Rounding::Down,
        )?;
        let fees1 = mul_div(
            wrapping_sub(inside1, state.fee_growth_inside1_last),
            liquidity,
            q128(),
            Rounding::Down,
        )?;
        Ok((
            to_u128(fees0, "token0 fees exceed u128")?,
            to_u128(fees1, "token1 fees exceed u128")?,
            inside0,
            inside1,
        ))
    }

    /// Token amounts backing `liquidity` over `[lower_tick, upper_tick)` at
    /// the current price.
    fn range_amounts(
        &self,
        lower_tick: i32,
        upper_tick: i32,
        liquidity: u128,
        rounding: Rounding,
    ) -> crate::error::Result<(u128, u128)> {
        let sqrt_lower = sqrt_price_at_tick(lower_tick)?;
        let sqrt_upper = sqrt_price_at_tick(upper_tick)?;
        let (amount0, amount1) = if self.current_tick < lower_tick {
            (
                amount0_between(sqrt_lower, sqrt_upper, liquidity, rounding)?,
                U256::zero(),
            )
        } else if self.current_tick >= upper_tick {
            (
                U256::zero(),
                amount1_between(sqrt_lower, sqrt_upper, liquidity, rounding)?,
            )
        } else {
            (
                amount0_between(self.sqrt_price_x96, sqrt_upper, liquidity, rounding)?,
                amount1_between(sqrt_lower, self.sqrt_price_x96, liquidity, rounding)?,
            )
        };
        Ok((
            to_u128(amount0, "token0 amount exceeds u128")?,
            to_u128(amount1, "token1 amount exceeds u128")?,
        ))
    }

    // -- tick map -------------------------------------------------------------

    /// State of `tick` after adding a position boundary.  A newly
    /// initialized tick at or below the current tick assumes all fee growth
    /// so far happened below it.
    fn tick_with_added(
        &self,
        tick: i32,
        liquidity: u128,
        net: i128,
    ) -> crate::error::Result<TickState> {
        let mut state = match self.ticks.get(&tick) {
            Some(existing) => existing.clone(),
            None if tick <= self.current_tick => TickState {
                fee_growth_outside0: self.fee_growth_global0,
                fee_growth_outside1: self.fee_growth_global1,
                ..TickState::default()
            },
            None => TickState::default(),
        };
        state.liquidity_gross = state.liquidity_gross.safe_add(&liquidity)?;
        state.liquidity_net = state
            .liquidity_net
            .checked_add(net)
            .ok_or(AmmError::Overflow("tick liquidity net overflow"))?;
        Ok(state)
    }

    fn tick_with_removed(
        &self,
        tick: i32,
        liquidity: u128,
        net: i128,
    ) -> crate::error::Result<TickState> {
        let mut state = self
            .ticks
            .get(&tick)
            .cloned()
            .ok_or(AmmError::Underflow("position tick is not initialized"))?;
        state.liquidity_gross = state.liquidity_gross.safe_sub(&liquidity)?;
        state.liquidity_net = state
            .liquidity_net
            .checked_sub(net)
            .ok_or(AmmError::Overflow("tick liquidity net overflow"))?;
        Ok(state)
    }

    /// Fee growth accumulated inside `[lower_tick, upper_tick)`, Q128.
    fn fee_growth_inside(&self, lower_tick: i32, upper_tick: i32) -> (U256, U256) {
        let outside = |tick: i32| {
            self.ticks.get(&tick).map_or((U256::zero(), U256::zero()), |s| {
                (s.fee_growth_outside0, s.fee_growth_outside1)
            })
        };
        let (lower0, lower1) = outside(lower_tick);
        let (upper0, upper1) = outside(upper_tick);

        let (below0, below1) = if self.current_tick >= lower_tick {
            (lower0, lower1)
        } else {
            (
                wrapping_sub(self.fee_growth_global0, lower0),
                wrapping_sub(self.fee_growth_global1, lower1),
            )
        };
        let (above0, above1) = if self.current_tick < upper_tick {
            (upper0, upper1)
        } else {
            (
                wrapping_sub(self.fee_growth_global0, upper0),
                wrapping_sub(self.fee_growth_global1, upper1),
            )
        };

        (
            wrapping_sub(wrapping_sub(self.fee_growth_global0, below0), above0),
            wrapping_sub(wrapping_sub(self.fee_growth_global1, below1), above1),
        )
    }

    /// Next initialized tick the price meets moving in `direction` from
    /// `tick`: at or below it going down, strictly above it going up.
    fn next_initialized_tick(&self, tick: i32, direction: SwapDirection) -> Option<i32> {
        match direction {
            SwapDirection::ZeroForOne => self.ticks.range(..=tick).next_back().map(|(&t, _)| t),
            SwapDirection::OneForZero => self
                .ticks
                .range((Bound::Excluded(tick), Bound::Unbounded))
                .next()
                .map(|(&t, _)| t),
        }
    }

    // -- swap -----------------------------------------------------------------

    /// Runs the bracket loop for an exact-in swap against local state.
    #[allow(clippy::too_many_lines)]
    fn compute_swap(
        &self,
        amount_in: u128,
        direction: SwapDirection,
    ) -> crate::error::Result<SwapComputation> {
        if amount_in == 0 {
            return Err(AmmError::InvalidInput("swap amount must be positive"));
        }
        let fee_bps = self.config.fee_tier().basis_points().get();
        let complement = self
            .config
            .fee_tier()
            .basis_points()
            .complement()
            .ok_or(AmmError::InvalidConfig("fee must be below 10000 basis points"))?;
        let zero_for_one = direction.is_zero_for_one();

        let mut remaining = U256::from(amount_in);
        let mut amount_out = U256::zero();
        let mut fee_paid = U256::zero();
        let mut sqrt_price = self.sqrt_price_x96;
        let mut tick = self.current_tick;
        let mut liquidity = self.active_liquidity;
        let mut fee_growth0 = self.fee_growth_global0;
        let mut fee_growth1 = self.fee_growth_global1;
        let mut crossings = Vec::new();
        let mut steps = 0u32;

        while !remaining.is_zero() {
            steps += 1;
            let next_tick = self.next_initialized_tick(tick, direction);
            let target = match next_tick {
                Some(t) => sqrt_price_at_tick(t)?,
                None if zero_for_one => MIN_SQRT_PRICE_X96,
                None => MAX_SQRT_PRICE_X96,
            };
            if liquidity == 0 && sqrt_price != target {
                return Err(AmmError::InsufficientLiquidity);
            }

            let net_remaining = mul_div(
                remaining,
                U256::from(complement),
                U256::from(BPS_DENOMINATOR),
                Rounding::Down,
            )?;
            let capacity = if zero_for_one {
                amount0_between(target, sqrt_price, liquidity, Rounding::Up)?
            } else {
                amount1_between(sqrt_price, target, liquidity, Rounding::Up)?
            };

            let (step_in, step_fee, step_out, bracket_done) = if net_remaining >= capacity {
                let step_fee = if fee_bps == 0 {
                    U256::zero()
                } else {
                    mul_div(
                        capacity,
                        U256::from(fee_bps),
                        U256::from(complement),
                        Rounding::Up,
                    )?
                };
                let step_out = if zero_for_one {
                    amount1_between(target, sqrt_price, liquidity, Rounding::Down)?
                } else {
                    amount0_between(sqrt_price, target, liquidity, Rounding::Down)?
                };
                (capacity, step_fee, step_out, true)
            } else {
                let next_price =
                    next_sqrt_price_from_input(sqrt_price, liquidity, net_remaining, direction)?;
                let (step_in, step_out) = if zero_for_one {
                    (
                        amount0_between(next_price, sqrt_price, liquidity, Rounding::Up)?,
                        amount1_between(next_price, sqrt_price, liquidity, Rounding::Down)?,
                    )
                } else {
                    (
                        amount1_between(sqrt_price, next_price, liquidity, Rounding::Up)?,
                        amount0_between(sqrt_price, next_price, liquidity, Rounding::Down)?,
                    )
                };
                // The partial step consumes everything left; the fee is
                // whatever the price move did not need.
                let step_fee = remaining
                    .checked_sub(step_in)
                    .ok_or(AmmError::Underflow("partial step input exceeds remaining"))?;
                sqrt_price = next_price;
                (step_in, step_fee, step_out, false)
            };

            remaining = remaining
                .checked_sub(step_in)
                .and_then(|r| r.checked_sub(step_fee))
                .ok_or(AmmError::Underflow("bracket input exceeds remaining"))?;
            amount_out = amount_out
                .checked_add(step_out)
                .ok_or(AmmError::Overflow("swap output overflow"))?;
            fee_paid = fee_paid
                .checked_add(step_fee)
                .ok_or(AmmError::Overflow("swap fee overflow"))?;
            if liquidity > 0 && !step_fee.is_zero() {
                let growth = mul_div(step_fee, q128(), U256::from(liquidity), Rounding::Down)?;
                if zero_for_one {
                    fee_growth0 = wrapping_add(fee_growth0, growth);
                } else {
                    fee_growth1 = wrapping_add(fee_growth1, growth);
                }
            }

            debug!(
                step = steps,
                %step_in,
                %step_fee,
                %step_out,
                liquidity,
                bracket_done,
                "Concentrated swap step"
            );

            if !bracket_done {
                tick = floor_tick_at_sqrt_price(sqrt_price)?;
                break;
            }

            sqrt_price = target;
            match next_tick {
                Some(t) => {
                    let net = self.ticks.get(&t).map_or(0, |s| s.liquidity_net);
                    if zero_for_one {
                        let delta = net
                            .checked_neg()
                            .ok_or(AmmError::Overflow("tick liquidity net overflow"))?;
                        liquidity = apply_liquidity_delta(liquidity, delta)?;
                        tick = t - 1;
                    } else {
                        liquidity = apply_liquidity_delta(liquidity, net)?;
                        tick = t;
                    }
                    crossings.push(Crossing {
                        tick: t,
                        fee_growth_global0: fee_growth0,
                        fee_growth_global1: fee_growth1,
                    });
                }
                None => {
                    if !remaining.is_zero() {
                        return Err(AmmError::InsufficientLiquidity);
                    }
                    tick = floor_tick_at_sqrt_price(sqrt_price)?;
                }
            }
        }

        let amount_out = to_u128(amount_out, "swap output exceeds u128")?;
        if amount_out == 0 {
            return Err(AmmError::InvalidInput("swap amount too small to produce output"));
        }
        let fee_paid = to_u128(fee_paid, "swap fee exceeds u128")?;
        let ticks_crossed = u32::try_from(crossings.len())
            .map_err(|_| AmmError::Overflow("ticks crossed exceeds u32"))?;

        Ok(SwapComputation {
            result: SwapResult {
                direction,
                amount_in,
                amount_out,
                fee_paid,
                final_sqrt_price_x96: sqrt_price,
                final_tick: tick,
                ticks_crossed,
                steps,
            },
            liquidity,
            fee_growth_global0: fee_growth0,
            fee_growth_global1: fee_growth1,
            crossings,
        })
    }
}

impl FromConfig<ClmmConfig> for ConcentratedLiquidityPool {
    /// Creates a pool at the configured price and opens every configured
    /// position in order.
    ///
    /// # Errors
    ///
    /// Propagates [`ClmmConfig::validate`] and
    /// [`open_position`](ConcentratedLiquidityPool::open_position) errors.
    fn from_config(config: &ClmmConfig) -> crate::error::Result<Self> {
        config.validate()?;
        let mut pool = Self::initialize(
            config.pool().clone(),
            config.tick_spacing(),
            config.initial_sqrt_price_x96(),
        )?;
        for position in config.positions() {
            pool.open_position(
                position.owner().clone(),
                position.lower_tick().get(),
                position.upper_tick().get(),
                position.liquidity(),
            )?;
        }
        Ok(pool)
    }
}

impl SwapPool for ConcentratedLiquidityPool {
    type Amount = u128;
    type Outcome = SwapResult;

    /// Quotes an exact-in swap without touching state.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidInput`] if `amount_in` is zero or produces no
    ///   output.
    /// - [`AmmError::InsufficientLiquidity`] if the swap runs into a
    ///   bracket with no active liquidity.
    fn simulate_swap(
        &self,
        amount_in: u128,
        direction: SwapDirection,
    ) -> crate::error::Result<SwapResult> {
        self.compute_swap(amount_in, direction)
            .map(|computation| computation.result)
    }

    /// Executes an exact-in swap, committing price, tick, liquidity, fee
    /// growth and crossed-tick state together.
    ///
    /// # Errors
    ///
    /// Everything [`simulate_swap`](Self::simulate_swap) returns, plus
    /// [`AmmError::SlippageExceeded`].
    fn execute_swap(
        &mut self,
        amount_in: u128,
        direction: SwapDirection,
        min_amount_out: u128,
    ) -> crate::error::Result<SwapResult> {
        let computation = self.compute_swap(amount_in, direction)?;
        let result = computation.result;
        if result.amount_out() < min_amount_out {
            warn!(
                amount_out = result.amount_out(),
                min_amount_out,
                "Concentrated swap rejected by slippage floor"
            );
            return Err(AmmError::slippage(result.amount_out(), min_amount_out));
        }

        for crossing in &computation.crossings {
            if let Some(state) = self.ticks.get_mut(&crossing.tick) {
                state.fee_growth_outside0 =
                    wrapping_sub(crossing.fee_growth_global0, state.fee_growth_outside0);
                state.fee_growth_outside1 =
                    wrapping_sub(crossing.fee_growth_global1, state.fee_growth_outside1);
            }
        }
        self.sqrt_price_x96 = result.final_sqrt_price_x96();
        self.current_tick = result.final_tick();
        self.active_liquidity = computation.liquidity;
        self.fee_growth_global0 = computation.fee_growth_global0;
        self.fee_growth_global1 = computation.fee_growth_global1;

        info!(
            %direction,
            amount_in,
            amount_out = result.amount_out(),
            fee = result.fee_paid(),
            tick = self.current_tick,
            ticks_crossed = result.ticks_crossed(),
            "Concentrated swap executed"
        );
        Ok(result)
    }

    /// Returns `(sqrt_price_x96 / 2^96)^2`.
    fn spot_price(&self) -> crate::error::Result<Decimal> {
        sqrt_price_to_price(self.sqrt_price_x96)
    }

    fn token_pair(&self) -> &TokenPair {
        self.config.token_pair()
    }

    fn fee_tier(&self) -> FeeTier {
        self.config.fee_tier()
    }
}
