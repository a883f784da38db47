//! Constant-product pool implementation (Uniswap V2 style).
//!
//! The swap invariant is `x × y = k` where `x` and `y` are the reserves
//! of token0 and token1.  Fees are deducted from the input amount
//! **before** the pricing formula is applied.
//!
//! # Swap Algorithm (token0 → token1)
//!
//! 1. `fee = amount_in × fee_bps / 10 000`
//! 2. `net_input = amount_in − fee`
//! 3. `amount_out = reserve1 − k / (reserve0 + net_input)`, evaluated as
//!    `reserve1 × net_input / (reserve0 + net_input)` and truncated to 18
//!    fractional digits
//! 4. `reserve0 += amount_in` (fee stays in the pool)
//! 5. `reserve1 -= amount_out`
//!
//! # Invariant
//!
//! After every swap, `k_after ≥ k_before` because the fee component
//! increases reserves without a corresponding output, and the output is
//! rounded down.

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::config::{ConstantProductConfig, PoolConfig};
use crate::domain::{FeeTier, Rounding, SwapDirection, SwapQuote, TokenPair};
use crate::error::AmmError;
use crate::math::{CheckedArithmetic, decimal_mul_div, decimal_sqrt_mul_div};
use crate::traits::{FromConfig, SwapPool};

/// Basis-point denominator (10 000 = 100%).
const BPS_DENOMINATOR: u32 = 10_000;

/// A constant-product AMM pool (`x · y = k`).
///
/// # State
///
/// - `reserve0` / `reserve1`: current token balances, fees included
/// - `total_shares`: outstanding LP shares (`√(reserve0 × reserve1)` at
///   genesis)
/// - `accumulated_fees0` / `accumulated_fees1`: lifetime fee counters
///
/// # Example
///
/// ```rust
/// use hydra_pool_engine::config::PoolConfig;
/// use hydra_pool_engine::domain::{FeeTier, SwapDirection};
/// use hydra_pool_engine::pools::ConstantProductPool;
/// use hydra_pool_engine::traits::SwapPool;
/// use rust_decimal::Decimal;
///
/// let cfg = PoolConfig::from_tokens("ETH", "USDC", FeeTier::TIER_0_30_PERCENT).expect("valid");
/// let mut pool = ConstantProductPool::initialize(cfg, Decimal::from(1_000), Decimal::from(1_000))
///     .expect("pool created");
///
/// let quote = pool
///     .execute_swap(Decimal::from(100), SwapDirection::ZeroForOne, Decimal::from(90))
///     .expect("swap ok");
/// assert!(quote.amount_out() > Decimal::from(90));
/// assert_eq!(pool.reserve0(), Decimal::from(1_100));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantProductPool {
    config: PoolConfig,
    reserve0: Decimal,
    reserve1: Decimal,
    total_shares: Decimal,
    accumulated_fees0: Decimal,
    accumulated_fees1: Decimal,
}

impl ConstantProductPool {
    /// Creates a pool holding `reserve0` / `reserve1`.
    ///
    /// Initial LP shares are `√(reserve0 × reserve1)`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidConfig`] if either reserve is not strictly
    ///   positive or the fee is out of range.
    /// - [`AmmError::Overflow`] if the initial share supply does not fit a
    ///   `Decimal`.
    pub fn initialize(
        config: PoolConfig,
        reserve0: Decimal,
        reserve1: Decimal,
    ) -> crate::error::Result<Self> {
        config.validate()?;
        if reserve0 <= Decimal::ZERO || reserve1 <= Decimal::ZERO {
            return Err(AmmError::InvalidConfig("reserves must be positive"));
        }
        let total_shares = decimal_sqrt_mul_div(reserve0, reserve1, Decimal::ONE)?;
        info!(
            token0 = %config.token_pair().token0(),
            token1 = %config.token_pair().token1(),
            fee = %config.fee_tier(),
            %reserve0,
            %reserve1,
            "Constant-product pool initialized"
        );
        Ok(Self {
            config,
            reserve0,
            reserve1,
            total_shares,
            accumulated_fees0: Decimal::ZERO,
            accumulated_fees1: Decimal::ZERO,
        })
    }

    /// Creates a pool with no reserves and no shares.
    ///
    /// It quotes nothing until a first deposit through
    /// [`LiquidityManager::add_liquidity`](crate::liquidity::LiquidityManager::add_liquidity)
    /// seeds it; a pool whose whole share supply is burned returns to
    /// this state.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfig`] if the fee is out of range.
    pub fn empty(config: PoolConfig) -> crate::error::Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            reserve0: Decimal::ZERO,
            reserve1: Decimal::ZERO,
            total_shares: Decimal::ZERO,
            accumulated_fees0: Decimal::ZERO,
            accumulated_fees1: Decimal::ZERO,
        })
    }

    /// `true` while no shares are outstanding.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_shares.is_zero()
    }

    #[must_use]
    pub const fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Returns the current reserve of token0.
    #[must_use]
    pub const fn reserve0(&self) -> Decimal {
        self.reserve0
    }

    /// Returns the current reserve of token1.
    #[must_use]
    pub const fn reserve1(&self) -> Decimal {
        self.reserve1
    }

    /// Outstanding LP shares.
    #[must_use]
    pub const fn total_shares(&self) -> Decimal {
        self.total_shares
    }

    /// Returns the accumulated fees collected in token0.
    #[must_use]
    pub const fn accumulated_fees0(&self) -> Decimal {
        self.accumulated_fees0
    }

    /// Returns the accumulated fees collected in token1.
    #[must_use]
    pub const fn accumulated_fees1(&self) -> Decimal {
        self.accumulated_fees1
    }

    /// Current invariant `k = reserve0 × reserve1`.
    ///
    /// Quotes never form `k` themselves; this is a reporting helper.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the product does not fit a
    /// `Decimal`.
    pub fn invariant(&self) -> crate::error::Result<Decimal> {
        self.reserve0.safe_mul(&self.reserve1)
    }

    const fn reserves_for(&self, direction: SwapDirection) -> (Decimal, Decimal) {
        match direction {
            SwapDirection::ZeroForOne => (self.reserve0, self.reserve1),
            SwapDirection::OneForZero => (self.reserve1, self.reserve0),
        }
    }

    /// Price `reserve1 / reserve0` of a reserve state.
    fn price_of(reserve0: Decimal, reserve1: Decimal) -> crate::error::Result<Decimal> {
        if reserve0.is_zero() {
            return Err(AmmError::InsufficientLiquidity);
        }
        reserve1
            .checked_div(reserve0)
            .ok_or(AmmError::Overflow("spot price overflow"))
    }

    /// Reserves after `amount_in` enters and `amount_out` leaves.
    fn reserves_after(
        &self,
        direction: SwapDirection,
        amount_in: Decimal,
        amount_out: Decimal,
    ) -> crate::error::Result<(Decimal, Decimal)> {
        match direction {
            SwapDirection::ZeroForOne => Ok((
                self.reserve0.safe_add(&amount_in)?,
                self.reserve1.safe_sub(&amount_out)?,
            )),
            SwapDirection::OneForZero => Ok((
                self.reserve0.safe_sub(&amount_out)?,
                self.reserve1.safe_add(&amount_in)?,
            )),
        }
    }

    /// Computes the exact-in swap quote.
    ///
    /// Formula: `amount_out = reserve_out × net_input / (reserve_in + net_input)`
    fn compute_exact_in(
        &self,
        amount_in: Decimal,
        direction: SwapDirection,
    ) -> crate::error::Result<SwapQuote> {
        if amount_in <= Decimal::ZERO {
            return Err(AmmError::InvalidInput("swap amount must be positive"));
        }
        let (reserve_in, reserve_out) = self.reserves_for(direction);

        let fee = self.config.fee_tier().apply_to_amount(amount_in)?;
        let net_input = amount_in.safe_sub(&fee)?;
        if net_input.is_zero() {
            return Err(AmmError::InvalidInput("net input after fee is zero"));
        }

        let denominator = reserve_in.safe_add(&net_input)?;
        let amount_out = decimal_mul_div(reserve_out, net_input, denominator, Rounding::Down)?;

        if amount_out >= reserve_out {
            return Err(AmmError::InsufficientLiquidity);
        }
        if amount_out.is_zero() {
            return Err(AmmError::InvalidInput(
                "swap amount too small to produce output",
            ));
        }

        let price_before = self.spot_price()?;
        let (r0, r1) = self.reserves_after(direction, amount_in, amount_out)?;
        let price_after = Self::price_of(r0, r1)?;

        debug!(
            %direction,
            %amount_in,
            %amount_out,
            %fee,
            %price_before,
            %price_after,
            "Constant-product quote"
        );
        Ok(SwapQuote::new(
            direction,
            amount_in,
            amount_out,
            price_before,
            price_after,
            fee,
        ))
    }

    /// Read-only inverse quote: the input (fee included) needed to receive
    /// exactly `amount_out`.
    ///
    /// Formula: `net_input = reserve_in × amount_out / (reserve_out − amount_out)`,
    /// then `amount_in = net_input × 10 000 / (10 000 − fee_bps)`, both
    /// rounded up.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidInput`] if `amount_out` is not positive.
    /// - [`AmmError::InsufficientLiquidity`] if `amount_out` would drain the
    ///   output reserve.
    pub fn quote_exact_out(
        &self,
        amount_out: Decimal,
        direction: SwapDirection,
    ) -> crate::error::Result<SwapQuote> {
        if amount_out <= Decimal::ZERO {
            return Err(AmmError::InvalidInput("output amount must be positive"));
        }
        let (reserve_in, reserve_out) = self.reserves_for(direction);
        if amount_out >= reserve_out {
            return Err(AmmError::InsufficientLiquidity);
        }

        let net_input = decimal_mul_div(
            reserve_in,
            amount_out,
            reserve_out.safe_sub(&amount_out)?,
            Rounding::Up,
        )?;

        let complement = self
            .config
            .fee_tier()
            .basis_points()
            .complement()
            .filter(|c| *c > 0)
            .ok_or(AmmError::InvalidConfig("fee must be below 10000 basis points"))?;
        let amount_in = decimal_mul_div(
            net_input,
            Decimal::from(BPS_DENOMINATOR),
            Decimal::from(complement),
            Rounding::Up,
        )?;
        let fee = amount_in.safe_sub(&net_input)?;

        let price_before = self.spot_price()?;
        let (r0, r1) = self.reserves_after(direction, amount_in, amount_out)?;
        let price_after = Self::price_of(r0, r1)?;

        Ok(SwapQuote::new(
            direction,
            amount_in,
            amount_out,
            price_before,
            price_after,
            fee,
        ))
    }

    /// Amount of token0 that must enter (positive) or leave (negative) the
    /// pool to move the spot price to `target_price`, ignoring fees.
    ///
    /// With `k` fixed, the token0 reserve at price `p` is `√(k / p)`; the
    /// depth is that reserve minus the current one.  A positive depth
    /// means selling token0 (`ZeroForOne`) lowers the price to the target.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidInput`] if `target_price` is not positive.
    /// - [`AmmError::Overflow`] on arithmetic overflow.
    pub fn depth_to_price(&self, target_price: Decimal) -> crate::error::Result<Decimal> {
        if target_price <= Decimal::ZERO {
            return Err(AmmError::InvalidInput("target price must be positive"));
        }
        if self.is_empty() {
            return Err(AmmError::InsufficientLiquidity);
        }
        let x_new = decimal_sqrt_mul_div(self.reserve0, self.reserve1, target_price)?;
        x_new
            .checked_sub(self.reserve0)
            .ok_or(AmmError::Overflow("depth overflow"))
    }

    /// Adds a deposit and the shares minted for it in one step.
    pub(crate) fn mint(
        &mut self,
        amount0: Decimal,
        amount1: Decimal,
        shares: Decimal,
    ) -> crate::error::Result<()> {
        let reserve0 = self.reserve0.safe_add(&amount0)?;
        let reserve1 = self.reserve1.safe_add(&amount1)?;
        let total_shares = self.total_shares.safe_add(&shares)?;
        self.reserve0 = reserve0;
        self.reserve1 = reserve1;
        self.total_shares = total_shares;
        Ok(())
    }

    /// Removes `shares` and pays out the pro-rata reserves, truncated.
    ///
    /// Returns `(amount0_out, amount1_out)`.
    pub(crate) fn burn(&mut self, shares: Decimal) -> crate::error::Result<(Decimal, Decimal)> {
        if shares > self.total_shares {
            return Err(AmmError::InsufficientShares(
                "burn exceeds outstanding shares",
            ));
        }
        let (amount0, amount1) = if shares == self.total_shares {
            (self.reserve0, self.reserve1)
        } else {
            (
                decimal_mul_div(self.reserve0, shares, self.total_shares, Rounding::Down)?,
                decimal_mul_div(self.reserve1, shares, self.total_shares, Rounding::Down)?,
            )
        };
        let reserve0 = self.reserve0.safe_sub(&amount0)?;
        let reserve1 = self.reserve1.safe_sub(&amount1)?;
        let total_shares = self.total_shares.safe_sub(&shares)?;
        self.reserve0 = reserve0;
        self.reserve1 = reserve1;
        self.total_shares = total_shares;
        Ok((amount0, amount1))
    }
}

impl FromConfig<ConstantProductConfig> for ConstantProductPool {
    /// Creates a new pool from the given configuration.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`ConstantProductConfig::validate`] or
    /// [`ConstantProductPool::initialize`].
    fn from_config(config: &ConstantProductConfig) -> crate::error::Result<Self> {
        config.validate()?;
        Self::initialize(config.pool().clone(), config.reserve0(), config.reserve1())
    }
}

impl SwapPool for ConstantProductPool {
    type Amount = Decimal;
    type Outcome = SwapQuote;

    /// Quotes an exact-in swap without touching reserves.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidInput`] if `amount_in <= 0`.
    /// - [`AmmError::InsufficientLiquidity`] if the output would drain the
    ///   output reserve.
    fn simulate_swap(
        &self,
        amount_in: Decimal,
        direction: SwapDirection,
    ) -> crate::error::Result<SwapQuote> {
        self.compute_exact_in(amount_in, direction)
    }

    /// Executes an exact-in swap.
    ///
    /// Reserves and fee counters are updated together, and only when the
    /// output is at least `min_amount_out`.
    ///
    /// # Errors
    ///
    /// Everything [`simulate_swap`](Self::simulate_swap) returns, plus
    /// [`AmmError::SlippageExceeded`].
    fn execute_swap(
        &mut self,
        amount_in: Decimal,
        direction: SwapDirection,
        min_amount_out: Decimal,
    ) -> crate::error::Result<SwapQuote> {
        let quote = self.compute_exact_in(amount_in, direction)?;
        if quote.amount_out() < min_amount_out {
            warn!(
                amount_out = %quote.amount_out(),
                %min_amount_out,
                "Constant-product swap rejected by slippage floor"
            );
            return Err(AmmError::slippage(quote.amount_out(), min_amount_out));
        }

        let (reserve0, reserve1) =
            self.reserves_after(direction, quote.amount_in(), quote.amount_out())?;
        let (fees0, fees1) = match direction {
            SwapDirection::ZeroForOne => (
                self.accumulated_fees0.safe_add(&quote.fee_paid())?,
                self.accumulated_fees1,
            ),
            SwapDirection::OneForZero => (
                self.accumulated_fees0,
                self.accumulated_fees1.safe_add(&quote.fee_paid())?,
            ),
        };

        self.reserve0 = reserve0;
        self.reserve1 = reserve1;
        self.accumulated_fees0 = fees0;
        self.accumulated_fees1 = fees1;

        info!(
            %direction,
            amount_in = %quote.amount_in(),
            amount_out = %quote.amount_out(),
            fee = %quote.fee_paid(),
            %reserve0,
            %reserve1,
            "Constant-product swap executed"
        );
        Ok(quote)
    }

    /// Returns `reserve1 / reserve0`.
    fn spot_price(&self) -> crate::error::Result<Decimal> {
        Self::price_of(self.reserve0, self.reserve1)
    }

    fn token_pair(&self) -> &TokenPair {
        self.config.token_pair()
    }

    fn fee_tier(&self) -> FeeTier {
        self.config.fee_tier()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::BasisPoints;
    use rust_decimal_macros::dec;

    // -- helpers --------------------------------------------------------------

    fn config(fee_bps: u32) -> PoolConfig {
        let Ok(cfg) = PoolConfig::from_tokens("ETH", "USDC", FeeTier::new(BasisPoints::new(fee_bps)))
        else {
            panic!("expected valid config");
        };
        cfg
    }

    fn make_pool(r0: Decimal, r1: Decimal, fee_bps: u32) -> ConstantProductPool {
        let Ok(pool) = ConstantProductPool::initialize(config(fee_bps), r0, r1) else {
            panic!("expected valid pool");
        };
        pool
    }

    fn close(a: Decimal, b: Decimal, tol: Decimal) -> bool {
        (a - b).abs() <= tol
    }

    // -- initialize -----------------------------------------------------------

    #[test]
    fn initialize_valid() {
        let pool = make_pool(dec!(1000), dec!(2000), 30);
        assert_eq!(pool.reserve0(), dec!(1000));
        assert_eq!(pool.reserve1(), dec!(2000));
        assert_eq!(pool.spot_price(), Ok(dec!(2)));
        assert_eq!(pool.accumulated_fees0(), Decimal::ZERO);
    }

    #[test]
    fn initial_shares_are_geometric_mean() {
        let pool = make_pool(dec!(1000), dec!(1000), 30);
        assert_eq!(pool.total_shares(), dec!(1000));
    }

    #[test]
    fn non_positive_reserves_rejected() {
        assert_eq!(
            ConstantProductPool::initialize(config(30), Decimal::ZERO, dec!(1)),
            Err(AmmError::InvalidConfig("reserves must be positive"))
        );
        assert!(ConstantProductPool::initialize(config(30), dec!(1), dec!(-1)).is_err());
    }

    #[test]
    fn from_config_matches_initialize() {
        let Ok(cfg) = ConstantProductConfig::new(config(30), dec!(10), dec!(40)) else {
            panic!("expected Ok");
        };
        let Ok(pool) = ConstantProductPool::from_config(&cfg) else {
            panic!("expected Ok");
        };
        assert_eq!(pool, make_pool(dec!(10), dec!(40), 30));
        assert_eq!(pool.total_shares(), dec!(20));
    }

    // -- simulate -------------------------------------------------------------

    #[test]
    fn quote_thirty_bps_hundred_in() {
        let pool = make_pool(dec!(1000), dec!(1000), 30);
        let Ok(q) = pool.simulate_swap(dec!(100), SwapDirection::ZeroForOne) else {
            panic!("expected Ok");
        };
        assert_eq!(q.fee_paid(), dec!(0.3));
        assert_eq!(q.amount_out(), dec!(90.661089388014913158));
        assert_eq!(q.price_before(), dec!(1));
        assert!(close(q.price_after(), dec!(0.826671736919986), dec!(0.000000000001)));
        // read-only
        assert_eq!(pool.reserve0(), dec!(1000));
    }

    #[test]
    fn reverse_direction_mirrors() {
        let pool = make_pool(dec!(1000), dec!(1000), 30);
        let Ok(a) = pool.simulate_swap(dec!(100), SwapDirection::ZeroForOne) else {
            panic!("expected Ok");
        };
        let Ok(b) = pool.simulate_swap(dec!(100), SwapDirection::OneForZero) else {
            panic!("expected Ok");
        };
        assert_eq!(a.amount_out(), b.amount_out());
        assert!(b.price_after() > dec!(1));
    }

    #[test]
    fn non_positive_amount_rejected() {
        let pool = make_pool(dec!(1000), dec!(1000), 30);
        assert!(matches!(
            pool.simulate_swap(Decimal::ZERO, SwapDirection::ZeroForOne),
            Err(AmmError::InvalidInput(_))
        ));
        assert!(pool.simulate_swap(dec!(-1), SwapDirection::OneForZero).is_err());
    }

    #[test]
    fn dust_input_rejected() {
        let pool = make_pool(dec!(1), dec!(0.000000000000000001), 0);
        assert!(matches!(
            pool.simulate_swap(dec!(0.000000000000000001), SwapDirection::ZeroForOne),
            Err(AmmError::InvalidInput(_))
        ));
    }

    // -- execute --------------------------------------------------------------

    #[test]
    fn execute_commits_reserves_and_fees() {
        let mut pool = make_pool(dec!(1000), dec!(1000), 30);
        let Ok(q) = pool.execute_swap(dec!(100), SwapDirection::ZeroForOne, dec!(90)) else {
            panic!("expected Ok");
        };
        assert_eq!(pool.reserve0(), dec!(1100));
        assert_eq!(pool.reserve1(), dec!(1000) - q.amount_out());
        assert_eq!(pool.accumulated_fees0(), dec!(0.3));
        assert_eq!(pool.accumulated_fees1(), Decimal::ZERO);
        assert_eq!(pool.spot_price(), Ok(q.price_after()));
    }

    #[test]
    fn invariant_grows_with_fee() {
        let mut pool = make_pool(dec!(1000), dec!(1000), 30);
        let Ok(k0) = pool.invariant() else {
            panic!("expected Ok");
        };
        for _ in 0..5 {
            let Ok(_) = pool.execute_swap(dec!(37.5), SwapDirection::ZeroForOne, Decimal::ZERO)
            else {
                panic!("expected Ok");
            };
            let Ok(_) = pool.execute_swap(dec!(20), SwapDirection::OneForZero, Decimal::ZERO) else {
                panic!("expected Ok");
            };
        }
        let Ok(k1) = pool.invariant() else {
            panic!("expected Ok");
        };
        assert!(k1 > k0);
    }

    #[test]
    fn slippage_leaves_state_untouched() {
        let mut pool = make_pool(dec!(1000), dec!(1000), 30);
        let before = pool.clone();
        let r = pool.execute_swap(dec!(100), SwapDirection::ZeroForOne, dec!(91));
        let Err(e) = r else {
            panic!("expected slippage error");
        };
        assert!(e.is_slippage());
        assert_eq!(pool, before);
    }

    #[test]
    fn huge_swap_never_drains() {
        let mut pool = make_pool(dec!(1000), dec!(1000), 0);
        let Ok(q) = pool.execute_swap(dec!(1000000000), SwapDirection::ZeroForOne, Decimal::ZERO)
        else {
            panic!("expected Ok");
        };
        assert!(q.amount_out() < dec!(1000));
        assert!(pool.reserve1() > Decimal::ZERO);
    }

    // -- quote_exact_out ------------------------------------------------------

    #[test]
    fn exact_out_inverts_exact_in() {
        let pool = make_pool(dec!(1000), dec!(1000), 30);
        let Ok(q) = pool.quote_exact_out(dec!(50), SwapDirection::ZeroForOne) else {
            panic!("expected Ok");
        };
        let Ok(back) = pool.simulate_swap(q.amount_in(), SwapDirection::ZeroForOne) else {
            panic!("expected Ok");
        };
        assert!(back.amount_out() >= dec!(50));
        assert!(close(back.amount_out(), dec!(50), dec!(0.000000001)));
    }

    #[test]
    fn exact_out_exceeding_reserve() {
        let pool = make_pool(dec!(1000), dec!(2000), 30);
        assert_eq!(
            pool.quote_exact_out(dec!(2000), SwapDirection::ZeroForOne),
            Err(AmmError::InsufficientLiquidity)
        );
    }

    // -- depth_to_price -------------------------------------------------------

    #[test]
    fn depth_sign_matches_direction() {
        let pool = make_pool(dec!(1000), dec!(1000), 30);
        // p = 0.25 => x = sqrt(1e6 / 0.25) = 2000
        assert_eq!(pool.depth_to_price(dec!(0.25)), Ok(dec!(1000)));
        // p = 4 => x = 500
        assert_eq!(pool.depth_to_price(dec!(4)), Ok(dec!(-500)));
        assert_eq!(pool.depth_to_price(dec!(1)), Ok(Decimal::ZERO));
    }

    #[test]
    fn depth_rejects_non_positive_target() {
        let pool = make_pool(dec!(1000), dec!(1000), 30);
        assert!(matches!(
            pool.depth_to_price(Decimal::ZERO),
            Err(AmmError::InvalidInput(_))
        ));
    }

    #[test]
    fn swapping_the_depth_reaches_target_without_fee() {
        let mut pool = make_pool(dec!(1000), dec!(1000), 0);
        let Ok(depth) = pool.depth_to_price(dec!(0.81)) else {
            panic!("expected Ok");
        };
        let Ok(_) = pool.execute_swap(depth, SwapDirection::ZeroForOne, Decimal::ZERO) else {
            panic!("expected Ok");
        };
        let Ok(p) = pool.spot_price() else {
            panic!("expected Ok");
        };
        assert!(close(p, dec!(0.81), dec!(0.000000001)));
    }

    // -- mint / burn ----------------------------------------------------------

    #[test]
    fn mint_then_burn_pro_rata() {
        let mut pool = make_pool(dec!(1000), dec!(2000), 30);
        let Ok(()) = pool.mint(dec!(100), dec!(200), dec!(141.421356237309504880)) else {
            panic!("expected Ok");
        };
        let shares = pool.total_shares();
        let Ok((a0, a1)) = pool.burn(shares / dec!(2)) else {
            panic!("expected Ok");
        };
        assert!(close(a0, dec!(550), dec!(0.000000001)));
        assert!(close(a1, dec!(1100), dec!(0.000000001)));
    }

    #[test]
    fn burn_everything_empties_reserves() {
        let mut pool = make_pool(dec!(3), dec!(7), 30);
        let total = pool.total_shares();
        let Ok((a0, a1)) = pool.burn(total) else {
            panic!("expected Ok");
        };
        assert_eq!((a0, a1), (dec!(3), dec!(7)));
        assert_eq!(pool.total_shares(), Decimal::ZERO);
    }

    #[test]
    fn burn_more_than_supply() {
        let mut pool = make_pool(dec!(1000), dec!(1000), 30);
        assert!(matches!(
            pool.burn(dec!(1000.000000000000000001)),
            Err(AmmError::InsufficientShares(_))
        ));
    }

    // -- empty pool -----------------------------------------------------------

    #[test]
    fn empty_pool_quotes_nothing() {
        let Ok(pool) = ConstantProductPool::empty(config(30)) else {
            panic!("expected empty pool");
        };
        assert!(pool.is_empty());
        assert_eq!(pool.spot_price(), Err(AmmError::InsufficientLiquidity));
        assert_eq!(
            pool.simulate_swap(dec!(10), SwapDirection::ZeroForOne),
            Err(AmmError::InsufficientLiquidity)
        );
        assert_eq!(
            pool.quote_exact_out(dec!(1), SwapDirection::OneForZero),
            Err(AmmError::InsufficientLiquidity)
        );
        assert_eq!(pool.depth_to_price(dec!(1)), Err(AmmError::InsufficientLiquidity));
    }

    #[test]
    fn mint_seeds_empty_pool() {
        let Ok(mut pool) = ConstantProductPool::empty(config(30)) else {
            panic!("expected empty pool");
        };
        let Ok(()) = pool.mint(dec!(4), dec!(9), dec!(6)) else {
            panic!("expected Ok");
        };
        assert!(!pool.is_empty());
        assert_eq!(pool.spot_price(), Ok(dec!(2.25)));
    }

    // -- large reserves -------------------------------------------------------

    #[test]
    fn genesis_shares_at_large_reserves() {
        let pool = make_pool(dec!(1000000000000000), dec!(1000000000000000), 30);
        assert_eq!(pool.total_shares(), dec!(1000000000000000));
        assert_eq!(pool.depth_to_price(dec!(4)), Ok(dec!(-500000000000000)));
    }

    #[test]
    fn swap_whose_product_exceeds_decimal_range() {
        // reserve_out × net_input = 2e15 × 9.97e13 ≈ 2e29
        let mut pool = make_pool(dec!(2000000000000000), dec!(2000000000000000), 30);
        let Ok(q) = pool.execute_swap(
            dec!(100000000000000),
            SwapDirection::ZeroForOne,
            Decimal::ZERO,
        ) else {
            panic!("expected Ok");
        };
        assert_eq!(q.amount_out(), dec!(94965947516311.85407439157974));
        assert_eq!(pool.reserve0(), dec!(2100000000000000));
        assert_eq!(pool.reserve1(), dec!(1905034052483688.14592560842026));
        assert_eq!(pool.accumulated_fees0(), dec!(300000000000));
    }

    #[test]
    fn oversized_sell_into_small_pool_keeps_invariant() {
        let mut pool = make_pool(dec!(10000000000000), dec!(10000000000000), 30);
        let Ok(k_before) = pool.invariant() else {
            panic!("expected Ok");
        };
        let Ok(q) = pool.execute_swap(
            dec!(10000000000000000),
            SwapDirection::ZeroForOne,
            Decimal::ZERO,
        ) else {
            panic!("expected Ok");
        };
        assert_eq!(q.amount_out(), dec!(9989979959919.839679358717434));
        assert!(q.amount_out() < dec!(10000000000000));
        let Ok(k_after) = pool.invariant() else {
            panic!("expected Ok");
        };
        assert!(k_after >= k_before);
    }

    #[test]
    fn large_pool_exact_out_and_burn() {
        let mut pool = make_pool(dec!(2000000000000000), dec!(2000000000000000), 30);
        let Ok(q) = pool.quote_exact_out(dec!(100000000000000), SwapDirection::OneForZero) else {
            panic!("expected Ok");
        };
        assert!(q.amount_in() > dec!(100000000000000));
        let Ok((a0, a1)) = pool.burn(dec!(500000000000000)) else {
            panic!("expected Ok");
        };
        assert_eq!((a0, a1), (dec!(500000000000000), dec!(500000000000000)));
    }

    // -- trait accessors ------------------------------------------------------

    #[test]
    fn pair_and_fee() {
        let pool = make_pool(dec!(1), dec!(1), 30);
        assert_eq!(pool.token_pair().token0().as_str(), "ETH");
        assert_eq!(pool.fee_tier(), FeeTier::TIER_0_30_PERCENT);
    }
}
