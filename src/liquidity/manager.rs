//! LP share accounting on top of a constant-product pool.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::info;

use crate::domain::{AccountId, Rounding};
use crate::error::AmmError;
use crate::math::{CheckedArithmetic, decimal_mul_div, decimal_sqrt_mul_div};
use crate::pools::ConstantProductPool;

/// Per-owner share ledger for one constant-product pool.
///
/// The ledger does not own the pool: every deposit and withdrawal borrows
/// it, so the pool can stay registered in a
/// [`SwapEngine`](crate::engine::SwapEngine) and earn fees from routed
/// swaps between deposits.  Use one ledger per pool.
///
/// A deposit into an empty pool mints `√(amount0 × amount1)` shares.
/// Later deposits mint `min(amount0 / reserve0, amount1 / reserve1) ×
/// total_shares`, truncated to 18 fractional digits, so a deposit at a
/// stale ratio donates the excess instead of diluting existing holders.
/// Burning the entire supply returns the pool to the empty state.
///
/// # Example
///
/// ```rust
/// use hydra_pool_engine::config::PoolConfig;
/// use hydra_pool_engine::domain::{AccountId, FeeTier};
/// use hydra_pool_engine::liquidity::LiquidityManager;
/// use hydra_pool_engine::pools::ConstantProductPool;
/// use rust_decimal::Decimal;
///
/// let cfg = PoolConfig::from_tokens("ETH", "USDC", FeeTier::TIER_0_30_PERCENT).expect("valid");
/// let mut pool = ConstantProductPool::empty(cfg).expect("valid");
/// let mut ledger = LiquidityManager::new();
/// let alice = AccountId::from("alice");
///
/// let minted = ledger
///     .add_liquidity(&mut pool, &alice, Decimal::from(1_000), Decimal::from(1_000))
///     .expect("deposit");
/// assert_eq!(minted, Decimal::from(1_000));
/// assert_eq!(pool.total_shares(), Decimal::from(1_000));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiquidityManager {
    shares: BTreeMap<AccountId, Decimal>,
}

impl LiquidityManager {
    /// Creates a ledger with no holders.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger for an initialized pool, crediting its whole share supply
    /// to `genesis_owner`.
    #[must_use]
    pub fn with_genesis_owner(pool: &ConstantProductPool, genesis_owner: AccountId) -> Self {
        let mut shares = BTreeMap::new();
        if !pool.is_empty() {
            shares.insert(genesis_owner, pool.total_shares());
        }
        Self { shares }
    }

    /// Shares held by `owner`.
    #[must_use]
    pub fn shares_of(&self, owner: &AccountId) -> Decimal {
        self.shares.get(owner).copied().unwrap_or(Decimal::ZERO)
    }

    /// Holders with a positive balance, in id order.
    pub fn holders(&self) -> impl Iterator<Item = (&AccountId, Decimal)> {
        self.shares.iter().map(|(owner, shares)| (owner, *shares))
    }

    /// `true` when nobody holds shares.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }

    /// Deposits `amount0` / `amount1` into `pool` for `owner` and returns
    /// the shares minted.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidInput`] if either amount is not positive, or
    ///   the deposit is too small to mint a share unit.
    /// - [`AmmError::Overflow`] on arithmetic overflow.
    pub fn add_liquidity(
        &mut self,
        pool: &mut ConstantProductPool,
        owner: &AccountId,
        amount0: Decimal,
        amount1: Decimal,
    ) -> crate::error::Result<Decimal> {
        if amount0 <= Decimal::ZERO || amount1 <= Decimal::ZERO {
            return Err(AmmError::InvalidInput("deposit amounts must be positive"));
        }

        let minted = if pool.is_empty() {
            decimal_sqrt_mul_div(amount0, amount1, Decimal::ONE)?
        } else {
            let total = pool.total_shares();
            let by0 = decimal_mul_div(amount0, total, pool.reserve0(), Rounding::Down)?;
            let by1 = decimal_mul_div(amount1, total, pool.reserve1(), Rounding::Down)?;
            by0.min(by1)
        };
        if minted.is_zero() {
            return Err(AmmError::InvalidInput("deposit too small to mint shares"));
        }
        let new_balance = self.shares_of(owner).safe_add(&minted)?;
        pool.mint(amount0, amount1, minted)?;
        self.shares.insert(owner.clone(), new_balance);

        info!(
            %owner,
            %amount0,
            %amount1,
            %minted,
            total_shares = %pool.total_shares(),
            "Liquidity added"
        );
        Ok(minted)
    }

    /// Burns `shares` held by `owner` from `pool` and pays out the
    /// pro-rata reserves, truncated to 18 fractional digits.
    ///
    /// Returns `(amount0_out, amount1_out)`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidInput`] if `shares` is not positive.
    /// - [`AmmError::InsufficientShares`] if `owner` holds fewer than
    ///   `shares`, or the pool's supply is smaller than the ledger says.
    pub fn remove_liquidity(
        &mut self,
        pool: &mut ConstantProductPool,
        owner: &AccountId,
        shares: Decimal,
    ) -> crate::error::Result<(Decimal, Decimal)> {
        if shares <= Decimal::ZERO {
            return Err(AmmError::InvalidInput("shares to burn must be positive"));
        }
        let balance = self.shares_of(owner);
        if shares > balance {
            return Err(AmmError::InsufficientShares(
                "withdrawal exceeds shares held",
            ));
        }
        let remaining = balance.safe_sub(&shares)?;

        let (amount0, amount1) = pool.burn(shares)?;
        if remaining.is_zero() {
            self.shares.remove(owner);
        } else {
            self.shares.insert(owner.clone(), remaining);
        }

        info!(
            %owner,
            %shares,
            %amount0,
            %amount1,
            total_shares = %pool.total_shares(),
            "Liquidity removed"
        );
        Ok((amount0, amount1))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::config::PoolConfig;
    use crate::domain::{FeeTier, SwapDirection};
    use crate::traits::SwapPool;
    use rust_decimal_macros::dec;

    fn config() -> PoolConfig {
        let Ok(cfg) = PoolConfig::from_tokens("ETH", "USDC", FeeTier::TIER_0_30_PERCENT) else {
            panic!("expected valid config");
        };
        cfg
    }

    fn empty_pool() -> ConstantProductPool {
        let Ok(pool) = ConstantProductPool::empty(config()) else {
            panic!("expected empty pool");
        };
        pool
    }

    fn alice() -> AccountId {
        AccountId::from("alice")
    }

    fn bob() -> AccountId {
        AccountId::from("bob")
    }

    fn deposit(
        m: &mut LiquidityManager,
        pool: &mut ConstantProductPool,
        owner: &AccountId,
        a0: Decimal,
        a1: Decimal,
    ) -> Decimal {
        let Ok(minted) = m.add_liquidity(pool, owner, a0, a1) else {
            panic!("expected deposit");
        };
        minted
    }

    // -- add_liquidity --------------------------------------------------------

    #[test]
    fn first_deposit_mints_geometric_mean() {
        let (mut m, mut pool) = (LiquidityManager::new(), empty_pool());
        let minted = deposit(&mut m, &mut pool, &alice(), dec!(1_000), dec!(1_000));
        assert_eq!(minted, dec!(1_000));
        assert_eq!(pool.total_shares(), dec!(1_000));
        assert_eq!(m.shares_of(&alice()), dec!(1_000));
    }

    #[test]
    fn proportional_deposit_mints_pro_rata() {
        let (mut m, mut pool) = (LiquidityManager::new(), empty_pool());
        deposit(&mut m, &mut pool, &alice(), dec!(1_000), dec!(1_000));
        let minted = deposit(&mut m, &mut pool, &bob(), dec!(500), dec!(500));
        assert_eq!(minted, dec!(500));
        assert_eq!(pool.total_shares(), dec!(1_500));
        assert_eq!(pool.reserve0(), dec!(1_500));
        assert_eq!(pool.reserve1(), dec!(1_500));
    }

    #[test]
    fn unbalanced_deposit_uses_smaller_ratio() {
        let (mut m, mut pool) = (LiquidityManager::new(), empty_pool());
        deposit(&mut m, &mut pool, &alice(), dec!(1_000), dec!(4_000));
        assert_eq!(pool.total_shares(), dec!(2_000));
        // 10% of token0, 5% of token1: the smaller ratio wins.
        let minted = deposit(&mut m, &mut pool, &bob(), dec!(100), dec!(200));
        assert_eq!(minted, dec!(100));
    }

    #[test]
    fn non_positive_amounts_rejected() {
        let (mut m, mut pool) = (LiquidityManager::new(), empty_pool());
        assert!(matches!(
            m.add_liquidity(&mut pool, &alice(), dec!(0), dec!(10)),
            Err(AmmError::InvalidInput(_))
        ));
        assert!(matches!(
            m.add_liquidity(&mut pool, &alice(), dec!(10), dec!(-1)),
            Err(AmmError::InvalidInput(_))
        ));
        assert!(pool.is_empty());
        assert!(m.is_empty());
    }

    #[test]
    fn deposit_at_large_reserves() {
        let (mut m, mut pool) = (LiquidityManager::new(), empty_pool());
        let one = dec!(1_000_000_000_000_000);
        let two = dec!(2_000_000_000_000_000);
        assert_eq!(deposit(&mut m, &mut pool, &alice(), one, one), one);
        // amount × total_shares = 2e30 is beyond the Decimal range
        assert_eq!(deposit(&mut m, &mut pool, &bob(), two, two), two);
        let Ok((a0, a1)) = m.remove_liquidity(&mut pool, &bob(), two) else {
            panic!("expected withdrawal");
        };
        assert_eq!((a0, a1), (two, two));
    }

    // -- remove_liquidity -----------------------------------------------------

    #[test]
    fn partial_withdrawal_pays_pro_rata() {
        let (mut m, mut pool) = (LiquidityManager::new(), empty_pool());
        deposit(&mut m, &mut pool, &alice(), dec!(1_000), dec!(2_000));
        let total = pool.total_shares();
        let Ok((a0, a1)) = m.remove_liquidity(&mut pool, &alice(), total / dec!(4)) else {
            panic!("expected withdrawal");
        };
        assert_eq!(a0, dec!(250));
        assert_eq!(a1, dec!(500));
        assert_eq!(m.shares_of(&alice()), total - total / dec!(4));
    }

    #[test]
    fn withdrawal_limited_to_own_balance() {
        let (mut m, mut pool) = (LiquidityManager::new(), empty_pool());
        deposit(&mut m, &mut pool, &alice(), dec!(1_000), dec!(1_000));
        deposit(&mut m, &mut pool, &bob(), dec!(100), dec!(100));
        let (ledger_before, pool_before) = (m.clone(), pool.clone());
        assert_eq!(
            m.remove_liquidity(&mut pool, &bob(), dec!(101)),
            Err(AmmError::InsufficientShares("withdrawal exceeds shares held"))
        );
        assert_eq!(m, ledger_before);
        assert_eq!(pool, pool_before);
        assert!(matches!(
            m.remove_liquidity(&mut pool, &AccountId::from("carol"), dec!(1)),
            Err(AmmError::InsufficientShares(_))
        ));
    }

    #[test]
    fn full_withdrawal_empties_pool() {
        let (mut m, mut pool) = (LiquidityManager::new(), empty_pool());
        deposit(&mut m, &mut pool, &alice(), dec!(1_000), dec!(1_000));
        let Ok((a0, a1)) = m.remove_liquidity(&mut pool, &alice(), dec!(1_000)) else {
            panic!("expected withdrawal");
        };
        assert_eq!((a0, a1), (dec!(1_000), dec!(1_000)));
        assert!(pool.is_empty());
        assert_eq!(pool.reserve0(), Decimal::ZERO);
        assert_eq!(m.holders().count(), 0);

        // The next deposit reseeds the pool at its own ratio.
        assert_eq!(deposit(&mut m, &mut pool, &bob(), dec!(4), dec!(9)), dec!(6));
        assert_eq!(pool.spot_price(), Ok(dec!(2.25)));
    }

    #[test]
    fn fees_accrue_to_holders() {
        let (mut m, mut pool) = (LiquidityManager::new(), empty_pool());
        deposit(&mut m, &mut pool, &alice(), dec!(1_000), dec!(1_000));
        let Ok(_) = pool.execute_swap(dec!(100), SwapDirection::ZeroForOne, Decimal::ZERO) else {
            panic!("expected swap");
        };
        let Ok(_) = pool.execute_swap(dec!(90), SwapDirection::OneForZero, Decimal::ZERO) else {
            panic!("expected swap");
        };
        let Ok((a0, a1)) = m.remove_liquidity(&mut pool, &alice(), dec!(1_000)) else {
            panic!("expected withdrawal");
        };
        assert!(a0 * a1 > dec!(1_000_000));
    }

    #[test]
    fn genesis_owner_holds_initial_supply() {
        let Ok(mut pool) = ConstantProductPool::initialize(config(), dec!(100), dec!(400)) else {
            panic!("expected pool");
        };
        let mut m = LiquidityManager::with_genesis_owner(&pool, alice());
        assert_eq!(m.shares_of(&alice()), dec!(200));
        assert_eq!(m.holders().collect::<Vec<_>>(), vec![(&alice(), dec!(200))]);

        let Ok((a0, a1)) = m.remove_liquidity(&mut pool, &alice(), dec!(200)) else {
            panic!("expected withdrawal");
        };
        assert_eq!((a0, a1), (dec!(100), dec!(400)));
        assert!(pool.is_empty());
    }
}
