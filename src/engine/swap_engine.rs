//! Market registry and swap routing.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::config::EngineConfig;
#[cfg(feature = "constant-product")]
use crate::domain::AccountId;
use crate::domain::{MarketId, SwapIntent};
use crate::error::AmmError;
use crate::factory::DefaultPoolFactory;
#[cfg(feature = "constant-product")]
use crate::liquidity::LiquidityManager;
#[cfg(feature = "constant-product")]
use crate::pools::ConstantProductPool;
use crate::pools::{Pool, SwapOutcome};

/// Routes swap intents to the pool registered under a market id.
///
/// Each market owns exactly one [`Pool`]; the engine pattern-matches on
/// the pool's variant and forwards the intent's slippage floor to the
/// pool's own atomic `execute_swap`.
///
/// Constant-product markets also keep a [`LiquidityManager`] share ledger,
/// so deposits, routed swaps and withdrawals all act on the same pool.
/// Shares minted when a pool was built from reserves belong to no ledger
/// holder; register [`ConstantProductPool::empty`] to let the first
/// deposit seed the market.
///
/// # Example
///
/// ```rust
/// use hydra_pool_engine::config::EngineConfig;
/// use hydra_pool_engine::domain::{MarketId, SwapDirection, SwapIntent};
/// use hydra_pool_engine::engine::SwapEngine;
/// use rust_decimal::Decimal;
///
/// let config = EngineConfig::from_json_str(
///     r#"{ "markets": [ { "market": "ETH-USDC", "variant": "v2", "token0": "ETH",
///          "token1": "USDC", "fee_bps": 30, "reserve0": "1000", "reserve1": "1000" } ] }"#,
/// )
/// .expect("valid json");
/// let mut engine = SwapEngine::from_config(&config).expect("markets built");
///
/// let market = MarketId::from("ETH-USDC");
/// let intent = SwapIntent::exact_in(Decimal::from(100), SwapDirection::ZeroForOne).expect("ok");
/// let outcome = engine.execute_swap(&market, &intent).expect("swap ok");
/// assert!(outcome.amount_out().expect("fits") > Decimal::from(90));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwapEngine {
    markets: BTreeMap<MarketId, Pool>,
    #[cfg(feature = "constant-product")]
    ledgers: BTreeMap<MarketId, LiquidityManager>,
}

impl SwapEngine {
    /// Creates an engine with no markets.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds every market listed in `config`.
    ///
    /// # Errors
    ///
    /// - Any error from [`MarketConfig::to_amm_config`](crate::config::MarketConfig::to_amm_config)
    ///   or [`DefaultPoolFactory::create`].
    /// - [`AmmError::InvalidConfig`] if a market id appears twice.
    pub fn from_config(config: &EngineConfig) -> crate::error::Result<Self> {
        let mut engine = Self::new();
        for market in &config.markets {
            let pool = DefaultPoolFactory::create(&market.to_amm_config()?)?;
            engine.register(market.market.clone(), pool)?;
        }
        Ok(engine)
    }

    /// Registers `pool` under `market`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfig`] if `market` is already taken.
    pub fn register(
        &mut self,
        market: MarketId,
        pool: impl Into<Pool>,
    ) -> crate::error::Result<()> {
        if self.markets.contains_key(&market) {
            return Err(AmmError::InvalidConfig("market already registered"));
        }
        let pool = pool.into();
        info!(
            %market,
            variant = %pool.variant(),
            token0 = %pool.token_pair().token0(),
            token1 = %pool.token_pair().token1(),
            fee = %pool.fee_tier(),
            "Market registered"
        );
        self.markets.insert(market, pool);
        Ok(())
    }

    /// Unregisters `market`, handing its pool back to the caller.
    pub fn remove(&mut self, market: &MarketId) -> Option<Pool> {
        #[cfg(feature = "constant-product")]
        self.ledgers.remove(market);
        let pool = self.markets.remove(market);
        if pool.is_some() {
            info!(%market, "Market removed");
        }
        pool
    }

    /// The pool registered under `market`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::UnknownMarket`] if nothing is registered.
    pub fn market(&self, market: &MarketId) -> crate::error::Result<&Pool> {
        self.markets
            .get(market)
            .ok_or_else(|| AmmError::UnknownMarket(market.to_string()))
    }

    /// Mutable access to the pool registered under `market`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::UnknownMarket`] if nothing is registered.
    pub fn market_mut(&mut self, market: &MarketId) -> crate::error::Result<&mut Pool> {
        self.markets
            .get_mut(market)
            .ok_or_else(|| AmmError::UnknownMarket(market.to_string()))
    }

    /// Registered markets in id order.
    pub fn markets(&self) -> impl Iterator<Item = (&MarketId, &Pool)> {
        self.markets.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.markets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markets.is_empty()
    }

    /// Marginal price of `market`, token1 per token0.
    ///
    /// # Errors
    ///
    /// [`AmmError::UnknownMarket`], or anything the pool's `spot_price`
    /// returns.
    pub fn spot_price(&self, market: &MarketId) -> crate::error::Result<Decimal> {
        self.market(market)?.spot_price()
    }

    /// Quotes `intent` on `market` without mutating it.
    ///
    /// # Errors
    ///
    /// [`AmmError::UnknownMarket`], or anything [`Pool::simulate_swap`]
    /// returns.
    pub fn simulate_swap(
        &self,
        market: &MarketId,
        intent: &SwapIntent,
    ) -> crate::error::Result<SwapOutcome> {
        let outcome = self.market(market)?.simulate_swap(intent)?;
        debug!(%market, direction = %intent.direction(), amount_in = %intent.amount_in(), "Swap simulated");
        Ok(outcome)
    }

    /// Executes `intent` on `market`.
    ///
    /// The pool is left untouched unless the whole swap succeeds and its
    /// output clears `intent.min_amount_out()`.
    ///
    /// # Errors
    ///
    /// [`AmmError::UnknownMarket`], or anything [`Pool::execute_swap`]
    /// returns, including [`AmmError::SlippageExceeded`].
    pub fn execute_swap(
        &mut self,
        market: &MarketId,
        intent: &SwapIntent,
    ) -> crate::error::Result<SwapOutcome> {
        let outcome = self.market_mut(market)?.execute_swap(intent)?;
        info!(
            %market,
            direction = %intent.direction(),
            amount_in = %intent.amount_in(),
            "Swap routed"
        );
        Ok(outcome)
    }

    /// Share ledger of a constant-product `market`, if anyone holds shares.
    #[cfg(feature = "constant-product")]
    #[must_use]
    pub fn liquidity(&self, market: &MarketId) -> Option<&LiquidityManager> {
        self.ledgers.get(market)
    }

    /// Shares `owner` holds in `market`; zero when none.
    #[cfg(feature = "constant-product")]
    #[must_use]
    pub fn shares_of(&self, market: &MarketId, owner: &AccountId) -> Decimal {
        self.ledgers
            .get(market)
            .map_or(Decimal::ZERO, |ledger| ledger.shares_of(owner))
    }

    /// Deposits into the constant-product pool registered under `market`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::UnknownMarket`] if nothing is registered.
    /// - [`AmmError::UnsupportedPoolVariant`] if the market is not
    ///   constant-product.
    /// - Anything [`LiquidityManager::add_liquidity`] returns.
    #[cfg(feature = "constant-product")]
    pub fn add_liquidity(
        &mut self,
        market: &MarketId,
        owner: &AccountId,
        amount0: Decimal,
        amount1: Decimal,
    ) -> crate::error::Result<Decimal> {
        let pool = share_pool(&mut self.markets, market)?;
        let ledger = self.ledgers.entry(market.clone()).or_default();
        let minted = ledger.add_liquidity(pool, owner, amount0, amount1);
        if ledger.is_empty() {
            self.ledgers.remove(market);
        }
        let minted = minted?;
        debug!(%market, %owner, %minted, "Deposit routed");
        Ok(minted)
    }

    /// Withdraws `shares` held by `owner` from the constant-product pool
    /// registered under `market`.
    ///
    /// Returns `(amount0_out, amount1_out)`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::UnknownMarket`] if nothing is registered.
    /// - [`AmmError::UnsupportedPoolVariant`] if the market is not
    ///   constant-product.
    /// - Anything [`LiquidityManager::remove_liquidity`] returns.
    #[cfg(feature = "constant-product")]
    pub fn remove_liquidity(
        &mut self,
        market: &MarketId,
        owner: &AccountId,
        shares: Decimal,
    ) -> crate::error::Result<(Decimal, Decimal)> {
        let pool = share_pool(&mut self.markets, market)?;
        let ledger = self
            .ledgers
            .get_mut(market)
            .ok_or(AmmError::InsufficientShares("withdrawal exceeds shares held"))?;
        let paid = ledger.remove_liquidity(pool, owner, shares);
        if ledger.is_empty() {
            self.ledgers.remove(market);
        }
        let (amount0, amount1) = paid?;
        debug!(%market, %owner, %shares, "Withdrawal routed");
        Ok((amount0, amount1))
    }
}

/// The constant-product pool behind `market`.
#[cfg(feature = "constant-product")]
fn share_pool<'a>(
    markets: &'a mut BTreeMap<MarketId, Pool>,
    market: &MarketId,
) -> crate::error::Result<&'a mut ConstantProductPool> {
    let pool = markets
        .get_mut(market)
        .ok_or_else(|| AmmError::UnknownMarket(market.to_string()))?;
    let variant = pool.variant();
    pool.as_constant_product_mut()
        .ok_or_else(|| AmmError::UnsupportedPoolVariant(variant.to_string()))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::config::PoolConfig;
    use crate::domain::{FeeTier, SwapDirection};
    use rust_decimal_macros::dec;

    const CONFIG: &str = r#"{
        "markets": [
            { "market": "ETH-USDC", "variant": "v2", "token0": "ETH", "token1": "USDC",
              "fee_bps": 30, "reserve0": "1000", "reserve1": "1000" },
            { "market": "WBTC-ETH", "variant": "clmm", "token0": "WBTC", "token1": "ETH",
              "fee_bps": 5, "initial_tick": 0,
              "positions": [{ "owner": "lp", "lower_tick": -1000, "upper_tick": 1000,
                              "liquidity": 10000 }] }
        ]
    }"#;

    fn engine() -> SwapEngine {
        let Ok(config) = EngineConfig::from_json_str(CONFIG) else {
            panic!("expected valid json");
        };
        let Ok(engine) = SwapEngine::from_config(&config) else {
            panic!("expected markets");
        };
        engine
    }

    fn v2() -> MarketId {
        MarketId::from("ETH-USDC")
    }

    fn v3() -> MarketId {
        MarketId::from("WBTC-ETH")
    }

    fn intent(amount_in: Decimal, min_out: Decimal) -> SwapIntent {
        let Ok(i) = SwapIntent::new(amount_in, SwapDirection::ZeroForOne, min_out) else {
            panic!("expected valid intent");
        };
        i
    }

    // -- registry -------------------------------------------------------------

    #[test]
    fn builds_markets_from_config() {
        let engine = engine();
        assert_eq!(engine.len(), 2);
        let Ok(pool) = engine.market(&v2()) else {
            panic!("v2 registered");
        };
        assert!(pool.is_constant_product());
        let Ok(pool) = engine.market(&v3()) else {
            panic!("v3 registered");
        };
        assert!(pool.is_concentrated());
        assert_eq!(engine.spot_price(&v2()), Ok(dec!(1)));
    }

    #[test]
    fn unknown_market_rejected() {
        let mut engine = engine();
        let missing = MarketId::from("DOGE-USDC");
        assert_eq!(
            engine.spot_price(&missing),
            Err(AmmError::UnknownMarket("DOGE-USDC".to_owned()))
        );
        assert!(matches!(
            engine.execute_swap(&missing, &intent(dec!(1), dec!(0))),
            Err(AmmError::UnknownMarket(_))
        ));
    }

    #[test]
    fn duplicate_registration_rejected() {
        let mut engine = engine();
        let Ok(cfg) = PoolConfig::from_tokens("ETH", "USDC", FeeTier::TIER_0_30_PERCENT) else {
            panic!("expected config");
        };
        let Ok(pool) = ConstantProductPool::initialize(cfg, dec!(1), dec!(1)) else {
            panic!("expected pool");
        };
        assert_eq!(
            engine.register(v2(), pool),
            Err(AmmError::InvalidConfig("market already registered"))
        );
        assert!(engine.remove(&v2()).is_some());
        assert!(engine.remove(&v2()).is_none());
        assert_eq!(engine.len(), 1);
    }

    // -- routing --------------------------------------------------------------

    #[test]
    fn routes_constant_product_swap() {
        let mut engine = engine();
        let Ok(SwapOutcome::ConstantProduct(quote)) =
            engine.execute_swap(&v2(), &intent(dec!(100), dec!(90)))
        else {
            panic!("expected constant-product quote");
        };
        assert_eq!(quote.amount_out(), dec!(90.661089388014913158));
        assert_eq!(quote.fee_paid(), dec!(0.3));
        assert_eq!(quote.price_before(), dec!(1));
        let Ok(price) = engine.spot_price(&v2()) else {
            panic!("expected price");
        };
        assert!(price > dec!(0.8266) && price < dec!(0.8267));
    }

    #[test]
    fn routes_concentrated_swap() {
        let mut engine = engine();
        let Ok(SwapOutcome::Concentrated(result)) =
            engine.execute_swap(&v3(), &intent(dec!(100), dec!(0)))
        else {
            panic!("expected concentrated result");
        };
        assert_eq!(result.amount_out(), 98);
        assert_eq!(result.fee_paid(), 1);
        assert_eq!(result.ticks_crossed(), 0);
        assert_eq!(result.final_tick(), -198);
    }

    #[test]
    fn slippage_leaves_markets_untouched() {
        let mut engine = engine();
        let before = engine.clone();
        let Err(e) = engine.execute_swap(&v2(), &intent(dec!(100), dec!(91))) else {
            panic!("expected slippage failure");
        };
        assert!(e.is_slippage());
        let Err(e) = engine.execute_swap(&v3(), &intent(dec!(100), dec!(99))) else {
            panic!("expected slippage failure");
        };
        assert!(e.is_slippage());
        assert_eq!(engine, before);
    }

    #[test]
    fn concentrated_rejects_fractional_amounts() {
        let engine = engine();
        assert!(matches!(
            engine.simulate_swap(&v3(), &intent(dec!(100.5), dec!(0))),
            Err(AmmError::InvalidInput(_))
        ));
    }

    #[test]
    fn simulate_matches_execute() {
        let mut engine = engine();
        let swap = intent(dec!(40), dec!(0));
        for market in [v2(), v3()] {
            let Ok(quoted) = engine.simulate_swap(&market, &swap) else {
                panic!("expected quote");
            };
            let Ok(executed) = engine.execute_swap(&market, &swap) else {
                panic!("expected swap");
            };
            assert_eq!(quoted, executed);
        }
    }

    // -- liquidity ------------------------------------------------------------

    fn empty_v2_engine() -> SwapEngine {
        let Ok(cfg) = PoolConfig::from_tokens("ETH", "USDC", FeeTier::TIER_0_30_PERCENT) else {
            panic!("expected config");
        };
        let Ok(pool) = ConstantProductPool::empty(cfg) else {
            panic!("expected pool");
        };
        let mut engine = SwapEngine::new();
        let Ok(()) = engine.register(v2(), pool) else {
            panic!("expected registration");
        };
        engine
    }

    #[test]
    fn deposit_seeds_registered_market() {
        let mut engine = empty_v2_engine();
        let alice = AccountId::from("alice");
        assert_eq!(engine.spot_price(&v2()), Err(AmmError::InsufficientLiquidity));
        assert_eq!(engine.add_liquidity(&v2(), &alice, dec!(1_000), dec!(4_000)), Ok(dec!(2_000)));
        assert_eq!(engine.spot_price(&v2()), Ok(dec!(4)));
        assert_eq!(engine.shares_of(&v2(), &alice), dec!(2_000));
        let Some(pool) = engine.market(&v2()).ok().and_then(Pool::as_constant_product) else {
            panic!("expected constant-product market");
        };
        assert_eq!(pool.total_shares(), dec!(2_000));
    }

    #[test]
    fn failed_deposit_leaves_engine_untouched() {
        let mut engine = empty_v2_engine();
        let before = engine.clone();
        let alice = AccountId::from("alice");
        assert!(matches!(
            engine.add_liquidity(&v2(), &alice, dec!(0), dec!(1)),
            Err(AmmError::InvalidInput(_))
        ));
        assert_eq!(
            engine.remove_liquidity(&v2(), &alice, dec!(1)),
            Err(AmmError::InsufficientShares("withdrawal exceeds shares held"))
        );
        assert_eq!(engine, before);
        assert!(engine.liquidity(&v2()).is_none());
    }

    #[test]
    fn liquidity_routing_checks_market() {
        let mut engine = engine();
        let alice = AccountId::from("alice");
        assert_eq!(
            engine.add_liquidity(&v3(), &alice, dec!(1), dec!(1)),
            Err(AmmError::UnsupportedPoolVariant("concentrated".to_owned()))
        );
        assert!(matches!(
            engine.remove_liquidity(&MarketId::from("DOGE-USDC"), &alice, dec!(1)),
            Err(AmmError::UnknownMarket(_))
        ));
    }

    #[test]
    fn withdrawal_drops_empty_ledger() {
        let mut engine = empty_v2_engine();
        let alice = AccountId::from("alice");
        let Ok(minted) = engine.add_liquidity(&v2(), &alice, dec!(10), dec!(10)) else {
            panic!("expected deposit");
        };
        assert_eq!(engine.remove_liquidity(&v2(), &alice, minted), Ok((dec!(10), dec!(10))));
        assert!(engine.liquidity(&v2()).is_none());
        assert_eq!(engine, empty_v2_engine());
    }
}
