//! # Hydra Pool Engine
//!
//! Automated Market Maker pools with exact, deterministic arithmetic:
//!
//! - **Constant Product** (Uniswap V2 style), `constant-product` feature:
//!   `x · y = k` over `Decimal` reserves, fee on input, LP shares.
//! - **Concentrated Liquidity** (Uniswap V3 style), `clmm` feature:
//!   range positions over a sparse tick map, Q64.96 square-root prices,
//!   bracket-by-bracket swaps and per-position fee accounting.
//!
//! Every mutating call is atomic: a failed swap, deposit or withdrawal
//! leaves the pool exactly as it was.
//!
//! # Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `constant-product` | yes | [`ConstantProductPool`](pools::ConstantProductPool) and [`LiquidityManager`](liquidity::LiquidityManager) |
//! | `clmm` | yes | [`ConcentratedLiquidityPool`](pools::ConcentratedLiquidityPool) |
//! | `all-pools` | yes | Both pool kinds |
//!
//! ## Route a swap through the engine
//!
//! ```rust
//! use hydra_pool_engine::config::{AmmConfig, ConstantProductConfig, PoolConfig};
//! use hydra_pool_engine::domain::{FeeTier, MarketId, SwapDirection, SwapIntent};
//! use hydra_pool_engine::engine::SwapEngine;
//! use hydra_pool_engine::factory::DefaultPoolFactory;
//! use rust_decimal::Decimal;
//!
//! // 1. Describe the pool
//! let pool_cfg = PoolConfig::from_tokens("ETH", "USDC", FeeTier::TIER_0_30_PERCENT)
//!     .expect("valid tokens");
//! let config = AmmConfig::ConstantProduct(
//!     ConstantProductConfig::new(pool_cfg, Decimal::from(1_000), Decimal::from(1_000))
//!         .expect("valid config"),
//! );
//!
//! // 2. Build it and register it as a market
//! let mut engine = SwapEngine::new();
//! let market = MarketId::from("ETH-USDC");
//! engine
//!     .register(market.clone(), DefaultPoolFactory::create(&config).expect("pool created"))
//!     .expect("new market");
//!
//! // 3. Sell 100 ETH with a 90 USDC floor
//! let intent = SwapIntent::new(Decimal::from(100), SwapDirection::ZeroForOne, Decimal::from(90))
//!     .expect("valid intent");
//! let outcome = engine.execute_swap(&market, &intent).expect("swap succeeded");
//!
//! assert!(outcome.amount_out().expect("fits") > Decimal::from(90));
//! assert_eq!(outcome.fee_paid().expect("fits"), Decimal::new(3, 1));
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │  SwapEngine  │  MarketId -> Pool, routes SwapIntent
//! └──────┬───────┘
//!        │ match on Pool variant
//!        ▼
//! ┌──────────────┐       ┌──────────────────┐
//! │    Pools     │◄──────│ LiquidityManager │  V2 share ledger
//! └──────┬───────┘       └──────────────────┘
//!        │ SwapPool trait
//!        ▼
//! ┌──────────────┐
//! │     Math     │  checked Decimal, mul_div, tick <-> sqrt price
//! └──────────────┘
//! ```
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`domain`] | Value types: [`Tick`](domain::Tick), [`FeeTier`](domain::FeeTier), [`SwapIntent`](domain::SwapIntent), [`SwapResult`](domain::SwapResult), etc. |
//! | [`traits`] | [`SwapPool`](traits::SwapPool) and [`FromConfig`](traits::FromConfig) |
//! | [`config`] | Typed pool configs and the serializable [`EngineConfig`](config::EngineConfig) |
//! | [`pools`]  | Pool implementations and the [`Pool`](pools::Pool) dispatch enum |
//! | [`factory`] | [`DefaultPoolFactory`](factory::DefaultPoolFactory) for config-driven pool construction |
//! | [`engine`] | [`SwapEngine`](engine::SwapEngine) registry and [`SharedPool`](engine::SharedPool) |
//! | [`liquidity`] | [`LiquidityManager`](liquidity::LiquidityManager) for V2 deposits and withdrawals |
//! | [`math`]   | Checked arithmetic, 512-bit `mul_div`, tick math |
//! | [`error`]  | [`AmmError`](error::AmmError) unified error enum |
//! | [`prelude`] | Convenience re-exports for common types and traits |

pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod factory;
#[cfg(feature = "constant-product")]
pub mod liquidity;
pub mod math;
pub mod pools;
pub mod prelude;
pub mod traits;
