//! Pool instantiation via the factory pattern.
//!
//! The [`DefaultPoolFactory`] creates pools from [`AmmConfig`] values,
//! validating configuration and dispatching to the appropriate pool
//! constructor based on the config variant.
//!
//! # Usage
//!
//! ```rust
//! use hydra_pool_engine::config::{AmmConfig, ClmmConfig, PoolConfig};
//! use hydra_pool_engine::domain::{FeeTier, Tick};
//! use hydra_pool_engine::factory::DefaultPoolFactory;
//!
//! let pool_cfg = PoolConfig::from_tokens("WBTC", "ETH", FeeTier::TIER_0_05_PERCENT).expect("ok");
//! let cfg = ClmmConfig::at_tick(pool_cfg, 10, Tick::ZERO, vec![]).expect("valid");
//!
//! let pool = DefaultPoolFactory::create(&AmmConfig::Clmm(cfg)).expect("pool created");
//! assert_eq!(pool.fee_tier(), FeeTier::TIER_0_05_PERCENT);
//! ```
//!
//! # Feature Gating
//!
//! Each match arm is gated behind its respective pool feature flag.
//! If a config variant is passed for a pool type whose feature is not
//! enabled, an [`AmmError::UnsupportedPoolVariant`] is returned.
//!
//! [`AmmConfig`]: crate::config::AmmConfig
//! [`AmmError::UnsupportedPoolVariant`]: crate::error::AmmError::UnsupportedPoolVariant

mod default_factory;

pub use default_factory::DefaultPoolFactory;
