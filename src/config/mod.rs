//! Pool configuration structs and the serializable market document.
//!
//! [`AmmConfig`] is the typed blueprint for creating a pool;
//! [`EngineConfig`] is the `serde` form a whole engine is loaded from.

mod amm_config;
mod clmm;
mod constant_product;
mod market;
mod pool;

pub use amm_config::AmmConfig;
pub use clmm::ClmmConfig;
pub use constant_product::ConstantProductConfig;
pub use market::{EngineConfig, MarketConfig, PoolVariant};
pub use pool::PoolConfig;
