//! Construction trait for building pools from configuration.
//!
//! Each pool type implements `FromConfig<C>` for its own config struct,
//! so the factory dispatches construction without `dyn` trait objects:
//!
//! ```text
//! AmmConfig::ConstantProduct(cfg) => ConstantProductPool::from_config(&cfg)
//! AmmConfig::Clmm(cfg)            => ConcentratedLiquidityPool::from_config(&cfg)
//! ```
//!
//! Implementations re-validate the configuration, so a successfully
//! constructed pool is always in a valid initial state.

/// Builds a pool from a configuration.
///
/// # Implementors
///
/// - `impl FromConfig<ConstantProductConfig> for ConstantProductPool`
/// - `impl FromConfig<ClmmConfig> for ConcentratedLiquidityPool`
pub trait FromConfig<C> {
    /// Creates a new pool instance from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfig`](crate::error::AmmError::InvalidConfig)
    /// (or a more specific variant) if any parameter is out of range or
    /// inconsistent.
    fn from_config(config: &C) -> crate::error::Result<Self>
    where
        Self: Sized;
}
