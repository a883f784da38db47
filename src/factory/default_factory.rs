//! Default pool factory implementation.

use tracing::debug;

use crate::config::AmmConfig;
#[cfg(any(feature = "constant-product", feature = "clmm"))]
use crate::traits::FromConfig;
use crate::error::AmmError;
use crate::pools::Pool;

/// Stateless factory for creating pools from configuration.
///
/// `DefaultPoolFactory` is the single entry point for constructing either
/// pool kind.  It matches on the [`AmmConfig`] variant, validates the
/// configuration, delegates to the pool's [`FromConfig`] implementation,
/// and wraps the result in a [`Pool`].
///
/// # Example
///
/// ```rust
/// use hydra_pool_engine::config::{AmmConfig, ConstantProductConfig, PoolConfig};
/// use hydra_pool_engine::domain::FeeTier;
/// use hydra_pool_engine::factory::DefaultPoolFactory;
/// use rust_decimal::Decimal;
///
/// let pool_cfg = PoolConfig::from_tokens("ETH", "USDC", FeeTier::TIER_0_30_PERCENT).expect("valid");
/// let config = AmmConfig::ConstantProduct(
///     ConstantProductConfig::new(pool_cfg, Decimal::from(1_000), Decimal::from(2_000))
///         .expect("valid config"),
/// );
///
/// let pool = DefaultPoolFactory::create(&config).expect("pool created");
/// assert_eq!(pool.spot_price(), Ok(Decimal::from(2)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DefaultPoolFactory;

impl DefaultPoolFactory {
    /// Creates a pool from `config`.
    ///
    /// # Flow
    ///
    /// 1. Validate the configuration via [`AmmConfig::validate`].
    /// 2. Match on the config variant.
    /// 3. Delegate to the pool's [`FromConfig`] implementation.
    /// 4. Wrap the constructed pool in the corresponding [`Pool`] variant.
    ///
    /// # Errors
    ///
    /// - [`AmmError::UnsupportedPoolVariant`] if the requested pool kind's
    ///   feature is not enabled.
    /// - Any error propagated from validation or `from_config`.
    pub fn create(config: &AmmConfig) -> crate::error::Result<Pool> {
        config.validate()?;
        debug!(kind = %config, "Creating pool from config");

        match config {
            #[cfg(feature = "constant-product")]
            AmmConfig::ConstantProduct(cfg) => {
                let pool = crate::pools::ConstantProductPool::from_config(cfg)?;
                Ok(Pool::from(pool))
            }

            #[cfg(feature = "clmm")]
            AmmConfig::Clmm(cfg) => {
                let pool = crate::pools::ConcentratedLiquidityPool::from_config(cfg)?;
                Ok(Pool::from(pool))
            }

            // Config variants whose pool feature is disabled.
            #[allow(unreachable_patterns)]
            _ => Err(AmmError::UnsupportedPoolVariant(config.to_string())),
        }
    }
}
