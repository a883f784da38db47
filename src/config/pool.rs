//! Parameters shared by every pool kind.

use serde::{Deserialize, Serialize};

use crate::domain::{FeeTier, TokenId, TokenPair};
use crate::error::AmmError;

/// Token pair and fee rate of a pool.
///
/// This is the construction surface external collaborators supply
/// (`token0`, `token1`, `fee_bps`); pool-specific parameters live in
/// [`ConstantProductConfig`](super::ConstantProductConfig) and
/// [`ClmmConfig`](super::ClmmConfig).
///
/// # Validation
///
/// - The fee must be strictly below 100% (10 000 basis points).
/// - The token pair is validated at [`TokenPair`] construction time.
///
/// # Examples
///
/// ```
/// use hydra_pool_engine::config::PoolConfig;
/// use hydra_pool_engine::domain::FeeTier;
///
/// let cfg = PoolConfig::from_tokens("ETH", "USDC", FeeTier::TIER_0_30_PERCENT).expect("valid");
/// assert_eq!(cfg.fee_tier().basis_points().get(), 30);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PoolConfig {
    token_pair: TokenPair,
    fee_tier: FeeTier,
}

impl PoolConfig {
    /// Creates a validated `PoolConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfig`] if the fee is 10 000 basis
    /// points or more.
    pub fn new(token_pair: TokenPair, fee_tier: FeeTier) -> crate::error::Result<Self> {
        let config = Self {
            token_pair,
            fee_tier,
        };
        config.validate()?;
        Ok(config)
    }

    /// Builds the pair from two token identifiers.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfig`] if the tokens are equal or the
    /// fee is out of range.
    pub fn from_tokens(
        token0: impl Into<TokenId>,
        token1: impl Into<TokenId>,
        fee_tier: FeeTier,
    ) -> crate::error::Result<Self> {
        Self::new(TokenPair::new(token0.into(), token1.into())?, fee_tier)
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfig`] if the fee is 10 000 basis
    /// points or more.
    pub fn validate(&self) -> crate::error::Result<()> {
        if !self.fee_tier.basis_points().is_valid_fee() {
            return Err(AmmError::InvalidConfig(
                "fee must be below 10000 basis points",
            ));
        }
        Ok(())
    }

    /// Returns the token pair.
    #[must_use]
    pub const fn token_pair(&self) -> &TokenPair {
        &self.token_pair
    }

    /// Returns the fee tier.
    #[must_use]
    pub const fn fee_tier(&self) -> FeeTier {
        self.fee_tier
    }
}
