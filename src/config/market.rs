//! Serializable market configuration.
//!
//! An [`EngineConfig`] lists the markets a [`SwapEngine`](crate::engine::SwapEngine)
//! should host.  Each [`MarketConfig`] is a flat record whose `variant`
//! tag picks the pool kind; the typed [`AmmConfig`] is derived from it
//! with full validation.
//!
//! ```json
//! {
//!   "markets": [
//!     { "market": "ETH-USDC", "variant": "v2", "token0": "ETH", "token1": "USDC",
//!       "fee_bps": 30, "reserve0": "1000", "reserve1": "2000000" },
//!     { "market": "WBTC-ETH", "variant": "clmm", "token0": "WBTC", "token1": "ETH",
//!       "fee_bps": 5, "initial_tick": 0,
//!       "positions": [{ "owner": "lp", "lower_tick": -1000, "upper_tick": 1000,
//!                       "liquidity": 10000 }] }
//!   ]
//! }
//! ```

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AmmConfig, ClmmConfig, ConstantProductConfig, PoolConfig};
use crate::domain::{BasisPoints, FeeTier, MarketId, RangePosition, Tick, TokenId};
use crate::error::AmmError;

/// Pool kind named by a market's `variant` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoolVariant {
    /// `constant_product` or `v2`.
    ConstantProduct,
    /// `concentrated`, `clmm` or `v3`.
    Concentrated,
}

impl PoolVariant {
    /// Canonical tag.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ConstantProduct => "constant_product",
            Self::Concentrated => "concentrated",
        }
    }
}

impl FromStr for PoolVariant {
    type Err = AmmError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "constant_product" | "v2" => Ok(Self::ConstantProduct),
            "concentrated" | "clmm" | "v3" => Ok(Self::Concentrated),
            _ => Err(AmmError::UnsupportedPoolVariant(tag.to_owned())),
        }
    }
}

impl fmt::Display for PoolVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One market as written in a configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketConfig {
    /// Registry key.
    pub market: MarketId,
    /// Pool kind tag, parsed by [`PoolVariant`].
    pub variant: String,
    /// Base token; prices are quoted as token1 per token0.
    pub token0: TokenId,
    /// Quote token.
    pub token1: TokenId,
    /// Fee in basis points, below 10 000.
    pub fee_bps: u32,
    /// Concentrated only; defaults from the fee tier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tick_spacing: Option<u32>,
    /// Constant-product initial reserve of token0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reserve0: Option<Decimal>,
    /// Constant-product initial reserve of token1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reserve1: Option<Decimal>,
    /// Concentrated starting tick, `0` (price 1) when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_tick: Option<i32>,
    /// Concentrated positions opened at creation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub positions: Vec<RangePosition>,
}

impl MarketConfig {
    /// Parses the `variant` tag.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::UnsupportedPoolVariant`] for an unknown tag.
    pub fn pool_variant(&self) -> crate::error::Result<PoolVariant> {
        self.variant.parse()
    }

    /// Builds the validated typed configuration.
    ///
    /// # Errors
    ///
    /// - [`AmmError::UnsupportedPoolVariant`] for an unknown tag.
    /// - [`AmmError::InvalidConfig`] when fields required by the variant
    ///   are missing, or any validation error of the typed configs.
    pub fn to_amm_config(&self) -> crate::error::Result<AmmConfig> {
        let variant = self.pool_variant()?;
        let fee_tier = FeeTier::new(BasisPoints::new(self.fee_bps));
        let pool = PoolConfig::from_tokens(self.token0.clone(), self.token1.clone(), fee_tier)?;
        match variant {
            PoolVariant::ConstantProduct => {
                let (Some(reserve0), Some(reserve1)) = (self.reserve0, self.reserve1) else {
                    return Err(AmmError::InvalidConfig(
                        "constant-product market requires reserve0 and reserve1",
                    ));
                };
                ConstantProductConfig::new(pool, reserve0, reserve1).map(AmmConfig::ConstantProduct)
            }
            PoolVariant::Concentrated => {
                let tick_spacing = self
                    .tick_spacing
                    .or_else(|| fee_tier.default_tick_spacing())
                    .ok_or(AmmError::InvalidConfig(
                        "tick spacing is required for a non-standard fee tier",
                    ))?;
                let tick = Tick::new(self.initial_tick.unwrap_or(0))?;
                ClmmConfig::at_tick(pool, tick_spacing, tick, self.positions.clone())
                    .map(AmmConfig::Clmm)
            }
        }
    }
}

/// Every market an engine hosts.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Markets in registration order.
    #[serde(default)]
    pub markets: Vec<MarketConfig>,
}

impl EngineConfig {
    /// Parses a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Config`] with the parser message on malformed
    /// input.  Semantic validation happens in
    /// [`MarketConfig::to_amm_config`].
    pub fn from_json_str(json: &str) -> crate::error::Result<Self> {
        serde_json::from_str(json).map_err(|e| AmmError::Config(e.to_string()))
    }

    /// Serializes back to pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Config`] if serialization fails.
    pub fn to_json_string(&self) -> crate::error::Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| AmmError::Config(e.to_string()))
    }
}
