//! Ordered pair of distinct tokens.

use serde::{Deserialize, Serialize};

use super::{SwapDirection, TokenId};
use crate::error::AmmError;

/// The two tokens of a pool, in pool order.
///
/// Unlike a canonical pair, the order is the caller's: prices are always
/// quoted as token1 per token0, so swapping the tokens inverts the price.
///
/// # Examples
///
/// ```
/// use hydra_pool_engine::domain::{SwapDirection, TokenId, TokenPair};
///
/// let pair = TokenPair::new(TokenId::from("ETH"), TokenId::from("USDC")).expect("distinct");
/// assert_eq!(pair.token0().as_str(), "ETH");
/// assert_eq!(
///     pair.direction_for(&TokenId::from("USDC")).expect("member"),
///     SwapDirection::OneForZero
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenPair {
    token0: TokenId,
    token1: TokenId,
}

impl TokenPair {
    /// Creates a new pair.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfig`] if both identifiers are equal.
    pub fn new(token0: TokenId, token1: TokenId) -> crate::error::Result<Self> {
        if token0 == token1 {
            return Err(AmmError::InvalidConfig(
                "token pair requires two distinct tokens",
            ));
        }
        Ok(Self { token0, token1 })
    }

    /// Returns the base token.
    #[must_use]
    pub const fn token0(&self) -> &TokenId {
        &self.token0
    }

    /// Returns the quote token.
    #[must_use]
    pub const fn token1(&self) -> &TokenId {
        &self.token1
    }

    /// Returns `true` if `token` is part of this pair.
    #[must_use]
    pub fn contains(&self, token: &TokenId) -> bool {
        self.token0 == *token || self.token1 == *token
    }

    /// Direction of a swap that sells `token_in`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidInput`] if `token_in` is not in the pair.
    pub fn direction_for(&self, token_in: &TokenId) -> crate::error::Result<SwapDirection> {
        if *token_in == self.token0 {
            Ok(SwapDirection::ZeroForOne)
        } else if *token_in == self.token1 {
            Ok(SwapDirection::OneForZero)
        } else {
            Err(AmmError::InvalidInput("token is not part of the pool pair"))
        }
    }
}
