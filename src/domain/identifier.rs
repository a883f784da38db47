//! String-backed identifiers for tokens, accounts and markets.
//!
//! The engine never interprets identifiers; it only compares and orders
//! them.  Each kind gets its own newtype so a token symbol can't be passed
//! where an owner is expected.

use core::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_identifier!(
    /// Identifier of a token traded by a pool (symbol, mint, address...).
    ///
    /// ```
    /// use hydra_pool_engine::domain::TokenId;
    ///
    /// let usdc = TokenId::from("USDC");
    /// assert_eq!(usdc.as_str(), "USDC");
    /// ```
    TokenId
);

string_identifier!(
    /// Identifier of a liquidity owner.
    AccountId
);

string_identifier!(
    /// Identifier under which the engine registers a pool.
    MarketId
);
