//! Domain value types shared by every pool kind.
//!
//! Newtypes with validated constructors: identifiers, fee rates, ticks,
//! range positions, swap intents and swap outcomes.

mod basis_points;
mod fee_tier;
mod identifier;
mod position;
mod rounding;
mod swap_result;
mod swap_intent;
mod tick;
mod token_pair;

pub use basis_points::BasisPoints;
pub use fee_tier::FeeTier;
pub use identifier::{AccountId, MarketId, TokenId};
pub use position::{ClosedPosition, OpenedPosition, PositionId, RangePosition};
pub use rounding::Rounding;
pub use swap_result::{SwapQuote, SwapResult};
pub use swap_intent::{SwapDirection, SwapIntent, decimal_to_raw, raw_to_decimal};
pub use tick::{MAX_TICK, MIN_TICK, Tick};
pub use token_pair::TokenPair;
