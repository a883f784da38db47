//! Swap routing across registered markets.
//!
//! [`SwapEngine`] owns one [`Pool`](crate::pools::Pool) per
//! [`MarketId`](crate::domain::MarketId) and dispatches on its variant.
//! [`SharedPool`] wraps a single pool in a read-write lock for callers
//! that drive it from several threads.

mod shared;
mod swap_engine;

pub use shared::SharedPool;
pub use swap_engine::SwapEngine;
