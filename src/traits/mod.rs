//! Trait seams shared by the pool implementations.
//!
//! [`SwapPool`] for quoting and executing swaps, [`FromConfig`] for
//! configuration-driven construction.

mod from_config;
mod swap_pool;

pub use from_config::FromConfig;
pub use swap_pool::SwapPool;
