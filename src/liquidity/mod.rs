//! Share-based liquidity provision for constant-product markets.
//!
//! [`LiquidityManager`] keeps a per-account share ledger and mints or
//! burns against a borrowed
//! [`ConstantProductPool`](crate::pools::ConstantProductPool), usually
//! the one a [`SwapEngine`](crate::engine::SwapEngine) market holds.
//! Concentrated positions are managed directly on
//! [`ConcentratedLiquidityPool`](crate::pools::ConcentratedLiquidityPool)
//! through `open_position` / `close_position`.

mod manager;

pub use manager::LiquidityManager;
