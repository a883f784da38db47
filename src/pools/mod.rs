//! Feature-gated pool implementations and the [`Pool`] dispatch enum.
//!
//! Each pool type is behind its own Cargo feature flag.  The [`Pool`]
//! enum provides static dispatch across the enabled pool types, allowing
//! heterogeneous collections without `dyn` trait objects.
//!
//! # Pool Types
//!
//! | Feature | Pool | Style |
//! |---------|------|-------|
//! | `constant-product` | [`ConstantProductPool`] | Uniswap V2 |
//! | `clmm` | [`ConcentratedLiquidityPool`] | Uniswap V3 |

#[cfg(feature = "clmm")]
pub mod clmm;
#[cfg(feature = "constant-product")]
pub mod constant_product;

mod pool;

#[cfg(all(test, feature = "constant-product", feature = "clmm"))]
mod proptest_properties;

#[cfg(feature = "clmm")]
pub use clmm::ConcentratedLiquidityPool;
#[cfg(feature = "constant-product")]
pub use constant_product::ConstantProductPool;
pub use pool::{Pool, SwapOutcome};
