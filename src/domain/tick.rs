//! Discrete price index for concentrated liquidity.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AmmError;

/// Minimum valid tick index.
pub const MIN_TICK: i32 = -887_272;

/// Maximum valid tick index.
pub const MAX_TICK: i32 = 887_272;

/// A validated tick index: `price = 1.0001^tick`.
///
/// Valid indices range from [`MIN`](Self::MIN) (`-887272`) to
/// [`MAX`](Self::MAX) (`887272`), the range over which a Q64.96 square-root
/// price stays representable.
///
/// # Examples
///
/// ```
/// use hydra_pool_engine::domain::Tick;
///
/// let tick = Tick::new(120).unwrap_or(Tick::ZERO);
/// assert!(tick.is_aligned(60));
/// assert!(!tick.is_aligned(50));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "i32", into = "i32")]
pub struct Tick(i32);

impl Tick {
    /// Minimum valid tick (`-887272`).
    pub const MIN: Self = Self(MIN_TICK);

    /// Maximum valid tick (`887272`).
    pub const MAX: Self = Self(MAX_TICK);

    /// Tick where `price = 1.0`.
    pub const ZERO: Self = Self(0);

    /// Creates a new `Tick` with range validation.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::TickOutOfBounds`] if `value` is outside
    /// `[-887272, 887272]`.
    pub const fn new(value: i32) -> crate::error::Result<Self> {
        if value < MIN_TICK || value > MAX_TICK {
            return Err(AmmError::TickOutOfBounds(
                "tick out of range [-887272, 887272]",
            ));
        }
        Ok(Self(value))
    }

    /// Creates a tick that must also sit on a multiple of `spacing`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidConfig`] if `spacing` is zero.
    /// - [`AmmError::TickOutOfBounds`] if the tick is out of range or
    ///   misaligned.
    pub const fn aligned(value: i32, spacing: u32) -> crate::error::Result<Self> {
        if spacing == 0 {
            return Err(AmmError::InvalidConfig("tick spacing must be greater than zero"));
        }
        if value < MIN_TICK || value > MAX_TICK {
            return Err(AmmError::TickOutOfBounds(
                "tick out of range [-887272, 887272]",
            ));
        }
        let tick = Self(value);
        if !tick.is_aligned(spacing) {
            return Err(AmmError::TickOutOfBounds(
                "tick must be a multiple of the tick spacing",
            ));
        }
        Ok(tick)
    }

    /// Returns the underlying `i32` tick index.
    #[must_use]
    pub const fn get(&self) -> i32 {
        self.0
    }

    /// Returns `true` if the tick is a multiple of `spacing`.
    ///
    /// A zero spacing aligns nothing.
    #[must_use]
    pub const fn is_aligned(&self, spacing: u32) -> bool {
        if spacing == 0 || spacing > i32::MAX as u32 {
            return false;
        }
        self.0 % (spacing as i32) == 0
    }

    /// Checked addition of a delta, staying inside the valid range.
    #[must_use]
    pub const fn checked_add(&self, delta: i32) -> Option<Self> {
        match self.0.checked_add(delta) {
            Some(v) if v >= MIN_TICK && v <= MAX_TICK => Some(Self(v)),
            _ => None,
        }
    }
}

impl TryFrom<i32> for Tick {
    type Error = AmmError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Tick> for i32 {
    fn from(tick: Tick) -> Self {
        tick.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tick({})", self.0)
    }
}
