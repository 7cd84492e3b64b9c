//! State enums for the cycle controller.
//!
//! All enums use `#[repr(u8)]` for compact memory layout. The cycle state
//! and the door lock are owned exclusively by the control unit's state
//! machine; everything else only reads them.

use serde::{Deserialize, Serialize};

/// Monotonic millisecond stamp, as delivered by the board driver.
///
/// Wraps after ~49.7 days; all interval math must go through
/// [`elapsed_ms`] so rollover is handled.
pub type Millis = u32;

/// Milliseconds elapsed from `since` to `now`, rollover-safe.
#[inline]
pub const fn elapsed_ms(now: Millis, since: Millis) -> u32 {
    now.wrapping_sub(since)
}

// ─── Cycle State ────────────────────────────────────────────────────

/// Operating state of the sterilization cycle.
///
/// Only one `CycleState` is active at any time. `Halted` is entered and
/// left exclusively through the emergency controller; the automatic timer
/// never touches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum CycleState {
    /// Chamber idle, door released.
    Idle = 0,
    /// Sterilization running, door locked.
    Active = 1,
    /// Cycle finished, door released.
    Complete = 2,
    /// Emergency stop latched — all automatic progression suspended.
    Halted = 3,
}

impl CycleState {
    /// Convert from raw `u8`. Returns `None` for invalid values.
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Idle),
            1 => Some(Self::Active),
            2 => Some(Self::Complete),
            3 => Some(Self::Halted),
            _ => None,
        }
    }

    /// Operator-facing state name, as used on the panel and in logs.
    #[inline]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Active => "STERILIZING",
            Self::Complete => "COMPLETE",
            Self::Halted => "HALTED",
        }
    }

    /// Returns true if the duration timer advances this state.
    ///
    /// `Halted` is the only state the timer leaves alone.
    #[inline]
    pub const fn advances_automatically(&self) -> bool {
        !matches!(self, Self::Halted)
    }
}

impl Default for CycleState {
    fn default() -> Self {
        Self::Idle
    }
}

// ─── Door Lock ──────────────────────────────────────────────────────

/// Electromechanical door lock state.
///
/// `Locked` occurs only while the cycle is `Active`; the sole lock site
/// is the Idle→Active transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum DoorLock {
    /// Bolt retracted, door openable.
    Unlocked = 0,
    /// Bolt engaged.
    Locked = 1,
}

impl DoorLock {
    /// Convert from raw `u8`. Returns `None` for invalid values.
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Unlocked),
            1 => Some(Self::Locked),
            _ => None,
        }
    }

    /// Operator-facing label, as used on the panel and in logs.
    #[inline]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Unlocked => "UNLOCKED",
            Self::Locked => "LOCKED",
        }
    }

    #[inline]
    pub const fn is_locked(&self) -> bool {
        matches!(self, Self::Locked)
    }
}

impl Default for DoorLock {
    fn default() -> Self {
        Self::Unlocked
    }
}
