//! Prelude module for common re-exports.
//!
//! This module provides convenient re-exports of commonly used types
//! so that consumers can do `use steri_common::prelude::*;` and get
//! the most important types without listing individual paths.
//!
//! # Usage
//!
//! ```rust
//! use steri_common::prelude::*;
//! ```

// ─── Controller ─────────────────────────────────────────────────────
pub use crate::controller::config::ControllerConfig;
pub use crate::controller::safety::{DenyReason, SafetyReading, SafetyThresholds, UnlockDecision};
pub use crate::controller::state::{elapsed_ms, CycleState, DoorLock, Millis};

// ─── HAL ────────────────────────────────────────────────────────────
pub use crate::hal::driver::{BoardDriver, DriverFactory, HalError};
pub use crate::hal::types::{BoardInputs, BoardOutputs, Lamps, PanelFrame, PANEL_COLS};
