//! Board driver trait and error types.
//!
//! This module defines:
//! - `BoardDriver` trait - Interface for pluggable board backends
//! - `HalError` enum - Error types for driver operations
//! - `DriverFactory` type alias - Factory function type

use crate::controller::state::Millis;
use crate::hal::types::{BoardInputs, BoardOutputs};
use thiserror::Error;

/// Error types for driver operations.
#[derive(Debug, Clone, Error)]
pub enum HalError {
    /// Driver initialization failed
    #[error("Initialization failed: {0}")]
    InitFailed(String),

    /// Driver not found in the registry
    #[error("Driver not found: {0}")]
    DriverNotFound(String),

    /// Board I/O failed
    #[error("Board I/O failed: {0}")]
    IoFailed(String),

    /// Driver used before `init()` completed
    #[error("Driver not initialized")]
    NotInitialized,
}

/// Factory function type for creating driver instances.
pub type DriverFactory = fn() -> Box<dyn BoardDriver>;

/// Trait defining the interface to a board backend.
///
/// The control unit talks to the device exclusively through this trait,
/// enabling pluggable backends (simulation, serial bridge, GPIO, etc.).
///
/// # Lifecycle
///
/// 1. `init()` - called once before the tick loop starts
/// 2. `poll()` / `apply()` - called every tick from the loop
/// 3. `shutdown()` - called when the host is stopping
pub trait BoardDriver: Send + Sync {
    /// Returns the driver's unique identifier (e.g., "simulation").
    fn name(&self) -> &'static str;

    /// Returns the driver's semantic version.
    fn version(&self) -> &'static str;

    /// Initialize the driver.
    ///
    /// Called once before the tick loop; may block for hardware setup.
    /// Default implementation does nothing.
    ///
    /// # Errors
    /// Return `HalError::InitFailed` if initialization cannot complete.
    fn init(&mut self) -> Result<(), HalError> {
        Ok(())
    }

    /// Read one input snapshot.
    ///
    /// Called every tick with the host's monotonic millisecond counter.
    /// Must be cheap and non-blocking.
    fn poll(&mut self, now: Millis) -> Result<BoardInputs, HalError>;

    /// Push actuator, lamp, and display state to the board.
    ///
    /// Called every tick after the controller ran. Must be cheap and
    /// non-blocking; drivers are expected to skip hardware writes when
    /// nothing changed since the previous frame.
    fn apply(&mut self, outputs: &BoardOutputs) -> Result<(), HalError>;

    /// Graceful shutdown of the driver.
    ///
    /// Default implementation does nothing.
    fn shutdown(&mut self) -> Result<(), HalError> {
        Ok(())
    }
}
