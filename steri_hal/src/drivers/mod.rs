//! Board driver implementations.
//!
//! This module contains all board driver implementations:
//!
//! - [`simulation`] - Software simulation driver for development and testing
//!
//! # Adding New Drivers
//!
//! 1. Create a new submodule under `drivers/`
//! 2. Implement the `BoardDriver` trait from `steri_common::hal::driver`
//! 3. Register the driver in [`crate::driver_registry::builtin_registry`]
//! 4. Add export and documentation

pub mod simulation;
