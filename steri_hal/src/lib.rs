//! # STERI HAL Library
//!
//! Board abstraction layer with pluggable driver architecture.
//!
//! This crate provides the driver registry and driver implementations for
//! the STERI chamber board. Drivers implement the `BoardDriver` trait
//! defined in `steri_common::hal::driver`.
//!
//! # Module Structure
//!
//! - [`driver_registry`] - Driver factory registration
//! - [`drivers`] - Board driver implementations
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                 steri_control_unit (tick loop)             │
//! │                            │                               │
//! │                            ▼                               │
//! │                   ┌────────────────┐                       │
//! │                   │  BoardDriver   │ (trait object)        │
//! │                   │  trait         │                       │
//! │                   └───────┬────────┘                       │
//! └───────────────────────────┼────────────────────────────────┘
//!                             │ created by name from
//!                             ▼
//!                   ┌───────────────────┐
//!                   │  DriverRegistry   │──▶ simulation, …
//!                   └───────────────────┘
//! ```

#![deny(warnings)]
#![deny(missing_docs)]

pub mod driver_registry;
pub mod drivers;

// Re-export key types for convenience
pub use crate::driver_registry::{DriverRegistry, builtin_registry};
