//! Hardware abstraction layer types and driver interface.
//!
//! This module contains the board I/O snapshot types and the pluggable
//! driver trait the control unit talks to.

pub mod driver;
pub mod types;
