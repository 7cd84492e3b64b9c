//! STERI Common Library
//!
//! This crate provides the shared types for all STERI workspace crates:
//! the cycle/door state enums, safety reading and threshold types, the
//! controller configuration, and the board driver interface.
//!
//! # Module Structure
//!
//! - [`controller`] - Cycle state, safety decision, and configuration types
//! - [`hal`] - Board I/O types and the pluggable driver trait
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use steri_common::prelude::*;
//! ```

pub mod controller;
pub mod hal;
pub mod prelude;
