//! Cycle controller shared types.
//!
//! All types shared between the control unit and other STERI modules live
//! here. Organized by domain: state enums, safety decision types, and
//! configuration structures.

pub mod config;
pub mod safety;
pub mod state;
