//! # STERI Control Unit Library
//!
//! Cycle-control brain for the STERI benchtop sterilization chamber.
//! Provides a fixed-interval tick that reads debounced operator inputs and
//! chamber sensors, advances the sterilization cycle state machine, arbitrates
//! door-release requests through the safety interlock chain, and produces
//! lamp/panel/lock output for the active board driver.
//!
//! ## Control Layers
//!
//! 1. **CycleState** — Sterilization cycle lifecycle (Idle → Active → Complete)
//! 2. **EmergencyController** — Two-press emergency stop latch overlay
//! 3. **Interlock chain** — Fixed-precedence door-release arbitration
//! 4. **Feedback** — Panel text, lamp masks, and operator log lines
//!
//! ## Zero-Allocation Tick
//!
//! All runtime state is pre-allocated during startup. The tick path performs
//! zero heap allocations: events are collected into a fixed-capacity
//! `heapless::Vec` and panel text is rendered into fixed-width buffers.

pub mod config;
pub mod controller;
pub mod cycle;
pub mod feedback;
pub mod input;
pub mod safety;
pub mod state;
