//! Debounced edge detection for operator inputs.
//!
//! Panel buttons arrive as raw logic levels sampled once per tick. Mechanical
//! contacts bounce for a few milliseconds on every press and release, so raw
//! level changes cannot be trusted as operator intent. [`DebouncedInput`]
//! turns the raw level stream into clean [`Edge`] events: a level change is
//! accepted only when the guard interval has elapsed since the last accepted
//! edge. Changes inside the guard window are dropped but not forgotten; if
//! the level still differs once the window expires, the edge fires then.
//!
//! Timestamps are `u32` milliseconds and all arithmetic is wrapping, so a
//! counter rollover after ~49.7 days does not disturb edge detection.

use steri_common::controller::state::{Millis, elapsed_ms};

/// Direction of an accepted level change.
///
/// Levels are logical: `true` means the input condition is asserted (button
/// held), regardless of the electrical polarity the driver reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// Input went from released to asserted.
    Rising,
    /// Input went from asserted to released.
    Falling,
}

/// Debounce filter for a single two-state input.
///
/// Tracks the last accepted (stable) level and the timestamp of the last
/// accepted edge. `poll` is O(1) and allocation-free.
#[derive(Debug, Clone)]
pub struct DebouncedInput {
    /// Guard interval between accepted edges.
    interval_ms: u32,
    /// Last level that produced an accepted edge (inputs start released).
    last_level: bool,
    /// Timestamp of the last accepted edge. `None` until the first edge,
    /// which is always accepted.
    last_edge_at: Option<Millis>,
}

impl DebouncedInput {
    /// Create a filter with the given guard interval in milliseconds.
    pub const fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            last_level: false,
            last_edge_at: None,
        }
    }

    /// Last accepted level.
    pub const fn level(&self) -> bool {
        self.last_level
    }

    /// Feed one sample; returns the edge if this sample is accepted.
    ///
    /// A sample equal to the stable level never produces an edge. A differing
    /// sample produces an edge only once `interval_ms` has elapsed since the
    /// last accepted edge; inside the window it is dropped and the stable
    /// level is left unchanged, so a persisting change is re-examined on
    /// later ticks.
    pub fn poll(&mut self, level: bool, now: Millis) -> Option<Edge> {
        if level == self.last_level {
            return None;
        }
        if let Some(at) = self.last_edge_at {
            if elapsed_ms(now, at) < self.interval_ms {
                return None;
            }
        }
        self.last_level = level;
        self.last_edge_at = Some(now);
        Some(if level { Edge::Rising } else { Edge::Falling })
    }

    /// Forget edge history, keeping the guard interval.
    pub fn reset(&mut self) {
        self.last_level = false;
        self.last_edge_at = None;
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
