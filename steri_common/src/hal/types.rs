//! Board I/O types.
//!
//! This module defines the data structures crossing the driver boundary:
//! - `BoardInputs` - raw input snapshot from the board, once per tick
//! - `BoardOutputs` - actuator/lamp/panel state applied to the board
//! - `Lamps` - status lamp bitflags
//! - `PanelFrame` - one 2×16 character display frame

use crate::controller::safety::SafetyReading;
use bitflags::bitflags;

/// Panel line width in characters.
pub const PANEL_COLS: usize = 16;

bitflags! {
    /// Status lamp set.
    ///
    /// `LOCK` tracks the door bolt in every state; exactly one of the
    /// other three is lit at a time (IDLE doubles as the completion
    /// lamp, as on the reference panel).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Lamps: u8 {
        /// Green — chamber idle or cycle complete.
        const IDLE  = 0x01;
        /// Yellow — sterilization running.
        const RUN   = 0x02;
        /// Red — emergency halt.
        const FAULT = 0x04;
        /// White — door bolt engaged.
        const LOCK  = 0x08;
    }
}

impl Default for Lamps {
    fn default() -> Self {
        Self::empty()
    }
}

// ─── Panel Frame ────────────────────────────────────────────────────

/// One frame of the 2×16 operator display.
///
/// Lines are fixed-capacity; text beyond [`PANEL_COLS`] characters is
/// truncated on write.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PanelFrame {
    pub line1: heapless::String<PANEL_COLS>,
    pub line2: heapless::String<PANEL_COLS>,
}

impl PanelFrame {
    /// Build a frame from two text lines.
    pub fn two_lines(line1: &str, line2: &str) -> Self {
        let mut frame = Self::default();
        frame.set_line1(line1);
        frame.set_line2(line2);
        frame
    }

    /// Replace the top line, truncating to the panel width.
    pub fn set_line1(&mut self, text: &str) {
        write_truncated(&mut self.line1, text);
    }

    /// Replace the bottom line, truncating to the panel width.
    pub fn set_line2(&mut self, text: &str) {
        write_truncated(&mut self.line2, text);
    }
}

fn write_truncated(dst: &mut heapless::String<PANEL_COLS>, text: &str) {
    dst.clear();
    for ch in text.chars() {
        if dst.push(ch).is_err() {
            break;
        }
    }
}

// ─── Board Snapshots ────────────────────────────────────────────────

/// Raw input snapshot read from the board, once per tick.
///
/// Both button levels follow the active-low physical convention of the
/// reference board (pull-up idle high): `false` means pressed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardInputs {
    /// Emergency-stop circuit level (active-low).
    pub emergency_level: bool,
    /// Door-release request button level (active-low).
    pub door_request_level: bool,
    /// Scaled temperature/pressure sample.
    pub reading: SafetyReading,
}

impl BoardInputs {
    /// Logical emergency condition (level low = active).
    #[inline]
    pub const fn emergency_active(&self) -> bool {
        !self.emergency_level
    }

    /// Logical door request (level low = pressed).
    #[inline]
    pub const fn door_requested(&self) -> bool {
        !self.door_request_level
    }
}

impl Default for BoardInputs {
    /// Both buttons released, ambient sensor baseline.
    fn default() -> Self {
        Self {
            emergency_level: true,
            door_request_level: true,
            reading: SafetyReading::default(),
        }
    }
}

/// Actuator, lamp, and display state applied to the board each tick.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoardOutputs {
    /// Door bolt actuator level.
    pub door_lock_engaged: bool,
    /// Status lamp set.
    pub lamps: Lamps,
    /// Current display frame.
    pub panel: PanelFrame,
}
