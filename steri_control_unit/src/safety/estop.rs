//! Emergency stop latch and two-press protocol.
//!
//! The emergency button is edge-driven. The first accepted press latches the
//! stop condition: the machine halts and the door is forced open. The latch
//! then absorbs the live button level entirely; holding or re-pressing the
//! button while halted cannot deepen the stop. The next accepted press while
//! halted clears the latch and returns the machine to idle.

use tracing::warn;

use steri_common::controller::state::CycleState;

/// What the controller must do in response to an emergency press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmergencyAction {
    /// First press: latch the stop, halt the machine, force the door open.
    Halt,
    /// Press while halted: clear the latch and return to idle.
    Reset,
    /// Press in an inconsistent latch/machine pairing; dropped.
    Ignored,
}

/// One-bit emergency stop latch.
#[derive(Debug, Clone, Default)]
pub struct EmergencyController {
    latched: bool,
}

impl EmergencyController {
    pub const fn new() -> Self {
        Self { latched: false }
    }

    /// Whether the stop condition is latched.
    pub const fn is_latched(&self) -> bool {
        self.latched
    }

    /// Process one accepted emergency press edge.
    ///
    /// `state` is the machine state at the time of the press. The latch and
    /// the machine state move together (latched exactly while halted), so
    /// the latched-but-not-halted pairing is unreachable through the tick
    /// path; if it ever shows up the press is logged and dropped.
    pub fn on_edge(&mut self, state: CycleState) -> EmergencyAction {
        if !self.latched {
            self.latched = true;
            return EmergencyAction::Halt;
        }
        if state == CycleState::Halted {
            self.latched = false;
            return EmergencyAction::Reset;
        }
        warn!("Emergency latch set while machine in {state:?}; press ignored");
        debug_assert!(
            false,
            "emergency latch set while machine in {state:?}"
        );
        EmergencyAction::Ignored
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
