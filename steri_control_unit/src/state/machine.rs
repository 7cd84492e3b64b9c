//! Time-scheduled cycle state machine with door lock ownership.
//!
//! The machine dwells in each phase for a fixed duration, then advances:
//!
//! ```text
//!   Idle ──dwell──▶ Active ──dwell──▶ Complete ──dwell──▶ Idle ──▶ …
//!                   (door locked;
//!                    settle first,
//!                    then running)
//! ```
//!
//! `Halted` sits outside the ring: it is entered only by [`force_halt`] and
//! left only by [`reset_idle`], both driven from the emergency latch. The
//! door lock is engaged in exactly one place, the Idle → Active transition,
//! so a locked door always implies an active cycle.
//!
//! All timing is wraparound-safe `u32` milliseconds; dwell restarts from the
//! instant each state is entered.
//!
//! [`force_halt`]: CycleStateMachine::force_halt
//! [`reset_idle`]: CycleStateMachine::reset_idle

use steri_common::controller::config::ControllerConfig;
use steri_common::controller::state::{CycleState, DoorLock, Millis, elapsed_ms};

/// Cycle state, door lock, and phase timing.
#[derive(Debug, Clone)]
pub struct CycleStateMachine {
    state: CycleState,
    door: DoorLock,
    /// Timestamp at which the current state was entered.
    entered_at: Millis,
    state_duration_ms: u32,
    settle_delay_ms: u32,
}

impl CycleStateMachine {
    /// Start in `Idle` with the door unlocked, dwell clock stamped at `now`.
    pub const fn new(config: &ControllerConfig, now: Millis) -> Self {
        Self {
            state: CycleState::Idle,
            door: DoorLock::Unlocked,
            entered_at: now,
            state_duration_ms: config.state_duration_ms,
            settle_delay_ms: config.settle_delay_ms,
        }
    }

    pub const fn state(&self) -> CycleState {
        self.state
    }

    pub const fn door(&self) -> DoorLock {
        self.door
    }

    pub const fn entered_at(&self) -> Millis {
        self.entered_at
    }

    /// Milliseconds spent in the current state as of `now`.
    pub const fn in_state_for(&self, now: Millis) -> u32 {
        elapsed_ms(now, self.entered_at)
    }

    /// Advance the scheduled ring if the dwell has elapsed.
    ///
    /// Returns the state just entered, or `None` if the machine stays put.
    /// At most one transition fires per call; the dwell clock restarts at
    /// `now` on every transition. `Halted` never advances on its own.
    pub fn poll_scheduled(&mut self, now: Millis) -> Option<CycleState> {
        if !self.state.advances_automatically() {
            return None;
        }
        if self.in_state_for(now) < self.state_duration_ms {
            return None;
        }
        let next = match self.state {
            CycleState::Idle => {
                // The only place the door ever locks.
                self.door = DoorLock::Locked;
                CycleState::Active
            }
            CycleState::Active => {
                self.door = DoorLock::Unlocked;
                CycleState::Complete
            }
            CycleState::Complete => CycleState::Idle,
            CycleState::Halted => return None,
        };
        self.state = next;
        self.entered_at = now;
        Some(next)
    }

    /// Whether the active cycle has passed its settle delay.
    ///
    /// During the settle window the chamber is coming up to condition and
    /// the panel keeps the cycle banner; afterwards live readings are shown.
    /// Always `false` outside `Active`.
    pub const fn is_settled(&self, now: Millis) -> bool {
        matches!(self.state, CycleState::Active) && self.in_state_for(now) >= self.settle_delay_ms
    }

    /// Emergency halt: door forced open, dwell clock restamped.
    pub fn force_halt(&mut self, now: Millis) {
        self.state = CycleState::Halted;
        self.door = DoorLock::Unlocked;
        self.entered_at = now;
    }

    /// Return to `Idle` after an emergency stop is cleared.
    pub fn reset_idle(&mut self, now: Millis) {
        self.state = CycleState::Idle;
        self.door = DoorLock::Unlocked;
        self.entered_at = now;
    }

    /// Open the door without touching the cycle state.
    ///
    /// Used for permitted release requests; during an emergency override
    /// this is what lets the door open while the state stays `Active`.
    pub fn release_door(&mut self) {
        self.door = DoorLock::Unlocked;
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
