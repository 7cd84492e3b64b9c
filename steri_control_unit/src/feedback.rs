//! Operator feedback: panel text, lamp masks, and log lines.
//!
//! [`Panel`] folds the event stream from [`CycleController::tick`] into the
//! persistent two-line panel text, mirrors each event to the operator log,
//! and composes the [`BoardOutputs`] the driver applies at the end of every
//! tick. Events are rendered in order, so when a halt and an override unlock
//! land on the same tick the unlock line wins the second row, exactly as the
//! operator expects to read it.
//!
//! [`CycleController::tick`]: crate::controller::CycleController::tick

use core::fmt::Write;

use tracing::{debug, error, info, warn};

use steri_common::controller::safety::{DenyReason, SafetyReading};
use steri_common::controller::state::{CycleState, DoorLock};
use steri_common::hal::types::{BoardOutputs, Lamps, PanelFrame};

use crate::controller::{CycleEvent, TickOutcome};

/// Lamp mask for a machine state and door position.
///
/// The idle lamp doubles as the "chamber ready" light, so it is lit for
/// `Complete` as well. The lock lamp tracks the door bolt alone.
pub fn lamps_for(state: CycleState, door: DoorLock) -> Lamps {
    let mut lamps = match state {
        CycleState::Idle | CycleState::Complete => Lamps::IDLE,
        CycleState::Active => Lamps::RUN,
        CycleState::Halted => Lamps::FAULT,
    };
    if door.is_locked() {
        lamps |= Lamps::LOCK;
    }
    lamps
}

/// Persistent panel state.
#[derive(Debug, Clone)]
pub struct Panel {
    frame: PanelFrame,
}

impl Panel {
    /// Panel as shown at power-on: the idle baseline.
    pub fn new() -> Self {
        Self {
            frame: PanelFrame::two_lines("System: IDLE", "Door: UNLOCKED"),
        }
    }

    /// Current panel text.
    pub const fn frame(&self) -> &PanelFrame {
        &self.frame
    }

    /// Render one tick's events into panel text and log lines.
    pub fn apply(&mut self, outcome: &TickOutcome) {
        for event in &outcome.events {
            match event {
                CycleEvent::StateEntered(state) => self.enter_state(*state),
                CycleEvent::DoorLocked => {
                    self.frame.set_line2("Door: LOCKED");
                    info!("Door LOCKED");
                }
                CycleEvent::DoorUnlocked => {
                    self.frame.set_line2("Door: UNLOCKED");
                    info!("Door UNLOCKED");
                }
                CycleEvent::EmergencyUnlock => {
                    self.frame.set_line2("EMERGENCY UNLK");
                    warn!("UNLOCK: Emergency Stop Activated");
                }
                CycleEvent::UnlockDenied(reason) => {
                    self.frame.set_line2(denial_line(*reason));
                    warn!("UNLOCK BLOCKED: {}", reason.describe());
                }
                CycleEvent::EmergencyHalt => self.halt_banner(),
                CycleEvent::EmergencyReset => {
                    info!("System RESET after emergency stop cleared");
                }
                CycleEvent::SensorsSampled(reading) => self.show_readings(reading),
            }
        }
    }

    /// Compose the outputs the driver applies after this tick.
    pub fn outputs(&self, state: CycleState, door: DoorLock) -> BoardOutputs {
        BoardOutputs {
            door_lock_engaged: door.is_locked(),
            lamps: lamps_for(state, door),
            panel: self.frame.clone(),
        }
    }

    fn enter_state(&mut self, state: CycleState) {
        match state {
            CycleState::Idle => {
                self.frame = PanelFrame::two_lines("System: IDLE", "Door: UNLOCKED");
            }
            CycleState::Active => {
                self.frame = PanelFrame::two_lines("STERILIZING...", "Door: LOCKED");
            }
            CycleState::Complete => {
                self.frame = PanelFrame::two_lines("CYCLE COMPLETE", "Door: UNLOCKED");
            }
            CycleState::Halted => {
                self.halt_banner();
                return;
            }
        }
        info!("State: {}", state.label());
    }

    fn halt_banner(&mut self) {
        self.frame = PanelFrame::two_lines("!! EMERGENCY !!", "SYSTEM HALTED");
        error!("!! EMERGENCY STOP !! SYSTEM HALTED");
    }

    fn show_readings(&mut self, reading: &SafetyReading) {
        self.frame.line1.clear();
        let _ = write!(self.frame.line1, "Temp:{:.1}C", reading.temperature_c);
        self.frame.line2.clear();
        let _ = write!(self.frame.line2, "Press:{:.0}kPa", reading.pressure_kpa);
        debug!(
            "Temp: {:.1} °C, Press: {:.0} kPa",
            reading.temperature_c, reading.pressure_kpa
        );
    }
}

impl Default for Panel {
    fn default() -> Self {
        Self::new()
    }
}

/// Second panel row shown for a refused release request.
fn denial_line(reason: DenyReason) -> &'static str {
    match reason {
        DenyReason::CycleActive => "BLOCKED STERIL",
        DenyReason::TemperatureUnsafe => "TEMP TOO HIGH",
        DenyReason::PressureUnsafe => "PRESS TOO HIGH",
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
