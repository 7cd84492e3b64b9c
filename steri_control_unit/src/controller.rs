//! Tick orchestration: inputs in, events and outputs out.
//!
//! [`CycleController`] owns the state machine, the emergency latch, and the
//! two debounced operator inputs. Each call to [`tick`] processes one sample
//! of board inputs in a fixed order:
//!
//! 1. Emergency button edge (pre-empts everything else this tick)
//! 2. Scheduled cycle transition
//! 3. Door release request, arbitrated through the interlock chain
//! 4. Chamber readings, once the active cycle has settled
//!
//! The outcome carries the post-tick state plus a fixed-capacity list of
//! [`CycleEvent`]s for the feedback layer to render. The tick path never
//! allocates.
//!
//! [`tick`]: CycleController::tick

use heapless::Vec;

use steri_common::controller::config::ControllerConfig;
use steri_common::controller::safety::{DenyReason, SafetyReading, SafetyThresholds, UnlockDecision};
use steri_common::controller::state::{CycleState, DoorLock, Millis};
use steri_common::hal::types::BoardInputs;

use crate::input::{DebouncedInput, Edge};
use crate::safety::estop::{EmergencyAction, EmergencyController};
use crate::safety::interlock::evaluate_release;
use crate::state::machine::CycleStateMachine;

/// Upper bound on events a single tick can produce.
pub const MAX_TICK_EVENTS: usize = 8;

/// One observable thing that happened during a tick.
///
/// Events are ordered as they occurred; the feedback layer renders them
/// into panel text, lamp changes, and log lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CycleEvent {
    /// The machine entered a new scheduled state (or returned to idle
    /// after an emergency reset).
    StateEntered(CycleState),
    /// The chamber door engaged at cycle start.
    DoorLocked,
    /// A permitted release request opened the door.
    DoorUnlocked,
    /// The door opened (or was confirmed open) under the emergency override.
    EmergencyUnlock,
    /// A release request was refused, with the winning reason.
    UnlockDenied(DenyReason),
    /// First emergency press: the machine halted.
    EmergencyHalt,
    /// Second emergency press: the stop latch cleared.
    EmergencyReset,
    /// Live chamber readings taken while the cycle is running.
    SensorsSampled(SafetyReading),
}

/// Result of one controller tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    pub state: CycleState,
    pub door: DoorLock,
    pub events: Vec<CycleEvent, MAX_TICK_EVENTS>,
}

/// The cycle control core, one instance per chamber.
#[derive(Debug, Clone)]
pub struct CycleController {
    machine: CycleStateMachine,
    estop: EmergencyController,
    emergency_input: DebouncedInput,
    door_input: DebouncedInput,
    thresholds: SafetyThresholds,
}

impl CycleController {
    pub fn new(config: &ControllerConfig, thresholds: SafetyThresholds, now: Millis) -> Self {
        Self {
            machine: CycleStateMachine::new(config, now),
            estop: EmergencyController::new(),
            emergency_input: DebouncedInput::new(config.debounce_ms),
            door_input: DebouncedInput::new(config.debounce_ms),
            thresholds,
        }
    }

    pub const fn state(&self) -> CycleState {
        self.machine.state()
    }

    pub const fn door(&self) -> DoorLock {
        self.machine.door()
    }

    pub const fn is_emergency_latched(&self) -> bool {
        self.estop.is_latched()
    }

    /// Read access to the state machine, mainly for timing queries.
    pub const fn machine(&self) -> &CycleStateMachine {
        &self.machine
    }

    /// Process one sample of board inputs.
    ///
    /// Button levels in `inputs` are logical (asserted = pressed); the
    /// driver layer has already folded in electrical polarity.
    pub fn tick(&mut self, now: Millis, inputs: &BoardInputs) -> TickOutcome {
        let mut events: Vec<CycleEvent, MAX_TICK_EVENTS> = Vec::new();

        // 1. Emergency button, strictly before anything else.
        if let Some(Edge::Rising) = self.emergency_input.poll(inputs.emergency_active(), now) {
            match self.estop.on_edge(self.machine.state()) {
                EmergencyAction::Halt => {
                    self.machine.force_halt(now);
                    push_event(&mut events, CycleEvent::EmergencyHalt);
                    push_event(&mut events, CycleEvent::EmergencyUnlock);
                }
                EmergencyAction::Reset => {
                    self.machine.reset_idle(now);
                    push_event(&mut events, CycleEvent::StateEntered(CycleState::Idle));
                    push_event(&mut events, CycleEvent::EmergencyReset);
                }
                EmergencyAction::Ignored => {}
            }
        }

        // 2. Scheduled phase transition (skipped while halted).
        if let Some(entered) = self.machine.poll_scheduled(now) {
            push_event(&mut events, CycleEvent::StateEntered(entered));
            if entered == CycleState::Active {
                push_event(&mut events, CycleEvent::DoorLocked);
            }
        }

        // 3. Door release request, against the post-transition state.
        if let Some(Edge::Rising) = self.door_input.poll(inputs.door_requested(), now) {
            let emergency_active = self.estop.is_latched() || inputs.emergency_active();
            let decision = evaluate_release(
                &inputs.reading,
                self.machine.state(),
                emergency_active,
                &self.thresholds,
            );
            match decision {
                UnlockDecision::Permit => {
                    self.machine.release_door();
                    push_event(&mut events, CycleEvent::DoorUnlocked);
                }
                UnlockDecision::EmergencyOverride => {
                    self.machine.release_door();
                    push_event(&mut events, CycleEvent::EmergencyUnlock);
                }
                UnlockDecision::Deny(reason) => {
                    push_event(&mut events, CycleEvent::UnlockDenied(reason));
                }
            }
        }

        // 4. Chamber readings once the settle window has passed.
        if self.machine.is_settled(now) {
            push_event(&mut events, CycleEvent::SensorsSampled(inputs.reading));
        }

        TickOutcome {
            state: self.machine.state(),
            door: self.machine.door(),
            events,
        }
    }
}

fn push_event(events: &mut Vec<CycleEvent, MAX_TICK_EVENTS>, event: CycleEvent) {
    if events.push(event).is_err() {
        debug_assert!(false, "tick event buffer overflow");
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
