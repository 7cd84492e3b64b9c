//! Integration test: two-press emergency stop protocol.
//!
//! Validates the full lifecycle from the operator's point of view:
//! 1. First press: halt, bolt release, fault banner
//! 2. While halted: the schedule is dead, door requests go through the
//!    override branch
//! 3. Second press: the latch clears and the machine returns to Idle

use steri_common::controller::config::ControllerConfig;
use steri_common::controller::safety::SafetyThresholds;
use steri_common::controller::state::{CycleState, DoorLock};
use steri_common::hal::types::{BoardInputs, Lamps};

use steri_control_unit::controller::{CycleController, CycleEvent};
use steri_control_unit::feedback::Panel;

// ── Helpers ─────────────────────────────────────────────────────────

fn controller() -> CycleController {
    CycleController::new(&ControllerConfig::default(), SafetyThresholds::default(), 0)
}

fn quiet() -> BoardInputs {
    BoardInputs::default()
}

fn emergency_pressed() -> BoardInputs {
    BoardInputs {
        emergency_level: false,
        ..BoardInputs::default()
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[test]
fn first_press_halts_mid_cycle_and_frees_the_door() {
    let mut c = controller();
    let mut panel = Panel::new();

    // Run the cycle past the settle window so the panel shows readings.
    panel.apply(&c.tick(6000, &quiet()));
    panel.apply(&c.tick(9500, &quiet()));
    assert_eq!(c.state(), CycleState::Active);
    assert_eq!(c.door(), DoorLock::Locked);

    // Emergency press: halt, bolt release, fault banner.
    let outcome = c.tick(9600, &emergency_pressed());
    assert_eq!(outcome.state, CycleState::Halted);
    assert_eq!(outcome.door, DoorLock::Unlocked);
    panel.apply(&outcome);

    let out = panel.outputs(outcome.state, outcome.door);
    assert_eq!(out.panel.line1.as_str(), "!! EMERGENCY !!");
    assert_eq!(out.panel.line2.as_str(), "EMERGENCY UNLK");
    assert_eq!(out.lamps, Lamps::FAULT);
    assert!(!out.door_lock_engaged);
}

#[test]
fn halted_machine_ignores_the_schedule() {
    let mut c = controller();
    c.tick(100, &emergency_pressed());
    assert_eq!(c.state(), CycleState::Halted);

    // Several dwell periods pass: no transitions, no events.
    for now in [6000, 12000, 18000, 60000] {
        let outcome = c.tick(now, &quiet());
        assert_eq!(outcome.state, CycleState::Halted);
        assert!(outcome.events.is_empty(), "unexpected events at t={now}");
    }
}

#[test]
fn door_request_while_halted_uses_the_override() {
    let mut c = controller();
    c.tick(100, &emergency_pressed());
    c.tick(400, &quiet());

    let request = BoardInputs {
        door_request_level: false,
        ..BoardInputs::default()
    };
    let outcome = c.tick(700, &request);
    assert_eq!(outcome.events.as_slice(), &[CycleEvent::EmergencyUnlock]);
    assert_eq!(outcome.state, CycleState::Halted);
    assert_eq!(outcome.door, DoorLock::Unlocked);
}

#[test]
fn second_press_returns_the_machine_to_service() {
    let mut c = controller();
    let mut panel = Panel::new();

    // 1. Cycle running, then stopped.
    panel.apply(&c.tick(6000, &quiet()));
    panel.apply(&c.tick(7000, &emergency_pressed()));
    assert_eq!(c.state(), CycleState::Halted);
    assert!(c.is_emergency_latched());

    // 2. Button released, then pressed a second time: full reset.
    panel.apply(&c.tick(7400, &quiet()));
    let outcome = c.tick(7800, &emergency_pressed());
    assert_eq!(
        outcome.events.as_slice(),
        &[
            CycleEvent::StateEntered(CycleState::Idle),
            CycleEvent::EmergencyReset
        ]
    );
    assert!(!c.is_emergency_latched());
    panel.apply(&outcome);

    let out = panel.outputs(outcome.state, outcome.door);
    assert_eq!(out.panel.line1.as_str(), "System: IDLE");
    assert_eq!(out.panel.line2.as_str(), "Door: UNLOCKED");
    assert_eq!(out.lamps, Lamps::IDLE);

    // 3. The schedule resumes, dwelling from the reset instant.
    assert_eq!(c.tick(13790, &quiet()).state, CycleState::Idle);
    assert_eq!(c.tick(13800, &quiet()).state, CycleState::Active);
}

#[test]
fn emergency_wins_the_tick_over_everything() {
    let mut c = controller();

    // Dwell expiry, a door request, and the emergency press all land on
    // the same tick. The halt is processed first, so the cycle never
    // starts; the door request is then answered under the override.
    let everything = BoardInputs {
        emergency_level: false,
        door_request_level: false,
        ..BoardInputs::default()
    };
    let outcome = c.tick(6000, &everything);

    assert_eq!(outcome.state, CycleState::Halted);
    assert_eq!(outcome.door, DoorLock::Unlocked);
    assert_eq!(
        outcome.events.as_slice(),
        &[
            CycleEvent::EmergencyHalt,
            CycleEvent::EmergencyUnlock,
            CycleEvent::EmergencyUnlock
        ]
    );
    assert!(!outcome
        .events
        .contains(&CycleEvent::StateEntered(CycleState::Active)));
}
