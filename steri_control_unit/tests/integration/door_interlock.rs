//! Integration test: door release arbitration.
//!
//! Validates the full release chain from raw button levels to panel text:
//! 1. Debounce filters the request edge
//! 2. The interlock chain judges it (cycle, temperature, pressure)
//! 3. The panel renders the verdict on the second row

use steri_common::controller::config::ControllerConfig;
use steri_common::controller::safety::{DenyReason, SafetyReading, SafetyThresholds};
use steri_common::controller::state::{CycleState, DoorLock, Millis};
use steri_common::hal::types::BoardInputs;

use steri_control_unit::controller::{CycleController, CycleEvent, TickOutcome};
use steri_control_unit::feedback::Panel;

// ── Helpers ─────────────────────────────────────────────────────────

fn controller() -> CycleController {
    CycleController::new(&ControllerConfig::default(), SafetyThresholds::default(), 0)
}

/// One full press-and-release of the door button at `now`, with the chamber
/// holding `reading`. The release tick lands past the guard window so a
/// following request is a fresh edge. Returns the press-tick outcome.
///
/// Consecutive requests must be at least 450ms apart.
fn request_at(c: &mut CycleController, now: Millis, reading: SafetyReading) -> TickOutcome {
    let pressed = BoardInputs {
        door_request_level: false,
        reading,
        ..BoardInputs::default()
    };
    let outcome = c.tick(now, &pressed);
    let released = BoardInputs {
        reading,
        ..BoardInputs::default()
    };
    c.tick(now + 250, &released);
    outcome
}

fn safe() -> SafetyReading {
    SafetyReading::default()
}

fn hot() -> SafetyReading {
    SafetyReading {
        temperature_c: 82.5,
        pressure_kpa: 101.0,
    }
}

fn pressurized() -> SafetyReading {
    SafetyReading {
        temperature_c: 25.0,
        pressure_kpa: 131.0,
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[test]
fn idle_request_opens_the_door() {
    let mut c = controller();
    let outcome = request_at(&mut c, 10, safe());
    assert_eq!(outcome.events.as_slice(), &[CycleEvent::DoorUnlocked]);
    assert_eq!(outcome.door, DoorLock::Unlocked);
}

#[test]
fn active_cycle_blocks_release_until_complete() {
    let mut c = controller();
    let quiet = BoardInputs::default();

    // 1. Cycle starts; the bolt engages.
    c.tick(6000, &quiet);
    assert_eq!(c.state(), CycleState::Active);

    // 2. A request mid-cycle is refused and the bolt holds.
    let outcome = request_at(&mut c, 7000, safe());
    assert!(outcome
        .events
        .contains(&CycleEvent::UnlockDenied(DenyReason::CycleActive)));
    assert_eq!(outcome.door, DoorLock::Locked);

    // 3. Cycle end releases the bolt; a fresh request is now permitted.
    c.tick(12000, &quiet);
    assert_eq!(c.state(), CycleState::Complete);
    let outcome = request_at(&mut c, 12500, safe());
    assert_eq!(outcome.events.as_slice(), &[CycleEvent::DoorUnlocked]);
}

#[test]
fn hot_chamber_blocks_release_until_it_cools() {
    let mut c = controller();
    let mut panel = Panel::new();

    // 1. Refused while the chamber is hot; the panel names the reason.
    let outcome = request_at(&mut c, 10, hot());
    assert_eq!(
        outcome.events.as_slice(),
        &[CycleEvent::UnlockDenied(DenyReason::TemperatureUnsafe)]
    );
    panel.apply(&outcome);
    assert_eq!(panel.frame().line1.as_str(), "System: IDLE");
    assert_eq!(panel.frame().line2.as_str(), "TEMP TOO HIGH");

    // 2. Chamber cooled: the same request now opens the door.
    let outcome = request_at(&mut c, 600, safe());
    assert_eq!(outcome.events.as_slice(), &[CycleEvent::DoorUnlocked]);
    panel.apply(&outcome);
    assert_eq!(panel.frame().line2.as_str(), "Door: UNLOCKED");
}

#[test]
fn overpressure_blocks_release_when_idle() {
    let mut c = controller();
    let mut panel = Panel::new();
    let outcome = request_at(&mut c, 10, pressurized());
    assert_eq!(
        outcome.events.as_slice(),
        &[CycleEvent::UnlockDenied(DenyReason::PressureUnsafe)]
    );
    panel.apply(&outcome);
    assert_eq!(panel.frame().line2.as_str(), "PRESS TOO HIGH");
}

#[test]
fn readings_exactly_at_the_limits_are_safe() {
    let mut c = controller();
    let at_limit = SafetyReading {
        temperature_c: 60.0,
        pressure_kpa: 105.0,
    };
    let outcome = request_at(&mut c, 10, at_limit);
    assert_eq!(outcome.events.as_slice(), &[CycleEvent::DoorUnlocked]);
}

#[test]
fn bouncing_button_requests_once_per_guard_window() {
    let mut c = controller();
    let pressed = BoardInputs {
        door_request_level: false,
        ..BoardInputs::default()
    };
    let released = BoardInputs::default();

    // Clean press: accepted immediately.
    let outcome = c.tick(10, &pressed);
    assert_eq!(outcome.events.as_slice(), &[CycleEvent::DoorUnlocked]);

    // Contact bounce inside the guard window: all dropped.
    assert!(c.tick(60, &released).events.is_empty());
    assert!(c.tick(90, &pressed).events.is_empty());

    // Release holds long enough to register, but a falling edge does
    // nothing on its own.
    assert!(c.tick(260, &released).events.is_empty());

    // Re-press bounces once, then holds: the change is re-examined on a
    // later tick and accepted as a single new request.
    assert!(c.tick(300, &pressed).events.is_empty());
    let outcome = c.tick(470, &pressed);
    assert_eq!(outcome.events.as_slice(), &[CycleEvent::DoorUnlocked]);
}
