//! Integration test: unattended cycle progression.
//!
//! Validates the scheduled ring against the reference timeline:
//! 1. Idle dwell expires → Active with the door bolted
//! 2. Active dwell expires → Complete with the door released
//! 3. Complete dwell expires → Idle, and the ring repeats

use steri_common::controller::config::ControllerConfig;
use steri_common::controller::safety::{SafetyReading, SafetyThresholds};
use steri_common::controller::state::{CycleState, DoorLock, Millis};
use steri_common::hal::types::{BoardInputs, Lamps};

use steri_control_unit::controller::CycleController;
use steri_control_unit::feedback::Panel;

// ── Helpers ─────────────────────────────────────────────────────────

fn controller() -> CycleController {
    CycleController::new(&ControllerConfig::default(), SafetyThresholds::default(), 0)
}

/// Tick every 10ms from `from` (exclusive) to `to` (inclusive), asserting
/// the state holds steady until the final instant.
fn run_quiet(c: &mut CycleController, from: Millis, to: Millis, expect: CycleState) {
    let quiet = BoardInputs::default();
    let mut now = from + 10;
    while now < to {
        let outcome = c.tick(now, &quiet);
        assert_eq!(outcome.state, expect, "state changed early at t={now}");
        now += 10;
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[test]
fn cycle_walks_the_reference_timeline() {
    let mut c = controller();
    let quiet = BoardInputs::default();

    // 1. Idle dwell: nothing happens for the first six seconds.
    run_quiet(&mut c, 0, 6000, CycleState::Idle);
    assert_eq!(c.door(), DoorLock::Unlocked);

    // 2. Dwell expiry starts the cycle and bolts the door.
    let outcome = c.tick(6000, &quiet);
    assert_eq!(outcome.state, CycleState::Active);
    assert_eq!(outcome.door, DoorLock::Locked);

    // 3. Door stays bolted through the whole active dwell.
    run_quiet(&mut c, 6000, 12000, CycleState::Active);
    assert_eq!(c.door(), DoorLock::Locked);

    // 4. Cycle end releases the bolt automatically.
    let outcome = c.tick(12000, &quiet);
    assert_eq!(outcome.state, CycleState::Complete);
    assert_eq!(outcome.door, DoorLock::Unlocked);

    // 5. Complete dwell, then back to Idle.
    run_quiet(&mut c, 12000, 18000, CycleState::Complete);
    let outcome = c.tick(18000, &quiet);
    assert_eq!(outcome.state, CycleState::Idle);

    // 6. The ring repeats: the next cycle starts a dwell later.
    run_quiet(&mut c, 18000, 24000, CycleState::Idle);
    let outcome = c.tick(24000, &quiet);
    assert_eq!(outcome.state, CycleState::Active);
    assert_eq!(outcome.door, DoorLock::Locked);
}

#[test]
fn panel_and_lamps_follow_the_cycle() {
    let mut c = controller();
    let mut panel = Panel::new();
    let inputs = BoardInputs {
        reading: SafetyReading {
            temperature_c: 41.0,
            pressure_kpa: 101.0,
        },
        ..BoardInputs::default()
    };

    // Idle baseline.
    let out = panel.outputs(c.state(), c.door());
    assert_eq!(out.panel.line1.as_str(), "System: IDLE");
    assert_eq!(out.lamps, Lamps::IDLE);

    // Cycle start: sterilizing banner, run + lock lamps.
    panel.apply(&c.tick(6000, &inputs));
    let out = panel.outputs(c.state(), c.door());
    assert_eq!(out.panel.line1.as_str(), "STERILIZING...");
    assert_eq!(out.panel.line2.as_str(), "Door: LOCKED");
    assert_eq!(out.lamps, Lamps::RUN | Lamps::LOCK);
    assert!(out.door_lock_engaged);

    // Settling: the banner holds, no sensor frame yet.
    panel.apply(&c.tick(8000, &inputs));
    assert_eq!(panel.frame().line1.as_str(), "STERILIZING...");

    // Settled: live readings replace the banner.
    panel.apply(&c.tick(9000, &inputs));
    assert_eq!(panel.frame().line1.as_str(), "Temp:41.0C");
    assert_eq!(panel.frame().line2.as_str(), "Press:101kPa");

    // Cycle end: completion banner, ready lamp, bolt released.
    panel.apply(&c.tick(12000, &inputs));
    let out = panel.outputs(c.state(), c.door());
    assert_eq!(out.panel.line1.as_str(), "CYCLE COMPLETE");
    assert_eq!(out.panel.line2.as_str(), "Door: UNLOCKED");
    assert_eq!(out.lamps, Lamps::IDLE);
    assert!(!out.door_lock_engaged);

    // Back to the idle baseline.
    panel.apply(&c.tick(18000, &inputs));
    assert_eq!(panel.frame().line1.as_str(), "System: IDLE");
}

#[test]
fn late_tick_catches_up_without_skipping_states() {
    let mut c = controller();
    let quiet = BoardInputs::default();

    // Host stalls across the scheduled boundary: no ticks from 5000 to 9000.
    c.tick(5000, &quiet);
    let outcome = c.tick(9000, &quiet);
    assert_eq!(outcome.state, CycleState::Active);

    // The dwell restarts from the actual transition instant, not the
    // nominal schedule.
    assert_eq!(c.tick(14990, &quiet).state, CycleState::Active);
    assert_eq!(c.tick(15000, &quiet).state, CycleState::Complete);
}
