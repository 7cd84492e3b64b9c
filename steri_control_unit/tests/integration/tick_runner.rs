//! Integration test: bounded runner over the simulation driver.
//!
//! Validates the full host path end to end: driver poll → controller tick →
//! panel fold → driver apply, wall-clock paced with a shortened timing
//! profile so a whole cycle fits in a fraction of a second.

use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use steri_common::controller::config::ControllerConfig;
use steri_common::controller::safety::SafetyThresholds;
use steri_common::controller::state::Millis;
use steri_common::hal::driver::{BoardDriver, HalError};
use steri_common::hal::types::{BoardInputs, BoardOutputs, Lamps};

use steri_control_unit::config::LoadedConfig;
use steri_control_unit::cycle::TickRunner;
use steri_hal::drivers::simulation::{InputLine, ScriptStep, SimulationDriver};

// ── Helpers ─────────────────────────────────────────────────────────

/// Millisecond-scale profile: a full cycle ring in 120ms of wall time.
fn fast_profile() -> LoadedConfig {
    LoadedConfig {
        controller: ControllerConfig {
            state_duration_ms: 40,
            settle_delay_ms: 10,
            debounce_ms: 5,
            tick_interval_ms: 1,
        },
        thresholds: SafetyThresholds::default(),
    }
}

/// Wraps the simulation driver and records every applied output frame.
struct RecordingDriver {
    inner: SimulationDriver,
    applied: Arc<Mutex<Vec<BoardOutputs>>>,
}

impl BoardDriver for RecordingDriver {
    fn name(&self) -> &'static str {
        "recording"
    }
    fn version(&self) -> &'static str {
        "0.0.0"
    }
    fn init(&mut self) -> Result<(), HalError> {
        self.inner.init()
    }
    fn poll(&mut self, now: Millis) -> Result<BoardInputs, HalError> {
        self.inner.poll(now)
    }
    fn apply(&mut self, outputs: &BoardOutputs) -> Result<(), HalError> {
        self.applied.lock().unwrap().push(outputs.clone());
        self.inner.apply(outputs)
    }
    fn shutdown(&mut self) -> Result<(), HalError> {
        self.inner.shutdown()
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[test]
fn unattended_run_cycles_the_bolt() {
    let applied = Arc::new(Mutex::new(Vec::new()));
    let driver = Box::new(RecordingDriver {
        inner: SimulationDriver::new(),
        applied: Arc::clone(&applied),
    });

    let mut runner = TickRunner::new(fast_profile(), driver).unwrap();
    let running = AtomicBool::new(true);
    runner.run(&running, Some(150)).unwrap();

    assert!(runner.stats().tick_count >= 10);

    let applied = applied.lock().unwrap();

    // Power-on baseline: idle, bolt disengaged.
    assert!(!applied[0].door_lock_engaged);
    assert_eq!(applied[0].lamps, Lamps::IDLE);
    assert_eq!(applied[0].panel.line1.as_str(), "System: IDLE");

    // The bolt engaged when the cycle started and released when it ended.
    let first_locked = applied
        .iter()
        .position(|o| o.door_lock_engaged)
        .expect("bolt never engaged");
    assert_eq!(applied[first_locked].lamps, Lamps::RUN | Lamps::LOCK);
    assert!(
        applied[first_locked..].iter().any(|o| !o.door_lock_engaged),
        "bolt never released after the cycle"
    );
}

#[test]
fn scripted_emergency_halts_the_run() {
    let applied = Arc::new(Mutex::new(Vec::new()));
    // Press and hold the emergency button 50ms into the run.
    let driver = Box::new(RecordingDriver {
        inner: SimulationDriver::with_script(vec![ScriptStep {
            at_ms: 50,
            line: InputLine::Emergency,
            level: false,
        }]),
        applied: Arc::clone(&applied),
    });

    let mut runner = TickRunner::new(fast_profile(), driver).unwrap();
    let running = AtomicBool::new(true);
    runner.run(&running, Some(120)).unwrap();

    let applied = applied.lock().unwrap();
    let last = applied.last().expect("no outputs applied");
    assert!(!last.door_lock_engaged);
    assert_eq!(last.lamps, Lamps::FAULT);
    assert_eq!(last.panel.line1.as_str(), "!! EMERGENCY !!");
    assert_eq!(last.panel.line2.as_str(), "EMERGENCY UNLK");
}
