//! Simulation driver implementation.
//!
//! The `SimulationDriver` implements the `BoardDriver` trait to provide a
//! software-emulated chamber board for development and testing without
//! physical hardware. Sensor lines model the board's 10-bit ADC: raw counts
//! with a slow deterministic wobble, scaled exactly the way the firmware
//! scales them. Button lines idle released and can be driven from a script
//! of timed level changes, so full operator scenarios replay without anyone
//! pressing anything.

use steri_common::controller::safety::SafetyReading;
use steri_common::controller::state::Millis;
use steri_common::hal::driver::{BoardDriver, HalError};
use steri_common::hal::types::{BoardInputs, BoardOutputs};
use tracing::{debug, info};

/// Full-scale ADC count of the chamber board.
const ADC_MAX: f64 = 1023.0;
/// Degrees Celsius per ADC count.
const TEMP_SCALE: f64 = 100.0 / ADC_MAX;
/// Kilopascals per ADC count.
const PRESS_SCALE: f64 = 200.0 / ADC_MAX;

/// Wobble period for the temperature line [ms].
const TEMP_WOBBLE_PERIOD_MS: u32 = 4000;
/// Wobble period for the pressure line [ms].
const PRESS_WOBBLE_PERIOD_MS: u32 = 2600;
/// Wobble amplitude [ADC counts].
const WOBBLE_COUNTS: f64 = 4.0;

/// Which simulated input line a script step drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputLine {
    /// The emergency stop button line.
    Emergency,
    /// The door release button line.
    DoorRequest,
}

/// One timed level change on a button line.
///
/// Levels are electrical: `false` is a pressed (active-low) button.
#[derive(Debug, Clone, Copy)]
pub struct ScriptStep {
    /// Controller time at which the level takes effect [ms].
    pub at_ms: Millis,
    /// Line to drive.
    pub line: InputLine,
    /// Level the line assumes from `at_ms` on.
    pub level: bool,
}

/// Simulation driver implementing the BoardDriver trait.
pub struct SimulationDriver {
    /// Driver name
    name: &'static str,
    /// Driver version
    version: &'static str,
    /// Initialized flag
    initialized: bool,
    /// Scripted button timeline, sorted by time, consumed front to back.
    script: Vec<ScriptStep>,
    /// Next unconsumed script step.
    next_step: usize,
    /// Current emergency line level (idle high).
    emergency_level: bool,
    /// Current door request line level (idle high).
    door_request_level: bool,
    /// Temperature line baseline [ADC counts].
    temperature_raw: f64,
    /// Pressure line baseline [ADC counts].
    pressure_raw: f64,
    /// Last outputs applied, for change logging.
    last_outputs: Option<BoardOutputs>,
}

impl SimulationDriver {
    /// Create a quiet driver: ambient chamber, both buttons released.
    pub fn new() -> Self {
        Self {
            name: "simulation",
            version: env!("CARGO_PKG_VERSION"),
            initialized: false,
            script: Vec::new(),
            next_step: 0,
            emergency_level: true,
            door_request_level: true,
            // Warm idle chamber: ≈41 °C, ≈102 kPa.
            temperature_raw: 420.0,
            pressure_raw: 520.0,
            last_outputs: None,
        }
    }

    /// Create a driver that replays the given button timeline.
    pub fn with_script(mut script: Vec<ScriptStep>) -> Self {
        script.sort_by_key(|step| step.at_ms);
        Self {
            script,
            ..Self::new()
        }
    }

    /// Set the chamber condition in engineering units.
    ///
    /// Values are converted to ADC counts and clamped to the 10-bit range,
    /// so out-of-range requests saturate exactly like the real board.
    pub fn set_chamber(&mut self, temperature_c: f64, pressure_kpa: f64) {
        self.temperature_raw = (temperature_c / TEMP_SCALE).clamp(0.0, ADC_MAX);
        self.pressure_raw = (pressure_kpa / PRESS_SCALE).clamp(0.0, ADC_MAX);
    }

    /// Apply all script steps due at `now`.
    fn run_script(&mut self, now: Millis) {
        while let Some(step) = self.script.get(self.next_step) {
            if step.at_ms > now {
                break;
            }
            match step.line {
                InputLine::Emergency => self.emergency_level = step.level,
                InputLine::DoorRequest => self.door_request_level = step.level,
            }
            debug!(
                "Script: {:?} line -> {} at {}ms",
                step.line, step.level, step.at_ms
            );
            self.next_step += 1;
        }
    }

    /// Current chamber reading with ADC wobble folded in.
    fn reading(&self, now: Millis) -> SafetyReading {
        let temp_counts =
            (self.temperature_raw + wobble(now, TEMP_WOBBLE_PERIOD_MS)).clamp(0.0, ADC_MAX);
        let press_counts =
            (self.pressure_raw + wobble(now, PRESS_WOBBLE_PERIOD_MS)).clamp(0.0, ADC_MAX);
        SafetyReading {
            temperature_c: temp_counts * TEMP_SCALE,
            pressure_kpa: press_counts * PRESS_SCALE,
        }
    }
}

impl Default for SimulationDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardDriver for SimulationDriver {
    fn name(&self) -> &'static str {
        self.name
    }

    fn version(&self) -> &'static str {
        self.version
    }

    fn init(&mut self) -> Result<(), HalError> {
        info!(
            "Simulation driver initialized ({} scripted steps)",
            self.script.len()
        );
        self.initialized = true;
        Ok(())
    }

    fn poll(&mut self, now: Millis) -> Result<BoardInputs, HalError> {
        if !self.initialized {
            return Err(HalError::NotInitialized);
        }
        self.run_script(now);
        Ok(BoardInputs {
            emergency_level: self.emergency_level,
            door_request_level: self.door_request_level,
            reading: self.reading(now),
        })
    }

    fn apply(&mut self, outputs: &BoardOutputs) -> Result<(), HalError> {
        if !self.initialized {
            return Err(HalError::NotInitialized);
        }
        match &self.last_outputs {
            Some(last) => {
                if last.door_lock_engaged != outputs.door_lock_engaged {
                    info!(
                        "Door bolt {}",
                        if outputs.door_lock_engaged {
                            "engaged"
                        } else {
                            "released"
                        }
                    );
                }
                if last.lamps != outputs.lamps {
                    debug!("Lamps: {:?} -> {:?}", last.lamps, outputs.lamps);
                }
                if last.panel != outputs.panel {
                    info!(
                        "Panel: \"{}\" / \"{}\"",
                        outputs.panel.line1.as_str(),
                        outputs.panel.line2.as_str()
                    );
                }
            }
            None => {
                info!(
                    "Initial outputs: bolt={}, lamps={:?}",
                    outputs.door_lock_engaged, outputs.lamps
                );
            }
        }
        self.last_outputs = Some(outputs.clone());
        Ok(())
    }

    fn shutdown(&mut self) -> Result<(), HalError> {
        info!("Shutting down simulation driver");
        self.initialized = false;
        Ok(())
    }
}

/// Create a boxed simulation driver (registry factory).
pub fn create_driver() -> Box<dyn BoardDriver> {
    Box::new(SimulationDriver::new())
}

/// Slow triangle wave in ADC counts, deterministic in `now`.
fn wobble(now: Millis, period_ms: u32) -> f64 {
    let phase = (now % period_ms) as f64 / period_ms as f64;
    let tri = if phase < 0.5 {
        phase * 4.0 - 1.0
    } else {
        3.0 - phase * 4.0
    };
    tri * WOBBLE_COUNTS
}
