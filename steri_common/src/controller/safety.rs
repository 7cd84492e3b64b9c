//! Safety types for the cycle controller.
//!
//! Defines the per-tick sensor snapshot, the release thresholds, and the
//! door-release decision returned by the interlock evaluator.

use serde::{Deserialize, Serialize};

/// One temperature/pressure sample, produced once per tick by the board
/// driver. Immutable for the tick it is used in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SafetyReading {
    /// Chamber temperature [°C].
    pub temperature_c: f64,
    /// Chamber pressure [kPa].
    pub pressure_kpa: f64,
}

impl Default for SafetyReading {
    /// Ambient baseline before the first real sample arrives.
    fn default() -> Self {
        Self {
            temperature_c: 25.0,
            pressure_kpa: 101.0,
        }
    }
}

/// Release thresholds, fixed at startup from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SafetyThresholds {
    /// Door release is denied above this temperature [°C].
    #[serde(default = "default_max_temperature")]
    pub max_temperature_c: f64,
    /// Door release is denied above this pressure [kPa].
    #[serde(default = "default_max_pressure")]
    pub max_pressure_kpa: f64,
}

fn default_max_temperature() -> f64 {
    60.0
}
fn default_max_pressure() -> f64 {
    105.0
}

impl Default for SafetyThresholds {
    fn default() -> Self {
        Self {
            max_temperature_c: 60.0,
            max_pressure_kpa: 105.0,
        }
    }
}

impl SafetyThresholds {
    #[inline]
    pub fn temperature_unsafe(&self, reading: &SafetyReading) -> bool {
        reading.temperature_c > self.max_temperature_c
    }

    #[inline]
    pub fn pressure_unsafe(&self, reading: &SafetyReading) -> bool {
        reading.pressure_kpa > self.max_pressure_kpa
    }

    /// Both thresholds must be positive and finite.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.max_temperature_c.is_finite() && self.max_temperature_c > 0.0) {
            return Err(format!(
                "max_temperature_c must be positive and finite, got {}",
                self.max_temperature_c
            ));
        }
        if !(self.max_pressure_kpa.is_finite() && self.max_pressure_kpa > 0.0) {
            return Err(format!(
                "max_pressure_kpa must be positive and finite, got {}",
                self.max_pressure_kpa
            ));
        }
        Ok(())
    }
}

// ─── Release Decision ───────────────────────────────────────────────

/// Why a door-release request was refused.
///
/// Discriminant order mirrors the interlock's check order: an active
/// cycle outranks both sensor checks, temperature outranks pressure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DenyReason {
    /// Sterilization in progress.
    CycleActive = 0,
    /// Chamber temperature above the release threshold.
    TemperatureUnsafe = 1,
    /// Chamber pressure above the release threshold.
    PressureUnsafe = 2,
}

impl DenyReason {
    /// Short operator-facing description, used in `UNLOCK BLOCKED` log
    /// lines.
    #[inline]
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::CycleActive => "Sterilizing in progress",
            Self::TemperatureUnsafe => "Temperature too high",
            Self::PressureUnsafe => "Pressure too high",
        }
    }
}

/// Outcome of a door-release request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnlockDecision {
    /// All checks passed; release the door.
    Permit,
    /// Emergency circuit active; release the door bypassing every other
    /// check.
    EmergencyOverride,
    /// Release refused for the given reason.
    Deny(DenyReason),
}

impl UnlockDecision {
    /// Returns true if the request results in an unlocked door.
    #[inline]
    pub const fn allows_release(&self) -> bool {
        matches!(self, Self::Permit | Self::EmergencyOverride)
    }
}
