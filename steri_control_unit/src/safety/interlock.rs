//! Door-release interlock chain.
//!
//! Every operator door request passes through [`evaluate_release`], a pure
//! function over the current cycle state, emergency condition, and chamber
//! readings. The rules are checked in a fixed order and the first match wins,
//! so a denial always reports the highest-precedence reason even when several
//! conditions hold at once.

use steri_common::controller::safety::{
    DenyReason, SafetyReading, SafetyThresholds, UnlockDecision,
};
use steri_common::controller::state::CycleState;

/// Arbitrate one door-release request.
///
/// Precedence, highest first:
///
/// 1. Emergency condition (latched stop or live emergency input) — the door
///    must always open, regardless of cycle phase or chamber readings.
/// 2. Cycle in progress — the chamber stays sealed while sterilizing.
/// 3. Chamber temperature above the release threshold.
/// 4. Chamber pressure above the release threshold.
///
/// Only when no rule matches is the release permitted.
pub fn evaluate_release(
    reading: &SafetyReading,
    state: CycleState,
    emergency_active: bool,
    thresholds: &SafetyThresholds,
) -> UnlockDecision {
    if emergency_active {
        return UnlockDecision::EmergencyOverride;
    }
    if state == CycleState::Active {
        return UnlockDecision::Deny(DenyReason::CycleActive);
    }
    if thresholds.temperature_unsafe(reading) {
        return UnlockDecision::Deny(DenyReason::TemperatureUnsafe);
    }
    if thresholds.pressure_unsafe(reading) {
        return UnlockDecision::Deny(DenyReason::PressureUnsafe);
    }
    UnlockDecision::Permit
}

// ─── Tests ──────────────────────────────────────────────────────────────────
