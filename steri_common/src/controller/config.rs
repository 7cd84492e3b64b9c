//! Configuration structures for the cycle controller.

use serde::{Deserialize, Serialize};

/// Default dwell time per cycle state [ms].
pub const STATE_DURATION_DEFAULT_MS: u32 = 6000;
/// Default settle window after entering Active, before sensor frames [ms].
pub const SETTLE_DELAY_DEFAULT_MS: u32 = 3000;
/// Default guard interval between accepted input edges [ms].
pub const DEBOUNCE_DEFAULT_MS: u32 = 200;
/// Default host tick interval [ms].
pub const TICK_INTERVAL_DEFAULT_MS: u32 = 10;

/// Timing configuration for the cycle controller.
///
/// Loaded from the `[controller]` table of `controller.toml`; every field
/// falls back to the reference-system value when omitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Dwell time per cycle state before the automatic transition [ms].
    #[serde(default = "default_state_duration")]
    pub state_duration_ms: u32,
    /// Settle window after entering Active before sensor frames start [ms].
    #[serde(default = "default_settle_delay")]
    pub settle_delay_ms: u32,
    /// Guard interval between accepted edges on one input [ms].
    #[serde(default = "default_debounce")]
    pub debounce_ms: u32,
    /// Host tick interval [ms].
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u32,
}

fn default_state_duration() -> u32 {
    STATE_DURATION_DEFAULT_MS
}
fn default_settle_delay() -> u32 {
    SETTLE_DELAY_DEFAULT_MS
}
fn default_debounce() -> u32 {
    DEBOUNCE_DEFAULT_MS
}
fn default_tick_interval() -> u32 {
    TICK_INTERVAL_DEFAULT_MS
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            state_duration_ms: STATE_DURATION_DEFAULT_MS,
            settle_delay_ms: SETTLE_DELAY_DEFAULT_MS,
            debounce_ms: DEBOUNCE_DEFAULT_MS,
            tick_interval_ms: TICK_INTERVAL_DEFAULT_MS,
        }
    }
}

impl ControllerConfig {
    /// All durations must be non-zero and the settle window must fit
    /// inside the Active dwell time, or sensor frames would never show.
    pub fn validate(&self) -> Result<(), String> {
        if self.state_duration_ms == 0 {
            return Err("state_duration_ms must be non-zero".to_string());
        }
        if self.settle_delay_ms == 0 {
            return Err("settle_delay_ms must be non-zero".to_string());
        }
        if self.debounce_ms == 0 {
            return Err("debounce_ms must be non-zero".to_string());
        }
        if self.tick_interval_ms == 0 {
            return Err("tick_interval_ms must be non-zero".to_string());
        }
        if self.settle_delay_ms > self.state_duration_ms {
            return Err(format!(
                "settle_delay_ms ({}) must not exceed state_duration_ms ({})",
                self.settle_delay_ms, self.state_duration_ms
            ));
        }
        Ok(())
    }
}
