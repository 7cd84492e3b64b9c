//! TOML configuration loader with validation.
//!
//! Loads the controller timing table and the release thresholds from a
//! single TOML file. Both tables are optional and every field has a default,
//! so an empty file (or no file at all) yields the stock benchtop timings.
//! Whatever is loaded is validated before the runner accepts it.

use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use steri_common::controller::config::ControllerConfig;
use steri_common::controller::safety::SafetyThresholds;

// ─── Error Type ─────────────────────────────────────────────────────

/// Configuration loading/validation error.
#[derive(Debug)]
pub enum ConfigError {
    /// File I/O error.
    IoError(String),
    /// TOML parse error.
    ParseError(String),
    /// Parameter validation error.
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "config I/O error: {e}"),
            Self::ParseError(e) => write!(f, "config parse error: {e}"),
            Self::ValidationError(e) => write!(f, "config validation: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ─── Loaded Config Bundle ───────────────────────────────────────────

/// Complete validated configuration, ready for runtime use.
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    pub controller: ControllerConfig,
    pub thresholds: SafetyThresholds,
}

/// On-disk layout: `[controller]` and `[thresholds]` tables, both optional.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    controller: ControllerConfig,
    #[serde(default)]
    thresholds: SafetyThresholds,
}

// ─── Loading Functions ──────────────────────────────────────────────

/// Load and validate the controller configuration.
///
/// A missing file is not an error: the stock defaults are returned and a
/// warning is logged, so a bare checkout still runs.
pub fn load_config(path: &Path) -> Result<LoadedConfig, ConfigError> {
    if !path.exists() {
        warn!(
            "No config file at {}. Continuing with defaults.",
            path.display()
        );
        return Ok(LoadedConfig::default());
    }
    let text = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::IoError(format!("failed to read {}: {e}", path.display())))?;
    load_config_from_str(&text)
}

/// Parse and validate configuration from TOML text.
pub fn load_config_from_str(text: &str) -> Result<LoadedConfig, ConfigError> {
    let file: FileConfig =
        toml::from_str(text).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    file.controller
        .validate()
        .map_err(ConfigError::ValidationError)?;
    file.thresholds
        .validate()
        .map_err(ConfigError::ValidationError)?;
    Ok(LoadedConfig {
        controller: file.controller,
        thresholds: file.thresholds,
    })
}

// ─── Tests ──────────────────────────────────────────────────────────
