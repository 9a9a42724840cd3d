//! Configuration for the royale decision engine.
//!
//! Maps directly to `royale.toml`. Every field has a serde default so a
//! partial (or empty) file is always valid.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RoyaleError};
use crate::types::AreaId;

/// Top-level configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoyaleConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Decision-pass tuning.
    #[serde(default)]
    pub decision: DecisionConfig,
    /// Diagnostics.
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl RoyaleConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `RoyaleError::Config` if the TOML is invalid or a value is unusable.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| RoyaleError::Config(e.to_string()))?;
        config.decision.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// General system settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Knobs of the daily decision pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionConfig {
    /// The start-of-game area holding most of the initial loot.
    #[serde(default = "default_staging_area")]
    pub staging_area: AreaId,
    /// Maximum number of item stacks an actor can carry.
    #[serde(default = "default_6")]
    pub inventory_limit: usize,
    /// Length of the recently-visited ring kept per actor.
    #[serde(default = "default_4")]
    pub recent_areas_capacity: usize,
    /// Also decide for the human-controlled actor (processed after all NPCs).
    #[serde(default)]
    pub drive_player: bool,
    /// Cap on the softmax route pool.
    #[serde(default = "default_6")]
    pub max_route_candidates: usize,
    /// How many of the best staging items the rush chooses among.
    #[serde(default = "default_4")]
    pub rush_pool_size: usize,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            staging_area: AreaId(0),
            inventory_limit: 6,
            recent_areas_capacity: 4,
            drive_player: false,
            max_route_candidates: 6,
            rush_pool_size: 4,
        }
    }
}

impl DecisionConfig {
    /// Reject values the decision pass cannot work with.
    ///
    /// # Errors
    /// Returns `RoyaleError::Config` naming the offending field.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("inventory_limit", self.inventory_limit),
            ("recent_areas_capacity", self.recent_areas_capacity),
            ("max_route_candidates", self.max_route_candidates),
            ("rush_pool_size", self.rush_pool_size),
        ];
        for (name, value) in positive {
            if value == 0 {
                return Err(RoyaleError::Config(format!("decision.{name} must be at least 1")));
            }
        }
        Ok(())
    }
}

/// Diagnostics and observability.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Emit every combat and area score at TRACE level.
    #[serde(default)]
    pub trace_scores: bool,
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_log_level() -> String { "info".to_string() }
fn default_staging_area() -> AreaId { AreaId(0) }
fn default_4() -> usize { 4 }
fn default_6() -> usize { 6 }
