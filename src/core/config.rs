//! Engine configuration with documented constants
//!
//! Tunable knobs are collected here with explanations of their purpose.
//! Fixed structural capacities (transition log, message queues, solver
//! cache) are compile-time constants in their owning modules because the
//! engine's observable behavior depends on them exactly.

use serde::Deserialize;
use std::path::Path;

use crate::core::error::{EngineError, Result};

/// Configuration for one engine instance
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === GRID ===
    /// Width of the playfield in cells. Evaluation bounds and the demo
    /// spawner both derive from this.
    pub grid_width: i32,

    /// Height of the playfield in cells.
    pub grid_height: i32,

    // === RADAR ===
    /// Default radar range (Chebyshev distance) for mobile actors.
    ///
    /// A range below 1 disables the automatic sweep entirely.
    pub radar_range: i32,

    /// How many ticks an externally issued interrogation may stay Pending
    /// before the sweep marks it NoResponse.
    pub observation_window: u64,

    // === DISPATCH ===
    /// Capacity of the coordinator's bounded summary list and the
    /// moderator's summary archive. One entry per tick; oldest dropped.
    pub summary_history: usize,

    // === SOLVER ===
    /// Step budget handed to reachability queries when the configurator
    /// checks an intent. Manhattan distances beyond this come back Timeout.
    pub solver_step_budget: i32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            grid_width: 64,
            grid_height: 64,
            radar_range: 6,
            observation_window: 1,
            summary_history: 64,
            solver_step_budget: 8,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: EngineConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.grid_width <= 0 || self.grid_height <= 0 {
            return Err(EngineError::InvalidConfig(format!(
                "grid dimensions must be positive, got {}x{}",
                self.grid_width, self.grid_height
            )));
        }
        if self.summary_history == 0 {
            return Err(EngineError::InvalidConfig(
                "summary_history must be at least 1".into(),
            ));
        }
        if self.solver_step_budget < 0 {
            return Err(EngineError::InvalidConfig(
                "solver_step_budget must be non-negative".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_grid() {
        let config = EngineConfig {
            grid_width: 0,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_summary_history() {
        let config = EngineConfig {
            summary_history: 0,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_roundtrip() {
        let parsed: EngineConfig =
            toml::from_str("grid_width = 16\ngrid_height = 16\nradar_range = 3\n").unwrap();
        assert_eq!(parsed.grid_width, 16);
        assert_eq!(parsed.radar_range, 3);
        // Unspecified fields fall back to defaults
        assert_eq!(parsed.summary_history, 64);
    }
}
