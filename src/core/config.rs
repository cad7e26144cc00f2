//! Arbitration tunables
//!
//! The rulebook leaves a few engine-level numbers open (how far searches may
//! expand, what a minimal move costs when a path search asks for a number).
//! They live here, loadable from TOML.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::error::{ArbiterError, Result};

/// Configuration for the arbitration engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArbiterConfig {
    /// Cost reported to path searches for a MINIMAL_MOVE step.
    ///
    /// A minimal move ignores accumulated terrain cost, so a search still
    /// needs a number to order it against other steps.
    pub minimal_move_cost: f32,

    /// Cheapest cost a single step can ever have.
    ///
    /// Flood searches stop expanding after
    /// `(movement_points + extended_movement_points) / cheapest_step_cost`
    /// steps, which keeps them finite on zero-cost terrain.
    pub cheapest_step_cost: f32,

    /// Maximum number of actions a foe may chain to reach engagement.
    pub max_engage_depth: u32,

    /// Fire range (in hexes) of units that carry none of their own.
    ///
    /// 0 means such units cannot fire.
    pub default_fire_range: u32,
}

impl Default for ArbiterConfig {
    fn default() -> Self {
        Self {
            minimal_move_cost: 1.0,
            cheapest_step_cost: 0.5,
            max_engage_depth: 3,
            default_fire_range: 0,
        }
    }
}

impl ArbiterConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a config from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: ArbiterConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if !(self.cheapest_step_cost > 0.0) {
            return Err(ArbiterError::InvalidConfig(format!(
                "cheapest_step_cost ({}) must be positive",
                self.cheapest_step_cost
            )));
        }

        if !(self.minimal_move_cost >= self.cheapest_step_cost) {
            return Err(ArbiterError::InvalidConfig(format!(
                "minimal_move_cost ({}) should be >= cheapest_step_cost ({})",
                self.minimal_move_cost, self.cheapest_step_cost
            )));
        }

        if self.max_engage_depth == 0 {
            return Err(ArbiterError::InvalidConfig(
                "max_engage_depth must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Upper bound on the number of steps a unit with `points` can take
    pub fn max_steps(&self, points: f32) -> usize {
        if points <= 0.0 {
            return 1;
        }
        // One extra step covers a minimal move taken with insufficient points
        (points / self.cheapest_step_cost).ceil() as usize + 1
    }
}

/// Load a config from a TOML file
pub fn load_config(path: &Path) -> Result<ArbiterConfig> {
    let contents = fs::read_to_string(path)?;
    ArbiterConfig::from_toml_str(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ArbiterConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ArbiterConfig::from_toml_str("max_engage_depth = 5").unwrap();
        assert_eq!(config.max_engage_depth, 5);
        assert_eq!(config.minimal_move_cost, 1.0);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result = ArbiterConfig::from_toml_str("max_chain = 5");
        assert!(matches!(result, Err(ArbiterError::ConfigParse(_))));
    }

    #[test]
    fn test_zero_step_cost_rejected() {
        let result = ArbiterConfig::from_toml_str("cheapest_step_cost = 0.0");
        assert!(matches!(result, Err(ArbiterError::InvalidConfig(_))));
    }

    #[test]
    fn test_zero_engage_depth_rejected() {
        let config = ArbiterConfig {
            max_engage_depth: 0,
            ..ArbiterConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_max_steps() {
        let config = ArbiterConfig::default();
        assert_eq!(config.max_steps(3.0), 7);
        assert_eq!(config.max_steps(0.0), 1);
    }

    #[test]
    fn test_missing_file() {
        let result = load_config(Path::new("does/not/exist.toml"));
        assert!(matches!(result, Err(ArbiterError::ConfigRead(_))));
    }
}
