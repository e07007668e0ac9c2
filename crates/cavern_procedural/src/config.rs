//! # Generation Configuration
//!
//! All tunables for a generation run, loadable from TOML.
//!
//! ## Example
//!
//! ```toml
//! wall_probability = 0.45
//! iterations = 5
//! polish_passes = 1
//!
//! [rule]
//! wall_threshold = 5
//! floor_threshold = 4
//!
//! [cleanup]
//! prune_fraction = 0.2
//! connect = true
//!
//! [rooms]
//! room_count = 8
//! max_width = 10
//! ```
//!
//! Missing keys fall back to the defaults below.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::automaton::{AutomatonRule, CellularAutomaton};
use crate::error::{GenerationError, GenerationResult};
use crate::rooms::RoomConfig;

/// Default number of automaton rounds.
pub const DEFAULT_ITERATIONS: usize = 5;

/// Post-processing applied to a settled cave in final-grid modes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanupConfig {
    /// Fill floor pockets smaller than this fraction of the largest cave.
    pub prune_fraction: Option<f64>,
    /// Tunnel every remaining pocket into the largest cave.
    pub connect: bool,
}

impl CleanupConfig {
    /// Returns true if no cleanup step is enabled.
    #[inline]
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.prune_fraction.is_none() && !self.connect
    }
}

/// Complete configuration for a generation run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Probability that a noise cell starts as wall.
    pub wall_probability: f64,
    /// Automaton rounds for modes that don't take an explicit count.
    pub iterations: usize,
    /// Automaton rule.
    pub rule: AutomatonRule,
    /// Extra widening rounds after the main rounds (final-grid modes only).
    pub polish_passes: usize,
    /// Pocket pruning and connection (final-grid modes only).
    pub cleanup: CleanupConfig,
    /// Room placement.
    pub rooms: RoomConfig,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            wall_probability: CellularAutomaton::DEFAULT_WALL_PROBABILITY,
            iterations: DEFAULT_ITERATIONS,
            rule: AutomatonRule::CAVE,
            polish_passes: 0,
            cleanup: CleanupConfig::default(),
            rooms: RoomConfig::default(),
        }
    }
}

impl GenerationConfig {
    /// Parses a config from a TOML string and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::InvalidConfig`] on parse or validation failure.
    pub fn from_toml_str(source: &str) -> GenerationResult<Self> {
        let config: Self = toml::from_str(source)
            .map_err(|e| GenerationError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::InvalidConfig`] if the file cannot be read,
    /// parsed or validated.
    pub fn from_toml_file(path: &Path) -> GenerationResult<Self> {
        let source = std::fs::read_to_string(path).map_err(|e| {
            GenerationError::InvalidConfig(format!("{}: {e}", path.display()))
        })?;
        tracing::debug!(path = %path.display(), "loading generation config");
        Self::from_toml_str(&source)
    }

    /// Serializes the config back to TOML.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::InvalidConfig`] if serialization fails.
    pub fn to_toml_string(&self) -> GenerationResult<String> {
        toml::to_string(self).map_err(|e| GenerationError::InvalidConfig(e.to_string()))
    }

    /// Checks every field for a usable value.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::InvalidConfig`] describing the first bad field.
    pub fn validate(&self) -> GenerationResult<()> {
        if !(0.0..=1.0).contains(&self.wall_probability) {
            return Err(GenerationError::InvalidConfig(format!(
                "wall_probability {} outside [0, 1]",
                self.wall_probability
            )));
        }
        if self.rule.radius == 0 || self.rule.radius > AutomatonRule::MAX_RADIUS {
            return Err(GenerationError::InvalidConfig(format!(
                "rule.radius {} outside [1, {}]",
                self.rule.radius,
                AutomatonRule::MAX_RADIUS
            )));
        }
        let neighbors = self.rule.neighborhood_size();
        if self.rule.wall_threshold > neighbors + 1 || self.rule.floor_threshold > neighbors + 1 {
            return Err(GenerationError::InvalidConfig(format!(
                "rule thresholds must not exceed {} for radius {}",
                neighbors + 1,
                self.rule.radius
            )));
        }
        if self.rule.floor_threshold > self.rule.wall_threshold {
            return Err(GenerationError::InvalidConfig(format!(
                "rule.floor_threshold {} exceeds wall_threshold {}",
                self.rule.floor_threshold, self.rule.wall_threshold
            )));
        }
        if let Some(fraction) = self.cleanup.prune_fraction {
            if !(0.0..=1.0).contains(&fraction) {
                return Err(GenerationError::InvalidConfig(format!(
                    "cleanup.prune_fraction {fraction} outside [0, 1]"
                )));
            }
        }
        self.rooms.validate()
    }

    /// The automaton described by this config.
    #[inline]
    #[must_use]
    pub const fn automaton(&self) -> CellularAutomaton {
        CellularAutomaton::new(self.wall_probability, self.rule)
    }
}
