//! Configuration file support

use crate::contact::distance::DistanceMethod;
use crate::contact::threshold::DEFAULT_SOFT_CAP;
use crate::error::{CsaError, Result};
use crate::mesh::area::DegenerateFacePolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Probe face count below which the distance stage stays single-threaded
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 1000;

fn default_soft_cap() -> f64 {
    DEFAULT_SOFT_CAP
}

fn default_parallel_threshold() -> usize {
    DEFAULT_PARALLEL_THRESHOLD
}

/// Tunable parameters of a contact surface area run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsaConfig {
    /// Distances at or above this value are left out of threshold fitting.
    /// Expressed in mesh coordinate units.
    #[serde(default = "default_soft_cap")]
    pub soft_cap: f64,

    /// Nearest-centroid search strategy
    #[serde(default)]
    pub distance_method: DistanceMethod,

    /// Minimum probe face count for parallel distance computation
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,

    /// Handling of faces with an undefined normal during area integration
    #[serde(default)]
    pub degenerate_policy: DegenerateFacePolicy,
}

impl Default for CsaConfig {
    fn default() -> Self {
        Self {
            soft_cap: DEFAULT_SOFT_CAP,
            distance_method: DistanceMethod::default(),
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            degenerate_policy: DegenerateFacePolicy::default(),
        }
    }
}

impl CsaConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CsaError::ConfigError(format!("Failed to read config file: {}", e))
        })?;

        let config: Self = serde_json::from_str(&content).map_err(|e| {
            CsaError::ConfigError(format!("Failed to parse config file: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn to_file(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;

        std::fs::write(path, content).map_err(|e| {
            CsaError::ConfigError(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Check parameter ranges
    pub fn validate(&self) -> Result<()> {
        if !self.soft_cap.is_finite() || self.soft_cap <= 0.0 {
            return Err(CsaError::ConfigError(format!(
                "Soft cap must be a positive finite distance, got {}",
                self.soft_cap
            )));
        }
        Ok(())
    }
}
