//! Simulation configuration.

use serde::{Deserialize, Serialize};

use crate::error::BoolFnResult;

/// Limits applied when simulating a [`BoolFunction`](crate::BoolFunction).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Largest number of input bits for which complete truth tables are
    /// computed. Each output table holds `2^n` bits.
    pub max_truth_table_inputs: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_truth_table_inputs: 20,
        }
    }
}

impl SimulationConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> BoolFnResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the exhaustive simulation limit.
    pub fn with_max_truth_table_inputs(mut self, limit: usize) -> Self {
        self.max_truth_table_inputs = limit;
        self
    }
}
