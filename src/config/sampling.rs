use super::traits::{ensure_unit_interval, ConfigSection};
use crate::error::DrawbiasError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    pub max_attempts: usize,
    pub early_exit_score: f64,
    /// Per-draw decay of the recent frequency term
    pub decay: f64,
    pub decay_window: usize,
    /// Below this many draws the strategy returns a uniform candidate
    pub min_history: usize,
    /// Polish the best sample with the local optimizer
    pub refine: bool,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            max_attempts: 4000,
            early_exit_score: 0.97,
            decay: 0.9,
            decay_window: 20,
            min_history: 10,
            refine: true,
        }
    }
}

impl ConfigSection for SamplingConfig {
    fn section_name() -> &'static str {
        "sampling"
    }

    fn validate(&self) -> Result<(), DrawbiasError> {
        if self.max_attempts == 0 {
            return Err(DrawbiasError::Configuration(
                "sampling.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.decay_window == 0 {
            return Err(DrawbiasError::Configuration(
                "sampling.decay_window must be at least 1".to_string(),
            ));
        }
        ensure_unit_interval("sampling", "early_exit_score", self.early_exit_score)?;
        ensure_unit_interval("sampling", "decay", self.decay)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalSearchConfig {
    pub iterations: usize,
}

impl Default for LocalSearchConfig {
    fn default() -> Self {
        Self { iterations: 100 }
    }
}

impl ConfigSection for LocalSearchConfig {
    fn section_name() -> &'static str {
        "local_search"
    }

    fn validate(&self) -> Result<(), DrawbiasError> {
        Ok(())
    }
}
