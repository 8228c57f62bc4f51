use super::traits::ConfigSection;
use crate::error::DrawbiasError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MLConfig {
    pub forest: ForestConfig,
    pub gradient: GradientConfig,
    pub markov: MarkovConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestConfig {
    pub num_trees: usize,
    /// Newest positions turned into training samples (25 per draw)
    pub training_draws: usize,
    pub max_depth: usize,
    pub min_samples_split: usize,
    /// Features examined per split; `None` means ceil(sqrt(feature count))
    pub features_per_split: Option<usize>,
    pub thresholds_per_feature: usize,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            num_trees: 10,
            training_draws: 100,
            max_depth: 6,
            min_samples_split: 20,
            features_per_split: None,
            thresholds_per_feature: 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradientConfig {
    pub training_draws: usize,
    pub epochs: usize,
    pub learning_rate: f64,
}

impl Default for GradientConfig {
    fn default() -> Self {
        Self {
            training_draws: 60,
            epochs: 40,
            learning_rate: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkovConfig {
    /// Consecutive draw pairs used to count transitions
    pub training_draws: usize,
    /// Additive smoothing on every transition count
    pub smoothing: f64,
}

impl Default for MarkovConfig {
    fn default() -> Self {
        Self {
            training_draws: 100,
            smoothing: 1.0,
        }
    }
}

impl ConfigSection for MLConfig {
    fn section_name() -> &'static str {
        "ml"
    }

    fn validate(&self) -> Result<(), DrawbiasError> {
        if self.forest.num_trees == 0 {
            return Err(DrawbiasError::Configuration(
                "ml.forest.num_trees must be at least 1".to_string(),
            ));
        }
        if self.forest.max_depth == 0 {
            return Err(DrawbiasError::Configuration(
                "ml.forest.max_depth must be at least 1".to_string(),
            ));
        }
        if self.forest.thresholds_per_feature == 0 {
            return Err(DrawbiasError::Configuration(
                "ml.forest.thresholds_per_feature must be at least 1".to_string(),
            ));
        }
        if matches!(self.forest.features_per_split, Some(0)) {
            return Err(DrawbiasError::Configuration(
                "ml.forest.features_per_split must be at least 1".to_string(),
            ));
        }
        if self.gradient.learning_rate <= 0.0 {
            return Err(DrawbiasError::Configuration(
                "ml.gradient.learning_rate must be positive".to_string(),
            ));
        }
        if self.markov.smoothing < 0.0 {
            return Err(DrawbiasError::Configuration(
                "ml.markov.smoothing must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}
