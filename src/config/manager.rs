use super::{
    backtesting::{BacktestingConfig, ConsensusConfig},
    evolution::EvolutionConfig,
    ml::MLConfig,
    sampling::{LocalSearchConfig, SamplingConfig},
    traits::ConfigSection,
};
use crate::engines::scoring::ScoreWeights;
use crate::engines::strategies::StrategyId;
use crate::error::DrawbiasError;
use crate::types::{DRAW_SIZE, MAX_CANDIDATE_SIZE};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Prefix for environment overrides, e.g. `DRAWBIAS__SAMPLING__MAX_ATTEMPTS=2000`
pub const ENV_PREFIX: &str = "DRAWBIAS";
const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub candidate_size: usize,
    pub seed: Option<u64>,
    pub strategy: StrategyId,
    pub scoring: ScoreWeights,
    pub sampling: SamplingConfig,
    pub local_search: LocalSearchConfig,
    pub evolution: EvolutionConfig,
    pub ml: MLConfig,
    pub consensus: ConsensusConfig,
    pub backtesting: BacktestingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            candidate_size: DRAW_SIZE,
            seed: None,
            strategy: StrategyId::Consensus,
            scoring: ScoreWeights::default(),
            sampling: SamplingConfig::default(),
            local_search: LocalSearchConfig::default(),
            evolution: EvolutionConfig::default(),
            ml: MLConfig::default(),
            consensus: ConsensusConfig::default(),
            backtesting: BacktestingConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), DrawbiasError> {
        if !(DRAW_SIZE..=MAX_CANDIDATE_SIZE).contains(&self.candidate_size) {
            return Err(DrawbiasError::Configuration(format!(
                "candidate_size must be between {} and {}, got {}",
                DRAW_SIZE, MAX_CANDIDATE_SIZE, self.candidate_size
            )));
        }
        self.sampling.validate()?;
        self.local_search.validate()?;
        self.evolution.validate()?;
        self.ml.validate()?;
        self.consensus.validate()?;
        self.backtesting.validate()?;
        Ok(())
    }
}

pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::default())),
        }
    }

    /// Load a TOML or JSON file (format from the extension), layered with
    /// `DRAWBIAS__<SECTION>__<FIELD>` environment overrides.
    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), DrawbiasError> {
        let path = path.as_ref();
        let builder = config::Config::builder().add_source(config::File::from(path));
        let config = Self::build(builder)?;
        info!("Loaded configuration from {}", path.display());
        self.replace(config)
    }

    /// Defaults plus environment overrides only.
    pub fn load_from_env(&self) -> Result<(), DrawbiasError> {
        let config = Self::build(config::Config::builder())?;
        self.replace(config)
    }

    fn build(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<AppConfig, DrawbiasError> {
        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| DrawbiasError::Configuration(format!("Failed to read config: {}", e)))?;

        settings
            .try_deserialize::<AppConfig>()
            .map_err(|e| DrawbiasError::Configuration(format!("Failed to parse config: {}", e)))
    }

    fn replace(&self, config: AppConfig) -> Result<(), DrawbiasError> {
        config.validate()?;
        *self.config.write().unwrap_or_else(|e| e.into_inner()) = config;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), DrawbiasError> {
        let config = self.get();
        let toml_str = toml::to_string_pretty(&config)
            .map_err(|e| DrawbiasError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)
            .map_err(|e| DrawbiasError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn get(&self) -> AppConfig {
        self.config.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn update<F>(&self, f: F) -> Result<(), DrawbiasError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut updated = self.get();
        f(&mut updated);
        self.replace(updated)
    }
}
