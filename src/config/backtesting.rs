use super::traits::ConfigSection;
use crate::engines::evaluation::payout::{PayoutMode, PayoutTable};
use crate::engines::strategies::StrategyId;
use crate::error::DrawbiasError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestingConfig {
    /// Number of walk-forward targets (newest first)
    pub num_simulations: usize,
    /// Draws handed to a strategy before each target
    pub training_window: usize,
    /// The loop stops once fewer training draws remain
    pub min_training: usize,
    pub strategies: Vec<StrategyId>,
    pub payout_mode: PayoutMode,
    pub payout: PayoutTable,
}

impl Default for BacktestingConfig {
    fn default() -> Self {
        Self {
            num_simulations: 20,
            training_window: 100,
            min_training: 30,
            strategies: vec![
                StrategyId::WeightedSampling,
                StrategyId::Genetic,
                StrategyId::EnsembleTree,
                StrategyId::GradientClassifier,
                StrategyId::Markov,
                StrategyId::Consensus,
            ],
            payout_mode: PayoutMode::Fixed,
            payout: PayoutTable::default(),
        }
    }
}

impl ConfigSection for BacktestingConfig {
    fn section_name() -> &'static str {
        "backtesting"
    }

    fn validate(&self) -> Result<(), DrawbiasError> {
        if self.training_window == 0 {
            return Err(DrawbiasError::Configuration(
                "backtesting.training_window must be at least 1".to_string(),
            ));
        }
        if self.min_training > self.training_window {
            return Err(DrawbiasError::Configuration(format!(
                "backtesting.min_training ({}) exceeds training_window ({})",
                self.min_training, self.training_window
            )));
        }
        if self.payout.ticket_price < 0.0 {
            return Err(DrawbiasError::Configuration(
                "Ticket price must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsensusConfig {
    pub members: Vec<StrategyId>,
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        Self {
            members: vec![
                StrategyId::WeightedSampling,
                StrategyId::Genetic,
                StrategyId::EnsembleTree,
                StrategyId::GradientClassifier,
                StrategyId::Markov,
            ],
        }
    }
}

impl ConfigSection for ConsensusConfig {
    fn section_name() -> &'static str {
        "consensus"
    }

    fn validate(&self) -> Result<(), DrawbiasError> {
        if self.members.is_empty() {
            return Err(DrawbiasError::Configuration(
                "consensus.members must name at least one strategy".to_string(),
            ));
        }
        if self.members.contains(&StrategyId::Consensus) {
            return Err(DrawbiasError::Configuration(
                "consensus cannot be a member of itself".to_string(),
            ));
        }
        Ok(())
    }
}
