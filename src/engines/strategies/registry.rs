use super::consensus::ConsensusCombiner;
use super::external::{AsyncStrategyProvider, BlockingStrategy};
use super::{Strategy, StrategyId};
use crate::config::AppConfig;
use crate::engines::generation::{GeneticSearchStrategy, LocalOptimizer, WeightedSamplingStrategy};
use crate::engines::scoring::ScoringFunction;
use crate::error::{DrawbiasError, Result};
use crate::ml::models::{EnsembleTreeStrategy, GradientClassifierStrategy, MarkovTransitionStrategy};
use std::collections::HashMap;
use std::sync::Arc;

pub struct StrategyRegistry {
    strategies: HashMap<StrategyId, Arc<dyn Strategy>>,
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

impl StrategyRegistry {
    pub fn empty() -> Self {
        Self {
            strategies: HashMap::new(),
        }
    }

    /// Every built-in strategy, wired from one configuration. The neural
    /// slot stays empty until a provider is registered.
    pub fn from_config(config: &AppConfig) -> Self {
        let mut registry = Self::empty();
        let scorer = ScoringFunction::new(config.scoring);
        let optimizer = LocalOptimizer::new(config.local_search.iterations);

        let sampler = Arc::new(WeightedSamplingStrategy::new(
            config.sampling.clone(),
            scorer.clone(),
            optimizer,
        ));
        registry.register(sampler.clone());

        registry.register(Arc::new(GeneticSearchStrategy::new(
            config.evolution.clone(),
            WeightedSamplingStrategy::new(config.sampling.clone(), scorer.clone(), optimizer),
            scorer,
        )));
        registry.register(Arc::new(EnsembleTreeStrategy::new(config.ml.forest.clone())));
        registry.register(Arc::new(GradientClassifierStrategy::new(config.ml.gradient.clone())));
        registry.register(Arc::new(MarkovTransitionStrategy::new(config.ml.markov.clone())));

        let members: Vec<Arc<dyn Strategy>> = config
            .consensus
            .members
            .iter()
            .filter_map(|id| registry.get(*id))
            .collect();
        registry.register(Arc::new(ConsensusCombiner::new(members, sampler)));

        registry
    }

    /// Replaces and returns any strategy already registered under the same id.
    pub fn register(&mut self, strategy: Arc<dyn Strategy>) -> Option<Arc<dyn Strategy>> {
        self.strategies.insert(strategy.id(), strategy)
    }

    pub fn register_async<P: AsyncStrategyProvider + 'static>(&mut self, provider: P) -> Option<Arc<dyn Strategy>> {
        self.register(Arc::new(BlockingStrategy::new(provider)))
    }

    pub fn get(&self, id: StrategyId) -> Option<Arc<dyn Strategy>> {
        self.strategies.get(&id).cloned()
    }

    /// Look up several ids, failing on the first one that is not registered.
    pub fn resolve(&self, ids: &[StrategyId]) -> Result<Vec<Arc<dyn Strategy>>> {
        ids.iter()
            .map(|id| {
                self.get(*id)
                    .ok_or_else(|| DrawbiasError::Strategy(format!("strategy '{}' is not registered", id)))
            })
            .collect()
    }

    /// Registered ids in a stable order.
    pub fn ids(&self) -> Vec<StrategyId> {
        let mut ids: Vec<StrategyId> = self.strategies.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}
