use super::tree::{DecisionTree, TreeConfig};
use crate::config::ForestConfig;
use crate::engines::strategies::{random_candidate, top_valid_by_score, Strategy, StrategyId};
use crate::ml::features::{FeatureEngine, Position};
use crate::ml::labeling::{build_dataset, LabeledSample};
use crate::types::{clamp_size, Candidate, HistoryWindow};
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use rayon::prelude::*;

/// Bagged decision trees averaged into one probability
#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Every tree gets its own bootstrap resample. Tree seeds are drawn from
    /// `rng` before the parallel fan-out, so the forest only depends on `rng`.
    pub fn fit<R: Rng + ?Sized>(samples: &[LabeledSample], config: &ForestConfig, rng: &mut R) -> Self {
        let tree_config = TreeConfig::from(config);
        let seeds: Vec<u64> = (0..config.num_trees.max(1)).map(|_| rng.gen()).collect();

        let trees = seeds
            .par_iter()
            .map(|&seed| {
                let mut tree_rng = StdRng::seed_from_u64(seed);
                let bootstrap: Vec<usize> = (0..samples.len())
                    .map(|_| tree_rng.gen_range(0..samples.len()))
                    .collect();
                DecisionTree::fit(samples, &bootstrap, &tree_config, &mut tree_rng)
            })
            .collect();

        Self { trees }
    }

    pub fn predict(&self, features: &[f64]) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }
        self.trees.iter().map(|t| t.predict(features)).sum::<f64>() / self.trees.len() as f64
    }

    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

pub struct EnsembleTreeStrategy {
    config: ForestConfig,
    features: FeatureEngine,
}

impl EnsembleTreeStrategy {
    pub fn new(config: ForestConfig) -> Self {
        Self {
            config,
            features: FeatureEngine::default(),
        }
    }

    pub fn with_features(mut self, features: FeatureEngine) -> Self {
        self.features = features;
        self
    }

    /// Forest probability for every number at the next draw; index `n - 1` holds number `n`.
    pub fn predict_next<R: Rng + ?Sized>(&self, history: HistoryWindow<'_>, rng: &mut R) -> Option<Vec<f64>> {
        let samples = build_dataset(history, &self.features, self.config.training_draws);
        if samples.is_empty() {
            return None;
        }

        let forest = RandomForest::fit(&samples, &self.config, rng);
        let scores = self
            .features
            .compute_all(history, Position::Future)
            .iter()
            .map(|f| forest.predict(&f.to_array()))
            .collect();
        Some(scores)
    }
}

impl Strategy for EnsembleTreeStrategy {
    fn id(&self) -> StrategyId {
        StrategyId::EnsembleTree
    }

    fn generate(&self, history: HistoryWindow<'_>, size: usize, rng: &mut dyn RngCore) -> Candidate {
        let size = clamp_size(size);
        let Some(scores) = self.predict_next(history, rng) else {
            warn!("ensemble tree: no training samples in {} draws; using random fallback", history.len());
            return random_candidate(size, rng);
        };

        let chosen = top_valid_by_score(&scores, size);
        debug!("ensemble tree picked {}", chosen);
        Candidate::from_set(chosen)
    }
}
