use crate::config::GradientConfig;
use crate::engines::strategies::{top_valid_by_score, Strategy, StrategyId};
use crate::ml::features::{FeatureEngine, FeatureVector, Position};
use crate::ml::labeling::{build_dataset, LabeledSample};
use crate::types::{clamp_size, Candidate, HistoryWindow, UNIVERSE_SIZE};
use log::debug;
use rand::RngCore;

/// Feature vector plus a constant bias input
pub const INPUTS: usize = FeatureVector::LEN + 1;

pub fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

fn with_bias(features: &[f64; FeatureVector::LEN]) -> [f64; INPUTS] {
    let mut x = [1.0; INPUTS];
    x[..FeatureVector::LEN].copy_from_slice(features);
    x
}

/// Logistic regression trained by per-example gradient descent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogisticModel {
    weights: [f64; INPUTS],
}

impl Default for LogisticModel {
    fn default() -> Self {
        Self { weights: [0.0; INPUTS] }
    }
}

impl LogisticModel {
    pub fn weights(&self) -> &[f64; INPUTS] {
        &self.weights
    }

    pub fn predict(&self, features: &[f64; FeatureVector::LEN]) -> f64 {
        let x = with_bias(features);
        sigmoid(self.weights.iter().zip(x.iter()).map(|(w, v)| w * v).sum())
    }

    /// `w -= lr * (sigmoid(w.x) - y) * x`
    pub fn update(&mut self, sample: &LabeledSample, learning_rate: f64) {
        let error = self.predict(&sample.features) - sample.target();
        let x = with_bias(&sample.features);
        for (w, v) in self.weights.iter_mut().zip(x.iter()) {
            *w -= learning_rate * error * v;
        }
    }
}

/// One logistic model per number
pub struct GradientClassifierStrategy {
    config: GradientConfig,
    features: FeatureEngine,
}

impl GradientClassifierStrategy {
    pub fn new(config: GradientConfig) -> Self {
        Self {
            config,
            features: FeatureEngine::default(),
        }
    }

    pub fn with_features(mut self, features: FeatureEngine) -> Self {
        self.features = features;
        self
    }

    /// Per-example stochastic gradient descent: each epoch walks the samples
    /// oldest first and updates the sampled number's model after every one.
    pub fn train(&self, history: HistoryWindow<'_>) -> Vec<LogisticModel> {
        let samples = build_dataset(history, &self.features, self.config.training_draws);
        let mut models = vec![LogisticModel::default(); usize::from(UNIVERSE_SIZE)];

        for _ in 0..self.config.epochs {
            for sample in &samples {
                models[usize::from(sample.number - 1)].update(sample, self.config.learning_rate);
            }
        }
        models
    }

    /// Probability for every number at the next draw; index `n - 1` holds number `n`.
    pub fn predict_next(&self, history: HistoryWindow<'_>) -> Vec<f64> {
        let models = self.train(history);
        self.features
            .compute_all(history, Position::Future)
            .iter()
            .zip(models.iter())
            .map(|(f, model)| model.predict(&f.to_array()))
            .collect()
    }
}

impl Strategy for GradientClassifierStrategy {
    fn id(&self) -> StrategyId {
        StrategyId::GradientClassifier
    }

    /// Deterministic: the RNG is not consumed. An empty window yields the
    /// lowest numbers, repaired into the constraints, since every model predicts 0.5.
    fn generate(&self, history: HistoryWindow<'_>, size: usize, _rng: &mut dyn RngCore) -> Candidate {
        let size = clamp_size(size);
        let scores = self.predict_next(history);
        let chosen = top_valid_by_score(&scores, size);
        debug!("gradient classifier picked {}", chosen);
        Candidate::from_set(chosen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::scoring::HardConstraints;
    use crate::engines::strategies::{rank_by_score, top_valid};
    use crate::types::{Draw, History};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_update_moves_towards_label() {
        let mut model = LogisticModel::default();
        let sample = LabeledSample {
            number: 1,
            features: [1.0, 0.0, 0.0, 0.0, 0.0],
            label: true,
        };
        let before = model.predict(&sample.features);
        for _ in 0..20 {
            model.update(&sample, 0.1);
        }
        assert!(model.predict(&sample.features) > before);
    }

    #[test]
    fn test_empty_history_gives_lowest_numbers() {
        let strategy = GradientClassifierStrategy::new(GradientConfig::default());
        let history = History::default();
        let candidate = strategy.generate(history.window(), 15, &mut StdRng::seed_from_u64(0));

        let ascending: Vec<u8> = (1..=25).collect();
        assert_eq!(*candidate.set(), top_valid(&ascending, 15));
        assert_eq!(HardConstraints::for_size(15).check(candidate.set()), Ok(()));
    }

    #[test]
    fn test_always_drawn_numbers_score_highest() {
        // 1..=10 in every draw, the remaining five rotate through 11..=25
        let history = History::from_draws(
            (1..=60u32)
                .map(|id| {
                    let offset = (id % 3) as u8 * 5;
                    let numbers: Vec<u8> = (1..=10).chain(11 + offset..16 + offset).collect();
                    Draw::new(id, &numbers, "", Vec::new()).unwrap()
                })
                .collect(),
        );
        let strategy = GradientClassifierStrategy::new(GradientConfig::default());
        let ranked = rank_by_score(&strategy.predict_next(history.window()));
        let mut top_ten = ranked[..10].to_vec();
        top_ten.sort_unstable();
        assert_eq!(top_ten, (1..=10).collect::<Vec<u8>>());

        // 1..=10 is one long run, so the played set keeps only part of it
        let candidate = strategy.generate(history.window(), 15, &mut StdRng::seed_from_u64(0));
        assert_eq!(HardConstraints::for_size(15).check(candidate.set()), Ok(()));
    }
}
