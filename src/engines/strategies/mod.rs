pub mod consensus;
pub mod external;
pub mod registry;

pub use consensus::ConsensusCombiner;
pub use external::{AsyncStrategyProvider, BlockingStrategy};
pub use registry::StrategyRegistry;

use crate::engines::generation::repair;
use crate::engines::scoring::HardConstraints;
use crate::types::{clamp_size, Candidate, HistoryWindow, NumberSet, UNIVERSE_SIZE};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyId {
    WeightedSampling,
    Genetic,
    EnsembleTree,
    GradientClassifier,
    Markov,
    Consensus,
    Neural,
}

impl StrategyId {
    pub fn all() -> Vec<Self> {
        vec![
            Self::WeightedSampling,
            Self::Genetic,
            Self::EnsembleTree,
            Self::GradientClassifier,
            Self::Markov,
            Self::Consensus,
            Self::Neural,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WeightedSampling => "weighted_sampling",
            Self::Genetic => "genetic",
            Self::EnsembleTree => "ensemble_tree",
            Self::GradientClassifier => "gradient_classifier",
            Self::Markov => "markov",
            Self::Consensus => "consensus",
            Self::Neural => "neural",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        let normalized = name.trim().to_lowercase().replace('-', "_");
        Self::all().into_iter().find(|id| id.as_str() == normalized)
    }
}

impl fmt::Display for StrategyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A candidate generator.
///
/// Implementations never fail: short or degenerate histories produce a
/// fallback candidate, and the returned candidate always holds exactly
/// `clamp_size(size)` distinct numbers in 1..=25.
pub trait Strategy: Send + Sync {
    fn id(&self) -> StrategyId;

    fn generate(&self, history: HistoryWindow<'_>, size: usize, rng: &mut dyn RngCore) -> Candidate;
}

/// Uniform fallback used when a strategy cannot learn anything.
pub fn random_candidate<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Candidate {
    Candidate::from_set(random_set(size, rng))
}

pub fn random_set<R: Rng + ?Sized>(size: usize, rng: &mut R) -> NumberSet {
    let mut pool: Vec<u8> = (1..=UNIVERSE_SIZE).collect();
    pool.shuffle(rng);
    pool.into_iter().take(clamp_size(size)).collect()
}

/// All 25 numbers, best score first; index `i` scores number `i + 1`. Ties go to the lower number.
pub fn rank_by_score(scores: &[f64]) -> Vec<u8> {
    let mut ranked: Vec<(u8, f64)> = (1..=UNIVERSE_SIZE)
        .map(|n| (n, scores.get(usize::from(n - 1)).copied().unwrap_or(0.0)))
        .collect();
    ranked.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    ranked.into_iter().map(|(n, _)| n).collect()
}

/// Highest `size` scores.
pub fn top_by_score(scores: &[f64], size: usize) -> NumberSet {
    rank_by_score(scores).into_iter().take(clamp_size(size)).collect()
}

/// Top of `ranked`, repaired into the hard constraints for its size.
pub fn top_valid(ranked: &[u8], size: usize) -> NumberSet {
    let size = clamp_size(size);
    let top: NumberSet = ranked.iter().copied().take(size).collect();
    repair(top, ranked, NumberSet::empty(), &HardConstraints::for_size(size))
}

/// `top_by_score` followed by a constraint repair that prefers higher scores.
pub fn top_valid_by_score(scores: &[f64], size: usize) -> NumberSet {
    top_valid(&rank_by_score(scores), size)
}
