use crate::config::MarkovConfig;
use crate::engines::strategies::{top_valid_by_score, Strategy, StrategyId};
use crate::types::{clamp_size, Candidate, HistoryWindow, NumberSet, UNIVERSE_SIZE};
use log::debug;
use rand::RngCore;

const N: usize = UNIVERSE_SIZE as usize;

/// First-order transition counts: how often `to` was drawn in the draw right
/// after a draw containing `from`.
#[derive(Debug, Clone)]
pub struct TransitionMatrix {
    counts: [[u32; N]; N],
    occurrences: [u32; N],
    smoothing: f64,
}

impl TransitionMatrix {
    /// Counts over consecutive pairs of the most recent `window` draws.
    pub fn from_history(history: HistoryWindow<'_>, window: usize, smoothing: f64) -> Self {
        let mut counts = [[0u32; N]; N];
        let mut occurrences = [0u32; N];

        let recent = history.recent(window);
        // newest first: pair[1] is the older draw, pair[0] the one that followed it
        for pair in recent.as_slice().windows(2) {
            let (next, prev) = (pair[0].numbers(), pair[1].numbers());
            for from in prev.iter() {
                let row = usize::from(from - 1);
                occurrences[row] += 1;
                for to in next.iter() {
                    counts[row][usize::from(to - 1)] += 1;
                }
            }
        }

        Self {
            counts,
            occurrences,
            smoothing: smoothing.max(0.0),
        }
    }

    /// Smoothed P(to | from)
    pub fn probability(&self, from: u8, to: u8) -> f64 {
        let (Some(row), Some(col)) = (index(from), index(to)) else {
            return 0.0;
        };
        let denominator = f64::from(self.occurrences[row]) + self.smoothing * N as f64;
        if denominator <= 0.0 {
            return 0.0;
        }
        (f64::from(self.counts[row][col]) + self.smoothing) / denominator
    }

    /// Sum of transition probabilities from every number of `state`; index `n - 1` holds number `n`.
    pub fn scores_from(&self, state: &NumberSet) -> Vec<f64> {
        (1..=UNIVERSE_SIZE)
            .map(|to| state.iter().map(|from| self.probability(from, to)).sum())
            .collect()
    }
}

fn index(n: u8) -> Option<usize> {
    (1..=UNIVERSE_SIZE).contains(&n).then(|| usize::from(n - 1))
}

pub struct MarkovTransitionStrategy {
    config: MarkovConfig,
}

impl MarkovTransitionStrategy {
    pub fn new(config: MarkovConfig) -> Self {
        Self { config }
    }
}

impl Strategy for MarkovTransitionStrategy {
    fn id(&self) -> StrategyId {
        StrategyId::Markov
    }

    fn generate(&self, history: HistoryWindow<'_>, size: usize, _rng: &mut dyn RngCore) -> Candidate {
        let size = clamp_size(size);
        let matrix = TransitionMatrix::from_history(history, self.config.training_draws, self.config.smoothing);
        let state = history.latest().map(|d| *d.numbers()).unwrap_or_default();

        let chosen = top_valid_by_score(&matrix.scores_from(&state), size);
        debug!("markov transitions from {} picked {}", state, chosen);
        Candidate::from_set(chosen)
    }
}
