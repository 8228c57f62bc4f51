use super::constraints::{ConstraintViolation, HardConstraints};
use crate::ml::features::stats::{frame_count, odd_count, prime_count, DynamicStats};
use crate::types::{Candidate, HistoryWindow, NumberSet};
use serde::{Deserialize, Serialize};

/// Relative weight of each Gaussian term
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub repeat: f64,
    pub odd: f64,
    pub sum: f64,
    pub prime: f64,
    pub frame: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            repeat: 0.40,
            odd: 0.15,
            sum: 0.15,
            prime: 0.15,
            frame: 0.15,
        }
    }
}

/// Everything the scorer needs about the history, computed once per search
#[derive(Debug, Clone)]
pub struct ScoringContext {
    pub stats: DynamicStats,
    pub previous: Option<NumberSet>,
    pub constraints: HardConstraints,
}

impl ScoringContext {
    pub fn new(stats: &DynamicStats, previous: Option<&NumberSet>, size: usize) -> Self {
        Self {
            stats: stats.scaled_for(size),
            previous: previous.copied(),
            constraints: HardConstraints::for_size(size),
        }
    }

    pub fn from_history(history: HistoryWindow<'_>, size: usize) -> Self {
        let stats = DynamicStats::from_history(history);
        let previous = history.latest().map(|d| d.numbers());
        Self::new(&stats, previous, size)
    }
}

/// Plausibility score in [0, 1]
#[derive(Debug, Clone, Default)]
pub struct ScoringFunction {
    weights: ScoreWeights,
}

impl ScoringFunction {
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    /// Score against explicit statistics; 0.0 on any hard-constraint violation.
    pub fn score(&self, set: &NumberSet, stats: &DynamicStats, previous: Option<&NumberSet>) -> f64 {
        self.score_in(set, &ScoringContext::new(stats, previous, set.len()))
    }

    /// Fast path for search loops that reuse one context.
    pub fn score_in(&self, set: &NumberSet, ctx: &ScoringContext) -> f64 {
        self.evaluate(set, ctx).unwrap_or(0.0)
    }

    pub fn evaluate(&self, set: &NumberSet, ctx: &ScoringContext) -> Result<f64, ConstraintViolation> {
        let constraints = if ctx.constraints.size == set.len() {
            ctx.constraints.check(set)
        } else {
            HardConstraints::for_size(set.len()).check(set)
        };
        constraints?;

        let stats = &ctx.stats;
        let w = &self.weights;
        let mut total = w.odd * stats.odd.closeness(odd_count(set) as f64)
            + w.sum * stats.sum.closeness(f64::from(set.sum()))
            + w.prime * stats.prime.closeness(prime_count(set) as f64)
            + w.frame * stats.frame.closeness(frame_count(set) as f64);
        let mut weight = w.odd + w.sum + w.prime + w.frame;

        if let Some(previous) = &ctx.previous {
            total += w.repeat * stats.repeat.closeness(set.intersection(previous).len() as f64);
            weight += w.repeat;
        }

        if weight <= 0.0 {
            return Ok(0.0);
        }
        Ok((total / weight).clamp(0.0, 1.0))
    }

    /// Display percentage (0..=99). A rescaled plausibility score, NOT a
    /// probability of winning.
    pub fn confidence(&self, candidate: &Candidate, history: HistoryWindow<'_>) -> u8 {
        let ctx = ScoringContext::from_history(history, candidate.len());
        let score = self.score_in(candidate.set(), &ctx);
        (score * 100.0).round().clamp(0.0, 99.0) as u8
    }
}
