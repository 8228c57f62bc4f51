use super::local_search::{repair, LocalOptimizer};
use crate::config::SamplingConfig;
use crate::engines::scoring::{HardConstraints, ScoringContext, ScoringFunction};
use crate::engines::strategies::{random_candidate, rank_by_score, Strategy, StrategyId};
use crate::ml::features::{draws_since, occurrence_counts, FeatureEngine, Position};
use crate::types::{clamp_size, Candidate, HistoryWindow, NumberSet, UNIVERSE_SIZE};
use log::{debug, warn};
use rand::{Rng, RngCore};

const LONG_FREQUENCY_WEIGHT: f64 = 2.0;
const RECENT_FREQUENCY_WEIGHT: f64 = 3.0;
const CYCLE_BOOST: f64 = 4.0;
const DELAY_WEIGHT: f64 = 0.5;
/// Delay boost is damped for numbers that barely show up lately
const DEAD_NUMBER_FREQUENCY: f64 = 0.2;
const DEAD_NUMBER_DAMPING: f64 = 0.25;
/// Weight of a number drawn in every draw of both windows, with no boosts
const PRESENCE_CEILING: f64 = 1.0 + LONG_FREQUENCY_WEIGHT + RECENT_FREQUENCY_WEIGHT;
/// Ceiling drop per unit of missing frequency
const CEILING_MARGIN: f64 = 0.1;
/// Anchoring needs at least this many draws in the long window
const MIN_ANCHOR_HISTORY: usize = 10;

/// Per-number sampling weight; index `n - 1` holds number `n`
#[derive(Debug, Clone, PartialEq)]
pub struct WeightMap([f64; UNIVERSE_SIZE as usize]);

impl WeightMap {
    pub fn uniform() -> Self {
        Self([1.0; UNIVERSE_SIZE as usize])
    }

    pub fn get(&self, number: u8) -> f64 {
        if (1..=UNIVERSE_SIZE).contains(&number) {
            self.0[usize::from(number - 1)]
        } else {
            0.0
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, f64)> + '_ {
        (1..=UNIVERSE_SIZE).zip(self.0.iter().copied())
    }
}

/// Roulette selection without replacement.
///
/// `anchored` numbers are taken first; the rest is drawn one at a time from
/// the remaining pool, re-summing the pool weight on every pick.
pub fn sample_candidate<R: Rng + ?Sized>(
    weights: &WeightMap,
    size: usize,
    anchored: NumberSet,
    rng: &mut R,
) -> NumberSet {
    let size = clamp_size(size);
    let mut chosen: NumberSet = anchored.iter().take(size).collect();
    let mut pool: Vec<(u8, f64)> = chosen
        .complement()
        .iter()
        .map(|n| (n, weights.get(n).max(0.0)))
        .collect();

    while chosen.len() < size && !pool.is_empty() {
        let total: f64 = pool.iter().map(|(_, w)| w).sum();
        let idx = if total <= 0.0 {
            rng.gen_range(0..pool.len())
        } else {
            let mut spin = rng.gen::<f64>() * total;
            let mut picked = pool.len() - 1;
            for (i, (_, w)) in pool.iter().enumerate() {
                spin -= w;
                if spin <= 0.0 {
                    picked = i;
                    break;
                }
            }
            picked
        };

        let (number, _) = pool.remove(idx);
        chosen.insert(number);
    }

    chosen
}

/// Constrained stochastic search over frequency/delay/cycle weights
pub struct WeightedSamplingStrategy {
    config: SamplingConfig,
    features: FeatureEngine,
    scorer: ScoringFunction,
    optimizer: LocalOptimizer,
}

impl WeightedSamplingStrategy {
    pub fn new(config: SamplingConfig, scorer: ScoringFunction, optimizer: LocalOptimizer) -> Self {
        Self {
            config,
            features: FeatureEngine::default(),
            scorer,
            optimizer,
        }
    }

    pub fn with_features(mut self, features: FeatureEngine) -> Self {
        self.features = features;
        self
    }

    pub fn config(&self) -> &SamplingConfig {
        &self.config
    }

    /// Frequency, cycle and delay weights.
    ///
    /// Boosts are capped below the weight of a number present in every draw of
    /// the window, so no number ever outweighs one that is always drawn.
    pub fn build_weights(&self, history: HistoryWindow<'_>) -> WeightMap {
        if history.is_empty() {
            return WeightMap::uniform();
        }

        let features = self.features.compute_all(history, Position::Future);
        let long = occurrence_counts(history, self.features.long_window);
        let max_long = long.iter().copied().max().unwrap_or(0).max(1);
        let recent = self.decayed_frequency(history);

        let mut weights = [0.0; UNIVERSE_SIZE as usize];
        for n in 1..=UNIVERSE_SIZE {
            let i = usize::from(n - 1);
            let f = &features[i];

            let long_ratio = f64::from(long[i]) / f64::from(max_long);
            let mut weight = 1.0 + LONG_FREQUENCY_WEIGHT * long_ratio + RECENT_FREQUENCY_WEIGHT * recent[i];

            if f.missing_in_cycle {
                weight += CYCLE_BOOST;
            }

            let delay = draws_since(history, n, self.features.delay_cap).unwrap_or(self.features.delay_cap);
            let mut delay_boost = DELAY_WEIGHT * (1.0 + delay as f64).ln();
            if f.freq_short < DEAD_NUMBER_FREQUENCY {
                delay_boost *= DEAD_NUMBER_DAMPING;
            }

            let missing = LONG_FREQUENCY_WEIGHT * (1.0 - long_ratio) + RECENT_FREQUENCY_WEIGHT * (1.0 - recent[i]);
            weights[i] = (weight + delay_boost).min(PRESENCE_CEILING - CEILING_MARGIN * missing);
        }

        WeightMap(weights)
    }

    /// Exponentially decayed appearance rate over the recent window, in [0, 1].
    fn decayed_frequency(&self, history: HistoryWindow<'_>) -> [f64; UNIVERSE_SIZE as usize] {
        let mut scores = [0.0; UNIVERSE_SIZE as usize];
        let mut norm = 0.0;
        let mut factor = 1.0;

        for draw in history.recent(self.config.decay_window).iter() {
            for n in draw.numbers().iter() {
                scores[usize::from(n - 1)] += factor;
            }
            norm += factor;
            factor *= self.config.decay;
        }

        if norm > 0.0 {
            for s in scores.iter_mut() {
                *s /= norm;
            }
        }
        scores
    }

    /// Numbers present in every draw of the long window are always played.
    pub fn anchored_numbers(&self, history: HistoryWindow<'_>, size: usize) -> NumberSet {
        let window = history.recent(self.features.long_window);
        if window.len() < MIN_ANCHOR_HISTORY {
            return NumberSet::empty();
        }

        let all = window
            .iter()
            .fold(NumberSet::full(), |acc, d| acc.intersection(d.numbers()));
        all.iter().take(clamp_size(size)).collect()
    }

    /// Repairs an invalid `set` into the constraints, preferring heavier numbers.
    /// Anchored numbers are kept unless no valid set around them is reachable.
    pub fn repair_candidate(
        &self,
        set: NumberSet,
        weights: &WeightMap,
        anchored: NumberSet,
        constraints: &HardConstraints,
    ) -> NumberSet {
        if constraints.check(&set).is_ok() {
            return set;
        }
        let ranked = rank_by_score(weights.as_slice());
        let repaired = repair(set, &ranked, anchored, constraints);
        if constraints.check(&repaired).is_ok() || anchored.is_empty() {
            return repaired;
        }
        debug!("repair around anchors {} failed; releasing them", anchored);
        repair(repaired, &ranked, NumberSet::empty(), constraints)
    }

    /// Best scoring sample within the attempt budget. Returns the best invalid
    /// sample when no attempt satisfies the hard constraints.
    pub fn search<R: Rng + ?Sized>(
        &self,
        weights: &WeightMap,
        anchored: NumberSet,
        ctx: &ScoringContext,
        size: usize,
        rng: &mut R,
    ) -> (NumberSet, f64) {
        let mut best = sample_candidate(weights, size, anchored, rng);
        let mut best_score = self.scorer.score_in(&best, ctx);

        for attempt in 1..self.config.max_attempts.max(1) {
            if best_score >= self.config.early_exit_score {
                debug!("weighted sampling early exit after {} attempts", attempt);
                break;
            }
            let trial = sample_candidate(weights, size, anchored, rng);
            let score = self.scorer.score_in(&trial, ctx);
            if score > best_score {
                best = trial;
                best_score = score;
            }
        }

        if best_score <= 0.0 {
            warn!(
                "weighted sampling found no candidate within the hard constraints after {} attempts",
                self.config.max_attempts
            );
        }

        (best, best_score)
    }
}

impl Strategy for WeightedSamplingStrategy {
    fn id(&self) -> StrategyId {
        StrategyId::WeightedSampling
    }

    fn generate(&self, history: HistoryWindow<'_>, size: usize, rng: &mut dyn RngCore) -> Candidate {
        let size = clamp_size(size);
        if history.len() < self.config.min_history {
            warn!(
                "weighted sampling: {} draws available, {} required; using random fallback",
                history.len(),
                self.config.min_history
            );
            return random_candidate(size, rng);
        }

        let weights = self.build_weights(history);
        let anchored = self.anchored_numbers(history, size);
        let ctx = ScoringContext::from_history(history, size);

        let (mut best, mut best_score) = self.search(&weights, anchored, &ctx, size, rng);

        if self.config.refine {
            let (refined, refined_score) =
                self.optimizer
                    .refine(best, |s| self.scorer.score_in(s, &ctx), anchored, rng);
            best = refined;
            best_score = refined_score;
        }

        if best_score <= 0.0 {
            best = self.repair_candidate(best, &weights, anchored, &ctx.constraints);
            best_score = self.scorer.score_in(&best, &ctx);
        }

        debug!("weighted sampling best score {:.4}: {}", best_score, best);
        Candidate::from_set(best)
    }
}
