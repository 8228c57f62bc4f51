use super::{random_candidate, top_valid, Strategy, StrategyId};
use crate::engines::generation::sampler::{WeightMap, WeightedSamplingStrategy};
use crate::types::{clamp_size, Candidate, HistoryWindow, UNIVERSE_SIZE};
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use std::cmp::Ordering;
use std::sync::Arc;

/// Votes across member strategies.
///
/// Each member sees the same window and gets its own RNG seeded from the
/// caller's RNG. Numbers are ranked by vote count, then by sampling weight,
/// then by the lower number, and the top of the ranking is repaired into the
/// hard constraints.
pub struct ConsensusCombiner {
    members: Vec<Arc<dyn Strategy>>,
    sampler: Arc<WeightedSamplingStrategy>,
}

impl ConsensusCombiner {
    pub fn new(members: Vec<Arc<dyn Strategy>>, sampler: Arc<WeightedSamplingStrategy>) -> Self {
        Self { members, sampler }
    }

    pub fn members(&self) -> impl Iterator<Item = StrategyId> + '_ {
        self.members.iter().map(|m| m.id())
    }

    /// Per-number vote counts; index `n - 1` holds number `n`.
    pub fn tally(&self, history: HistoryWindow<'_>, size: usize, rng: &mut dyn RngCore) -> Vec<u32> {
        let seeds: Vec<u64> = self.members.iter().map(|_| rng.next_u64()).collect();

        let candidates: Vec<Candidate> = self
            .members
            .par_iter()
            .zip(seeds.par_iter())
            .map(|(member, &seed)| {
                let mut member_rng = StdRng::seed_from_u64(seed);
                member.generate(history, size, &mut member_rng)
            })
            .collect();

        let mut votes = vec![0u32; usize::from(UNIVERSE_SIZE)];
        for candidate in &candidates {
            for &n in candidate.numbers() {
                votes[usize::from(n - 1)] += 1;
            }
        }
        votes
    }

    /// All 25 numbers by votes, then weight, then the lower number.
    pub fn rank(votes: &[u32], weights: &WeightMap) -> Vec<u8> {
        let mut ranked: Vec<(u8, u32, f64)> = (1..=UNIVERSE_SIZE)
            .map(|n| (n, votes.get(usize::from(n - 1)).copied().unwrap_or(0), weights.get(n)))
            .collect();
        ranked.sort_by(|a, b| {
            b.1.cmp(&a.1)
                .then_with(|| b.2.partial_cmp(&a.2).unwrap_or(Ordering::Equal))
                .then_with(|| a.0.cmp(&b.0))
        });
        ranked.into_iter().map(|(n, _, _)| n).collect()
    }
}

impl Strategy for ConsensusCombiner {
    fn id(&self) -> StrategyId {
        StrategyId::Consensus
    }

    fn generate(&self, history: HistoryWindow<'_>, size: usize, rng: &mut dyn RngCore) -> Candidate {
        let size = clamp_size(size);
        if self.members.is_empty() {
            warn!("consensus has no members; using random fallback");
            return random_candidate(size, rng);
        }

        let votes = self.tally(history, size, rng);
        let weights = self.sampler.build_weights(history);

        let ranked = Self::rank(&votes, &weights);

        let candidate = Candidate::from_set(top_valid(&ranked, size));
        debug!("consensus of {} members picked {}", self.members.len(), candidate);
        candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SamplingConfig;
    use crate::engines::generation::local_search::LocalOptimizer;
    use crate::engines::scoring::{HardConstraints, ScoringFunction};
    use crate::types::History;

    /// Always proposes the same numbers
    struct Fixed(Vec<u8>);

    impl Strategy for Fixed {
        fn id(&self) -> StrategyId {
            StrategyId::Markov
        }

        fn generate(&self, _history: HistoryWindow<'_>, _size: usize, _rng: &mut dyn RngCore) -> Candidate {
            Candidate::new(&self.0).unwrap()
        }
    }

    fn sampler() -> Arc<WeightedSamplingStrategy> {
        Arc::new(WeightedSamplingStrategy::new(
            SamplingConfig::default(),
            ScoringFunction::default(),
            LocalOptimizer::default(),
        ))
    }

    fn ticket() -> Vec<u8> {
        vec![1, 2, 4, 5, 7, 10, 11, 13, 14, 16, 18, 20, 22, 24, 25]
    }

    #[test]
    fn test_majority_wins() {
        let a = ticket();
        let b: Vec<u8> = vec![1, 3, 4, 6, 8, 9, 12, 13, 15, 17, 19, 21, 22, 23, 25];
        let combiner = ConsensusCombiner::new(
            vec![
                Arc::new(Fixed(a.clone())),
                Arc::new(Fixed(a.clone())),
                Arc::new(Fixed(b)),
            ],
            sampler(),
        );
        let history = History::default();
        let candidate = combiner.generate(history.window(), 15, &mut StdRng::seed_from_u64(1));
        assert_eq!(candidate.numbers(), a.as_slice());
    }

    #[test]
    fn test_ties_fall_back_to_lower_numbers() {
        let mut votes = vec![0u32; 25];
        for n in ticket() {
            votes[usize::from(n - 1)] = 1;
        }
        let ranked = ConsensusCombiner::rank(&votes, &WeightMap::uniform());
        let mut voted = ranked[..15].to_vec();
        voted.sort_unstable();
        assert_eq!(voted, ticket());
        // unvoted numbers follow in ascending order
        assert_eq!(ranked[15..], [3u8, 6, 8, 9, 12, 15, 17, 19, 21, 23]);
    }

    #[test]
    fn test_clustered_majority_is_repaired() {
        let low: Vec<u8> = (1..=15).collect();
        let combiner = ConsensusCombiner::new(
            vec![Arc::new(Fixed(low.clone())), Arc::new(Fixed(low))],
            sampler(),
        );
        let history = History::default();
        for size in [15, 17] {
            let candidate = combiner.generate(history.window(), size, &mut StdRng::seed_from_u64(1));
            assert_eq!(candidate.len(), size);
            assert_eq!(HardConstraints::for_size(size).check(candidate.set()), Ok(()));
        }
    }
}
