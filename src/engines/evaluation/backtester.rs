use super::payout::{PayoutMode, PayoutTable, MIN_PRIZE_TIER};
use crate::config::BacktestingConfig;
use crate::engines::strategies::{Strategy, StrategyId};
use crate::types::{clamp_size, Candidate, HistoryWindow, DRAW_SIZE};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Games per prize tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HitDistribution {
    pub eleven: u32,
    pub twelve: u32,
    pub thirteen: u32,
    pub fourteen: u32,
    pub fifteen: u32,
}

impl HitDistribution {
    /// Counts the game under its best tier; below 11 hits nothing is recorded.
    pub fn record(&mut self, hits: usize) {
        match hits.min(DRAW_SIZE) {
            11 => self.eleven += 1,
            12 => self.twelve += 1,
            13 => self.thirteen += 1,
            14 => self.fourteen += 1,
            15 => self.fifteen += 1,
            _ => {}
        }
    }

    pub fn get(&self, tier: u8) -> u32 {
        match tier {
            11 => self.eleven,
            12 => self.twelve,
            13 => self.thirteen,
            14 => self.fourteen,
            15 => self.fifteen,
            _ => 0,
        }
    }

    /// Games that reached any prize tier.
    pub fn winning_games(&self) -> u32 {
        (MIN_PRIZE_TIER..=DRAW_SIZE as u8).map(|t| self.get(t)).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregateStats {
    pub games_simulated: usize,
    pub total_hits: usize,
    pub hit_distribution: HitDistribution,
    pub total_prize: f64,
    pub total_cost: f64,
}

impl AggregateStats {
    fn record(&mut self, record: &SimulationRecord) {
        self.games_simulated += 1;
        self.total_hits += record.hits;
        self.hit_distribution.record(record.hits);
        self.total_prize += record.prize;
        self.total_cost += record.cost;
    }

    pub fn average_hits(&self) -> f64 {
        if self.games_simulated == 0 {
            0.0
        } else {
            self.total_hits as f64 / self.games_simulated as f64
        }
    }

    pub fn net_result(&self) -> f64 {
        self.total_prize - self.total_cost
    }
}

/// One strategy played against one target draw
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationRecord {
    pub target_id: u32,
    pub strategy: StrategyId,
    pub candidate: Candidate,
    pub hits: usize,
    pub prize: f64,
    pub cost: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BacktestReport {
    pub stats: BTreeMap<StrategyId, AggregateStats>,
    pub records: Vec<SimulationRecord>,
}

/// Walk-forward simulation: target `history[i]`, training `history[i+1 .. i+1+W]`.
pub struct BacktestHarness {
    training_window: usize,
    min_training: usize,
    candidate_size: usize,
    payout: PayoutTable,
    payout_mode: PayoutMode,
    seed: u64,
}

impl BacktestHarness {
    pub fn new(config: &BacktestingConfig, candidate_size: usize, seed: u64) -> Self {
        Self {
            training_window: config.training_window,
            min_training: config.min_training,
            candidate_size: clamp_size(candidate_size),
            payout: config.payout.clone(),
            payout_mode: config.payout_mode,
            seed,
        }
    }

    pub fn run(
        &self,
        history: HistoryWindow<'_>,
        strategies: &[Arc<dyn Strategy>],
        num_simulations: usize,
    ) -> BTreeMap<StrategyId, AggregateStats> {
        self.run_detailed(history, strategies, num_simulations).stats
    }

    pub fn run_detailed(
        &self,
        history: HistoryWindow<'_>,
        strategies: &[Arc<dyn Strategy>],
        num_simulations: usize,
    ) -> BacktestReport {
        let iterations = self.playable_iterations(history, num_simulations);
        if iterations < num_simulations {
            info!(
                "backtest: {} of {} targets have at least {} training draws",
                iterations, num_simulations, self.min_training
            );
        }

        // seeds fixed before the fan-out so parallel and sequential runs agree
        let mut seeder = StdRng::seed_from_u64(self.seed);
        let seeds: Vec<u64> = (0..iterations).map(|_| seeder.gen()).collect();

        let records: Vec<SimulationRecord> = seeds
            .par_iter()
            .enumerate()
            .map(|(i, &seed)| self.simulate(history, i, seed, strategies))
            .collect::<Vec<_>>()
            .into_iter()
            .flatten()
            .collect();

        let mut stats: BTreeMap<StrategyId, AggregateStats> = strategies
            .iter()
            .map(|s| (s.id(), AggregateStats::default()))
            .collect();
        for record in &records {
            stats.entry(record.strategy).or_default().record(record);
        }

        for (id, s) in &stats {
            info!(
                "backtest {}: {} games, avg hits {:.2}, prize {:.2}, cost {:.2}",
                id,
                s.games_simulated,
                s.average_hits(),
                s.total_prize,
                s.total_cost
            );
        }

        BacktestReport { stats, records }
    }

    /// Targets `0..n` whose training window is long enough; stops at the first short one.
    fn playable_iterations(&self, history: HistoryWindow<'_>, num_simulations: usize) -> usize {
        (0..num_simulations)
            .take_while(|&i| history.slice(i + 1, self.training_window).len() >= self.min_training.max(1))
            .count()
    }

    fn simulate(
        &self,
        history: HistoryWindow<'_>,
        index: usize,
        seed: u64,
        strategies: &[Arc<dyn Strategy>],
    ) -> Vec<SimulationRecord> {
        let Some(target) = history.get(index) else {
            return Vec::new();
        };
        // NO LEAKAGE: training starts strictly after the target
        let training = history.slice(index + 1, self.training_window);
        let mut rng = StdRng::seed_from_u64(seed);

        strategies
            .iter()
            .map(|strategy| {
                let mut strategy_rng = StdRng::seed_from_u64(rng.gen());
                let candidate = strategy.generate(training, self.candidate_size, &mut strategy_rng);
                let hits = candidate.hits(target);
                let prize = self.payout.prize(candidate.len(), hits, target, self.payout_mode);
                let cost = self.payout.ticket_cost(candidate.len());
                debug!("target {} {}: {} hits", target.id(), strategy.id(), hits);

                SimulationRecord {
                    target_id: target.id(),
                    strategy: strategy.id(),
                    candidate,
                    hits,
                    prize,
                    cost,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::strategies::random_set;
    use crate::types::{Draw, History};
    use rand::RngCore;

    /// Plays the newest training draw again
    struct RepeatLast;

    impl Strategy for RepeatLast {
        fn id(&self) -> StrategyId {
            StrategyId::Markov
        }

        fn generate(&self, history: HistoryWindow<'_>, size: usize, _rng: &mut dyn RngCore) -> Candidate {
            match history.latest() {
                Some(d) => Candidate::from_set(*d.numbers()),
                None => Candidate::from_set(random_set(size, &mut StdRng::seed_from_u64(0))),
            }
        }
    }

    fn history(n: u32) -> History {
        let mut rng = StdRng::seed_from_u64(17);
        History::from_draws(
            (1..=n)
                .map(|id| Draw::new(id, &random_set(15, &mut rng).to_vec(), "", Vec::new()).unwrap())
                .collect(),
        )
    }

    #[test]
    fn test_hit_distribution_tiers() {
        let mut d = HitDistribution::default();
        for hits in [9, 11, 11, 13, 15] {
            d.record(hits);
        }
        assert_eq!(d.eleven, 2);
        assert_eq!(d.thirteen, 1);
        assert_eq!(d.fifteen, 1);
        assert_eq!(d.winning_games(), 4);
    }

    #[test]
    fn test_records_use_previous_draw_only() {
        let history = history(60);
        let harness = BacktestHarness::new(&BacktestingConfig::default(), 15, 1);
        let strategies: Vec<Arc<dyn Strategy>> = vec![Arc::new(RepeatLast)];

        let report = harness.run_detailed(history.window(), &strategies, 20);
        assert_eq!(report.records.len(), 20);
        for (i, record) in report.records.iter().enumerate() {
            let target = history.window().get(i).unwrap();
            let previous = history.window().get(i + 1).unwrap();
            assert_eq!(record.target_id, target.id());
            assert_eq!(record.candidate.set(), previous.numbers());
            assert_eq!(record.hits, target.numbers().intersection(previous.numbers()).len());
        }
        assert_eq!(report.stats[&StrategyId::Markov].games_simulated, 20);
    }

    #[test]
    fn test_stops_when_training_runs_short() {
        // 40 draws: target i needs 30 training draws, so only i = 0..=9 qualify
        let history = history(40);
        let harness = BacktestHarness::new(&BacktestingConfig::default(), 15, 1);
        let strategies: Vec<Arc<dyn Strategy>> = vec![Arc::new(RepeatLast)];

        let stats = harness.run(history.window(), &strategies, 20);
        assert_eq!(stats[&StrategyId::Markov].games_simulated, 10);
        assert_eq!(stats[&StrategyId::Markov].total_cost, 10.0 * 3.5);
    }
}
