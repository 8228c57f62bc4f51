use drawbias::config::{AppConfig, BacktestingConfig};
use drawbias::engines::evaluation::BacktestHarness;
use drawbias::engines::generation::{LocalOptimizer, WeightedSamplingStrategy};
use drawbias::engines::metrics::MetricsEngine;
use drawbias::engines::scoring::ScoringFunction;
use drawbias::engines::strategies::{random_set, Strategy, StrategyId, StrategyRegistry};
use drawbias::types::{Candidate, Draw, History, HistoryWindow};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::sync::Arc;

/// Plays the most recent draw it is shown
struct RepeatLast;

impl Strategy for RepeatLast {
    fn id(&self) -> StrategyId {
        StrategyId::Markov
    }

    fn generate(&self, history: HistoryWindow<'_>, _size: usize, _rng: &mut dyn RngCore) -> Candidate {
        match history.latest() {
            Some(draw) => Candidate::from_set(*draw.numbers()),
            None => Candidate::from_set((1..=15).collect()),
        }
    }
}

fn random_history(n: u32, seed: u64) -> History {
    let mut rng = StdRng::seed_from_u64(seed);
    History::from_draws(
        (1..=n)
            .map(|id| Draw::new(id, &random_set(15, &mut rng).to_vec(), "", Vec::new()).unwrap())
            .collect(),
    )
}

/// Odd ids draw 1..=15, even ids draw 11..=25
fn alternating_history(n: u32) -> History {
    History::from_draws(
        (1..=n)
            .map(|id| {
                let numbers: Vec<u8> = if id % 2 == 1 { (1..=15).collect() } else { (11..=25).collect() };
                Draw::new(id, &numbers, "", Vec::new()).unwrap()
            })
            .collect(),
    )
}

fn sampler() -> Arc<dyn Strategy> {
    let mut config = AppConfig::default();
    config.sampling.max_attempts = 200;
    Arc::new(WeightedSamplingStrategy::new(
        config.sampling,
        ScoringFunction::default(),
        LocalOptimizer::new(20),
    ))
}

#[test]
fn test_short_history_simulates_nothing() {
    let history = random_history(20, 1);
    let config = AppConfig::default();
    let registry = StrategyRegistry::from_config(&config);
    let strategies = registry.resolve(&config.backtesting.strategies).unwrap();

    let harness = BacktestHarness::new(&config.backtesting, 15, 42);
    let stats = harness.run(history.window(), &strategies, 20);

    assert_eq!(stats.len(), strategies.len());
    for (id, s) in &stats {
        assert_eq!(s.games_simulated, 0, "{} should not have played", id);
        assert_eq!(s.total_cost, 0.0);
        assert_eq!(s.average_hits(), 0.0);
    }

    let summary = MetricsEngine::summarize_all(&stats);
    assert!(summary.values().all(|m| m.games == 0 && m.roi_pct.is_none()));
}

#[test]
fn test_training_never_contains_target() {
    let history = alternating_history(60);
    let harness = BacktestHarness::new(&BacktestingConfig::default(), 15, 7);
    let report = harness.run_detailed(history.window(), &[Arc::new(RepeatLast) as Arc<dyn Strategy>], 20);

    assert_eq!(report.records.len(), 20);
    for record in &report.records {
        // the previous draw shares exactly 11..=15 with the target
        assert_eq!(record.hits, 5, "target {} leaked into training", record.target_id);
    }
}

#[test]
fn test_stops_at_first_short_training_window() {
    let history = random_history(40, 3);
    let harness = BacktestHarness::new(&BacktestingConfig::default(), 15, 11);
    let stats = harness.run(history.window(), &[Arc::new(RepeatLast) as Arc<dyn Strategy>], 20);

    // targets 0..=9 keep at least 30 older draws
    assert_eq!(stats[&StrategyId::Markov].games_simulated, 10);
}

#[test]
fn test_same_seed_same_report() {
    let history = random_history(60, 5);
    let config = BacktestingConfig::default();
    let strategies = vec![sampler()];

    let first = BacktestHarness::new(&config, 15, 99).run_detailed(history.window(), &strategies, 20);
    let second = BacktestHarness::new(&config, 15, 99).run_detailed(history.window(), &strategies, 20);

    assert_eq!(first.records, second.records);
    assert_eq!(first.stats, second.stats);
    assert_eq!(first.stats[&StrategyId::WeightedSampling].games_simulated, 20);
}

#[test]
fn test_costs_follow_candidate_size() {
    let history = random_history(50, 8);
    let config = BacktestingConfig::default();
    let stats = BacktestHarness::new(&config, 16, 4).run(history.window(), &[sampler()], 5);

    let s = &stats[&StrategyId::WeightedSampling];
    assert_eq!(s.games_simulated, 5);
    let expected = 5.0 * config.payout.ticket_cost(16);
    assert!((s.total_cost - expected).abs() < 1e-9);
}
