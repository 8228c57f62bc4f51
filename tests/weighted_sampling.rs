use drawbias::config::SamplingConfig;
use drawbias::engines::generation::{LocalOptimizer, WeightedSamplingStrategy};
use drawbias::engines::scoring::ScoringFunction;
use drawbias::engines::strategies::Strategy;
use drawbias::types::{Draw, History};
use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::SeedableRng;

/// 100 draws that all contain 7; the other 14 numbers are a seeded random
/// pick from the remaining 24.
fn seven_everywhere(seed: u64) -> History {
    let mut rng = StdRng::seed_from_u64(seed);
    let others: Vec<u8> = (1..=25).filter(|&n| n != 7).collect();
    History::from_draws(
        (0..100u32)
            .map(|i| {
                let mut numbers = vec![7];
                numbers.extend(sample(&mut rng, others.len(), 14).iter().map(|j| others[j]));
                Draw::new(i + 1, &numbers, "", Vec::new()).unwrap()
            })
            .collect(),
    )
}

fn strategy() -> WeightedSamplingStrategy {
    let config = SamplingConfig {
        max_attempts: 300,
        ..SamplingConfig::default()
    };
    WeightedSamplingStrategy::new(config, ScoringFunction::default(), LocalOptimizer::new(30))
}

#[test]
fn test_constant_number_has_the_highest_weight() {
    let strategy = strategy();
    for seed in 0..20 {
        let history = seven_everywhere(seed);
        let weights = strategy.build_weights(history.window());

        let seven = weights.get(7);
        for (n, w) in weights.iter().filter(|(n, _)| *n != 7) {
            assert!(seven > w, "seed {}: weight(7) = {} not above weight({}) = {}", seed, seven, n, w);
        }
    }
}

#[test]
fn test_constant_number_is_always_played() {
    let strategy = strategy();
    for seed in 0..20 {
        let history = seven_everywhere(seed);
        assert_eq!(strategy.anchored_numbers(history.window(), 15).to_vec(), vec![7]);

        let mut rng = StdRng::seed_from_u64(seed);
        for size in [15, 18, 21] {
            let candidate = strategy.generate(history.window(), size, &mut rng);
            assert!(candidate.set().contains(7), "seed {} size {} dropped 7", seed, size);
            assert_eq!(candidate.len(), size);
        }
    }
}

#[test]
fn test_no_repeated_numbers() {
    let strategy = strategy();
    for seed in [3, 77] {
        let history = seven_everywhere(seed);
        let mut rng = StdRng::seed_from_u64(seed);

        for size in 15..=25 {
            let candidate = strategy.generate(history.window(), size, &mut rng);
            let mut numbers = candidate.numbers().to_vec();
            numbers.sort_unstable();
            numbers.dedup();
            assert_eq!(numbers.len(), size);
        }
    }
}
