use drawbias::config::{EvolutionConfig, SamplingConfig};
use drawbias::engines::generation::{
    GenerationRecorder, GeneticSearchStrategy, LocalOptimizer, WeightedSamplingStrategy,
};
use drawbias::engines::scoring::{ScoringContext, ScoringFunction};
use drawbias::engines::strategies::random_set;
use drawbias::types::{Draw, History};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn random_history(n: u32, seed: u64) -> History {
    let mut rng = StdRng::seed_from_u64(seed);
    History::from_draws(
        (1..=n)
            .map(|id| Draw::new(id, &random_set(15, &mut rng).to_vec(), "", Vec::new()).unwrap())
            .collect(),
    )
}

fn create_test_evolution_config() -> EvolutionConfig {
    EvolutionConfig {
        population_size: 20,
        generations: 15,
        mutation_rate: 0.3,
        elitism: 2,
        tournament_size: 3,
        // never converge early so every generation is recorded
        early_exit_fitness: 2.0,
        ..EvolutionConfig::default()
    }
}

fn engine(config: EvolutionConfig) -> GeneticSearchStrategy {
    let scorer = ScoringFunction::default();
    let sampler = WeightedSamplingStrategy::new(SamplingConfig::default(), scorer.clone(), LocalOptimizer::default());
    GeneticSearchStrategy::new(config, sampler, scorer)
}

#[test]
fn test_best_fitness_never_decreases() {
    let history = random_history(80, 21);
    let engine = engine(create_test_evolution_config());

    for seed in 0..5 {
        let mut recorder = GenerationRecorder::new();
        let (best, fitness) = engine.evolve(history.window(), 15, &mut StdRng::seed_from_u64(seed), &mut recorder);

        assert_eq!(recorder.best_fitness.len(), 15);
        assert_eq!(recorder.started, 15);
        assert!(recorder.is_non_decreasing(), "seed {}: {:?}", seed, recorder.best_fitness);
        assert_eq!(best.len(), 15);
        assert!((fitness - recorder.best_fitness[14]).abs() < 1e-12);
    }
}

#[test]
fn test_result_passes_hard_constraints() {
    let history = random_history(100, 4);
    let engine = engine(create_test_evolution_config());
    let (best, _) = engine.evolve(history.window(), 16, &mut StdRng::seed_from_u64(1), &mut GenerationRecorder::new());

    let ctx = ScoringContext::from_history(history.window(), 16);
    assert!(ScoringFunction::default().evaluate(&best, &ctx).is_ok());
}

#[test]
fn test_early_exit_stops_after_first_generation() {
    let history = random_history(50, 2);
    let config = EvolutionConfig {
        early_exit_fitness: 0.0,
        ..create_test_evolution_config()
    };
    let mut recorder = GenerationRecorder::new();
    engine(config).evolve(history.window(), 15, &mut StdRng::seed_from_u64(3), &mut recorder);

    assert_eq!(recorder.best_fitness.len(), 1);
}
