use super::operators::{crossover, mutate, tournament_selection};
use super::progress::{NoopProgressCallback, ProgressCallback};
use super::sampler::{sample_candidate, WeightMap, WeightedSamplingStrategy};
use crate::config::EvolutionConfig;
use crate::engines::scoring::{ScoringContext, ScoringFunction};
use crate::engines::strategies::{random_candidate, random_set, Strategy, StrategyId};
use crate::types::{clamp_size, Candidate, HistoryWindow, NumberSet};
use log::{debug, warn};
use rand::{Rng, RngCore};
use std::cmp::Ordering;

/// Genetic search over number sets, fitness = plausibility score
pub struct GeneticSearchStrategy {
    config: EvolutionConfig,
    sampler: WeightedSamplingStrategy,
    scorer: ScoringFunction,
}

impl GeneticSearchStrategy {
    pub fn new(config: EvolutionConfig, sampler: WeightedSamplingStrategy, scorer: ScoringFunction) -> Self {
        Self { config, sampler, scorer }
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    /// Run the evolution process and return the fittest individual of the
    /// final population together with its fitness.
    pub fn evolve<R, C>(
        &self,
        history: HistoryWindow<'_>,
        size: usize,
        rng: &mut R,
        callback: &mut C,
    ) -> (NumberSet, f64)
    where
        R: Rng + ?Sized,
        C: ProgressCallback + ?Sized,
    {
        let size = clamp_size(size);
        let ctx = ScoringContext::from_history(history, size);
        let weights = self.sampler.build_weights(history);
        let anchored = self.sampler.anchored_numbers(history, size);

        let mut population = self.initialize_population(&weights, anchored, size, rng);
        let mut evaluated = self.evaluate_population(&population, &ctx);
        let generations = self.config.generations.max(1);

        for generation in 0..generations {
            callback.on_generation_start(generation);
            if generation > 0 {
                evaluated = self.evaluate_population(&population, &ctx);
            }

            let best_fitness = evaluated.first().map(|(_, f)| *f).unwrap_or(0.0);
            callback.on_generation_complete(generation, best_fitness, evaluated.len());

            if best_fitness >= self.config.early_exit_fitness {
                debug!("genetic search converged at generation {}", generation + 1);
                break;
            }
            if generation + 1 == generations {
                break;
            }

            population = self.create_next_generation(&evaluated, size, rng);
        }

        evaluated
            .first()
            .copied()
            .unwrap_or_else(|| (random_set(size, rng), 0.0))
    }

    fn population_size(&self) -> usize {
        self.config.population_size.max(self.config.elitism).max(2)
    }

    fn initialize_population<R: Rng + ?Sized>(
        &self,
        weights: &WeightMap,
        anchored: NumberSet,
        size: usize,
        rng: &mut R,
    ) -> Vec<NumberSet> {
        let total = self.population_size();
        let weighted = ((total as f64) * self.config.weighted_seed_fraction).round() as usize;

        (0..total)
            .map(|i| {
                if i < weighted {
                    sample_candidate(weights, size, anchored, rng)
                } else {
                    random_set(size, rng)
                }
            })
            .collect()
    }

    /// Fitness of every individual, sorted best first.
    fn evaluate_population(&self, population: &[NumberSet], ctx: &ScoringContext) -> Vec<(NumberSet, f64)> {
        let mut evaluated: Vec<(NumberSet, f64)> = population
            .iter()
            .map(|set| (*set, self.scorer.score_in(set, ctx)))
            .collect();
        evaluated.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        evaluated
    }

    fn create_next_generation<R: Rng + ?Sized>(
        &self,
        evaluated: &[(NumberSet, f64)],
        size: usize,
        rng: &mut R,
    ) -> Vec<NumberSet> {
        let total = self.population_size();
        let mut next_generation: Vec<NumberSet> = evaluated
            .iter()
            .take(self.config.elitism)
            .map(|(set, _)| *set)
            .collect();

        while next_generation.len() < total {
            let parent1 = tournament_selection(evaluated, self.config.tournament_size, rng);
            let parent2 = tournament_selection(evaluated, self.config.tournament_size, rng);

            let mut child = crossover(&parent1, &parent2, size, rng);
            mutate(&mut child, self.config.mutation_rate, rng);
            next_generation.push(child);
        }

        next_generation
    }
}

impl Strategy for GeneticSearchStrategy {
    fn id(&self) -> StrategyId {
        StrategyId::Genetic
    }

    fn generate(&self, history: HistoryWindow<'_>, size: usize, rng: &mut dyn RngCore) -> Candidate {
        let size = clamp_size(size);
        if history.len() < self.config.min_history {
            warn!(
                "genetic search: {} draws available, {} required; using random fallback",
                history.len(),
                self.config.min_history
            );
            return random_candidate(size, rng);
        }

        let (mut best, mut fitness) = self.evolve(history, size, rng, &mut NoopProgressCallback);
        if fitness <= 0.0 {
            let ctx = ScoringContext::from_history(history, size);
            let weights = self.sampler.build_weights(history);
            let anchored = self.sampler.anchored_numbers(history, size);
            best = self.sampler.repair_candidate(best, &weights, anchored, &ctx.constraints);
            fitness = self.scorer.score_in(&best, &ctx);
        }
        debug!("genetic search best fitness {:.4}: {}", fitness, best);
        Candidate::from_set(best)
    }
}
