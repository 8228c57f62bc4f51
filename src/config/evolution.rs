use super::traits::{ensure_unit_interval, ConfigSection};
use crate::error::DrawbiasError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub generations: usize,
    pub mutation_rate: f64,
    pub elitism: usize,
    pub tournament_size: usize,
    /// Share of the initial population seeded by weighted sampling; the rest is uniform
    pub weighted_seed_fraction: f64,
    pub early_exit_fitness: f64,
    pub min_history: usize,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            generations: 50,
            mutation_rate: 0.3,
            elitism: 2,
            tournament_size: 3,
            weighted_seed_fraction: 0.8,
            early_exit_fitness: 0.99,
            min_history: 10,
        }
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<(), DrawbiasError> {
        if self.population_size < 2 {
            return Err(DrawbiasError::Configuration(
                "Population size must be at least 2".to_string(),
            ));
        }
        if self.elitism == 0 || self.elitism > self.population_size {
            return Err(DrawbiasError::Configuration(format!(
                "Elitism must be between 1 and the population size ({})",
                self.population_size
            )));
        }
        if self.tournament_size == 0 {
            return Err(DrawbiasError::Configuration(
                "Tournament size must be at least 1".to_string(),
            ));
        }
        ensure_unit_interval("evolution", "mutation_rate", self.mutation_rate)?;
        ensure_unit_interval("evolution", "weighted_seed_fraction", self.weighted_seed_fraction)?;
        Ok(())
    }
}
