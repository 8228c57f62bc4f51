use crate::types::NumberSet;
use rand::Rng;

/// Tournament selection: pick best of K random individuals
pub fn tournament_selection<R: Rng + ?Sized>(
    population: &[(NumberSet, f64)],
    tournament_size: usize,
    rng: &mut R,
) -> NumberSet {
    let mut best_idx = rng.gen_range(0..population.len());
    let mut best_fitness = population[best_idx].1;

    for _ in 1..tournament_size {
        let idx = rng.gen_range(0..population.len());
        if population[idx].1 > best_fitness {
            best_idx = idx;
            best_fitness = population[idx].1;
        }
    }

    population[best_idx].0
}

/// Uniform crossover over sets: the child keeps what both parents share and
/// fills up to `size` from the numbers only one parent has. Near-identical
/// parents (differing by at most one number) fill from the whole universe so
/// the population does not collapse.
pub fn crossover<R: Rng + ?Sized>(
    parent1: &NumberSet,
    parent2: &NumberSet,
    size: usize,
    rng: &mut R,
) -> NumberSet {
    let mut child = parent1.intersection(parent2);
    let differing = parent1.symmetric_difference(parent2);

    let mut pool = if differing.len() <= 1 {
        child.complement()
    } else {
        differing
    };

    while child.len() < size {
        let Some(n) = pool.choose(rng) else {
            // differing numbers ran out; widen to everything not yet chosen
            if pool == child.complement() {
                break;
            }
            pool = child.complement();
            continue;
        };
        pool.remove(n);
        child.insert(n);
    }

    child
}

/// Mutation: with probability `mutation_rate`, swap one member for one outsider
pub fn mutate<R: Rng + ?Sized>(individual: &mut NumberSet, mutation_rate: f64, rng: &mut R) {
    if rng.gen::<f64>() >= mutation_rate {
        return;
    }

    let outsiders = individual.complement();
    if let (Some(out), Some(inn)) = (individual.choose(rng), outsiders.choose(rng)) {
        individual.remove(out);
        individual.insert(inn);
    }
}
