use crate::engines::scoring::HardConstraints;
use crate::types::{NumberSet, MAX_CANDIDATE_SIZE};
use log::debug;
use rand::Rng;

/// Widest exchange tried by `repair`, in numbers swapped at once
const MAX_SWAP_WIDTH: usize = 3;
const MAX_REPAIR_STEPS: usize = 32;

/// Hill climbing by single swaps
#[derive(Debug, Clone, Copy)]
pub struct LocalOptimizer {
    pub iterations: usize,
}

impl Default for LocalOptimizer {
    fn default() -> Self {
        Self { iterations: 100 }
    }
}

impl LocalOptimizer {
    pub fn new(iterations: usize) -> Self {
        Self { iterations }
    }

    /// Swap one unpinned member for one outsider per iteration; keep strict improvements only.
    pub fn refine<F, R>(&self, start: NumberSet, fitness: F, pinned: NumberSet, rng: &mut R) -> (NumberSet, f64)
    where
        F: Fn(&NumberSet) -> f64,
        R: Rng + ?Sized,
    {
        let mut best = start;
        let mut best_fitness = fitness(&best);

        for _ in 0..self.iterations {
            let removable = best.difference(&pinned);
            let outsiders = best.complement();
            let (Some(out), Some(inn)) = (removable.choose(rng), outsiders.choose(rng)) else {
                break;
            };

            let mut trial = best;
            trial.remove(out);
            trial.insert(inn);

            let trial_fitness = fitness(&trial);
            if trial_fitness > best_fitness {
                best = trial;
                best_fitness = trial_fitness;
            }
        }

        (best, best_fitness)
    }
}

/// Pulls `start` back inside the hard constraints.
///
/// Each step applies the narrowest exchange of unpinned members for outsiders
/// that lowers the total violation, taking the largest reduction and, among
/// equals, the numbers ranked earliest in `ranked`. A valid `start` comes back
/// untouched. Gives up when no exchange of up to three numbers helps.
pub fn repair(start: NumberSet, ranked: &[u8], pinned: NumberSet, constraints: &HardConstraints) -> NumberSet {
    let mut rank = [MAX_CANDIDATE_SIZE; MAX_CANDIDATE_SIZE + 1];
    for (position, &n) in ranked.iter().enumerate() {
        if let Some(slot) = rank.get_mut(usize::from(n)) {
            *slot = (*slot).min(position);
        }
    }
    let cost = |set: &NumberSet| set.iter().map(|n| rank[usize::from(n)]).sum::<usize>();

    let mut current = start;
    let mut violation = constraints.violation(&current);

    for _ in 0..MAX_REPAIR_STEPS {
        if violation <= 0.0 {
            break;
        }
        let step = (1..=MAX_SWAP_WIDTH).find_map(|width| {
            best_exchange(current, pinned, width, constraints, &cost).filter(|(_, v)| *v < violation)
        });
        let Some((next, next_violation)) = step else {
            break;
        };
        current = next;
        violation = next_violation;
    }

    if violation > 0.0 {
        debug!("repair stopped {:.2} outside the constraints: {}", violation, current);
    }
    current
}

/// Lowest (violation, cost) among all exchanges of exactly `width` numbers.
fn best_exchange<F>(
    current: NumberSet,
    pinned: NumberSet,
    width: usize,
    constraints: &HardConstraints,
    cost: &F,
) -> Option<(NumberSet, f64)>
where
    F: Fn(&NumberSet) -> usize,
{
    let outgoing = subsets(current.difference(&pinned), width);
    let incoming = subsets(current.complement(), width);

    let mut best: Option<(NumberSet, f64, usize)> = None;
    for out in &outgoing {
        let base = current.difference(out);
        for inn in &incoming {
            let trial = base.union(inn);
            let violation = constraints.violation(&trial);
            let trial_cost = cost(&trial);
            let better = match &best {
                None => true,
                Some((_, v, c)) => violation < *v || (violation == *v && trial_cost < *c),
            };
            if better {
                best = Some((trial, violation, trial_cost));
            }
        }
    }

    best.map(|(set, violation, _)| (set, violation))
}

/// Every `width`-element subset of `pool`, in ascending lexicographic order.
fn subsets(pool: NumberSet, width: usize) -> Vec<NumberSet> {
    fn extend(members: &[u8], width: usize, chosen: NumberSet, out: &mut Vec<NumberSet>) {
        if width == 0 {
            out.push(chosen);
            return;
        }
        for (i, &n) in members.iter().enumerate() {
            if members.len() - i < width {
                break;
            }
            let mut next = chosen;
            next.insert(n);
            extend(&members[i + 1..], width - 1, next, out);
        }
    }

    let members = pool.to_vec();
    let mut out = Vec::new();
    if width <= members.len() {
        extend(&members, width, NumberSet::empty(), &mut out);
    }
    out
}
