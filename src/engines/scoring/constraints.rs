use crate::ml::features::stats::{odd_count, prime_count, PRIMES};
use crate::types::{NumberSet, UNIVERSE_SIZE};
use thiserror::Error;

const UNIVERSE_MEAN: f64 = 13.0;
const UNIVERSE_VARIANCE: f64 = 52.0; // (25^2 - 1) / 12
const ODD_IN_UNIVERSE: f64 = 13.0;

const SUM_TOLERANCE: f64 = 1.5;
const COUNT_TOLERANCE: f64 = 2.0;
const MAX_GAP: u8 = 5;
const SUM_VIOLATION_SCALE: f64 = 10.0;

/// Thirds of the range used for the coverage check
pub const THIRDS: [(u8, u8); 3] = [(1, 8), (9, 17), (18, 25)];

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConstraintViolation {
    #[error("sum {value} outside {min}..={max}")]
    Sum { value: u32, min: u32, max: u32 },

    #[error("odd count {value} outside {min}..={max}")]
    Odd { value: usize, min: usize, max: usize },

    #[error("prime count {value} outside {min}..={max}")]
    Prime { value: usize, min: usize, max: usize },

    #[error("run of {length} consecutive numbers exceeds {max}")]
    Run { length: usize, max: usize },

    #[error("range {low}..={high} holds {count} numbers, minimum {min}")]
    Coverage { low: u8, high: u8, count: usize, min: usize },

    #[error("gap from {from} to {to} is too wide")]
    Gap { from: u8, to: u8 },
}

/// Plausibility bands for a candidate of a given size
#[derive(Debug, Clone, PartialEq)]
pub struct HardConstraints {
    pub size: usize,
    pub sum: (u32, u32),
    pub odd: (usize, usize),
    pub prime: (usize, usize),
    pub max_run: usize,
    pub min_per_third: usize,
    pub max_gap: u8,
}

impl HardConstraints {
    /// Bands follow the hypergeometric distribution of a random `size`-subset.
    pub fn for_size(size: usize) -> Self {
        let n = f64::from(UNIVERSE_SIZE);
        let m = size.min(usize::from(UNIVERSE_SIZE)) as f64;
        let finite = if n > 1.0 { m * (n - m) / (n - 1.0) } else { 0.0 };

        let sum_mean = m * UNIVERSE_MEAN;
        let sum_sd = (finite * UNIVERSE_VARIANCE).sqrt();

        let count_band = |members: f64| {
            let p = members / n;
            let mean = m * p;
            let sd = (finite * p * (1.0 - p)).sqrt();
            (
                (mean - COUNT_TOLERANCE * sd).round().max(0.0) as usize,
                (mean + COUNT_TOLERANCE * sd).round() as usize,
            )
        };

        let holes = usize::from(UNIVERSE_SIZE).saturating_sub(size);
        let tightest_run = size.div_ceil(holes + 1);

        Self {
            size,
            sum: (
                (sum_mean - SUM_TOLERANCE * sum_sd).round() as u32,
                (sum_mean + SUM_TOLERANCE * sum_sd).round() as u32,
            ),
            odd: count_band(ODD_IN_UNIVERSE),
            prime: count_band(PRIMES.len() as f64),
            max_run: (tightest_run + 1).max(3),
            min_per_third: size / 5,
            max_gap: MAX_GAP,
        }
    }

    /// First violated constraint, in evaluation order.
    pub fn check(&self, set: &NumberSet) -> Result<(), ConstraintViolation> {
        let sum = set.sum();
        if sum < self.sum.0 || sum > self.sum.1 {
            return Err(ConstraintViolation::Sum {
                value: sum,
                min: self.sum.0,
                max: self.sum.1,
            });
        }

        let odd = odd_count(set);
        if odd < self.odd.0 || odd > self.odd.1 {
            return Err(ConstraintViolation::Odd {
                value: odd,
                min: self.odd.0,
                max: self.odd.1,
            });
        }

        let primes = prime_count(set);
        if primes < self.prime.0 || primes > self.prime.1 {
            return Err(ConstraintViolation::Prime {
                value: primes,
                min: self.prime.0,
                max: self.prime.1,
            });
        }

        let run = longest_run(set);
        if run > self.max_run {
            return Err(ConstraintViolation::Run {
                length: run,
                max: self.max_run,
            });
        }

        for (low, high) in THIRDS {
            let count = set.iter().filter(|n| (low..=high).contains(n)).count();
            if count < self.min_per_third {
                return Err(ConstraintViolation::Coverage {
                    low,
                    high,
                    count,
                    min: self.min_per_third,
                });
            }
        }

        let numbers = set.to_vec();
        if let Some(pair) = numbers.windows(2).find(|w| w[1] - w[0] > self.max_gap) {
            return Err(ConstraintViolation::Gap {
                from: pair[0],
                to: pair[1],
            });
        }

        Ok(())
    }

    /// Total distance outside the bands, summed over every constraint.
    /// Exactly 0.0 when `check` passes. Sum excess counts one unit per ten.
    pub fn violation(&self, set: &NumberSet) -> f64 {
        let mut total = excess(f64::from(set.sum()), self.sum.0 as f64, self.sum.1 as f64) / SUM_VIOLATION_SCALE;
        total += excess(odd_count(set) as f64, self.odd.0 as f64, self.odd.1 as f64);
        total += excess(prime_count(set) as f64, self.prime.0 as f64, self.prime.1 as f64);

        let mut current = 0usize;
        for n in 1..=UNIVERSE_SIZE + 1 {
            if n <= UNIVERSE_SIZE && set.contains(n) {
                current += 1;
            } else {
                total += current.saturating_sub(self.max_run) as f64;
                current = 0;
            }
        }

        for (low, high) in THIRDS {
            let count = set.iter().filter(|n| (low..=high).contains(n)).count();
            total += self.min_per_third.saturating_sub(count) as f64;
        }

        let numbers = set.to_vec();
        total += numbers
            .windows(2)
            .map(|w| f64::from((w[1] - w[0]).saturating_sub(self.max_gap)))
            .sum::<f64>();

        total
    }
}

fn excess(value: f64, low: f64, high: f64) -> f64 {
    if value < low {
        low - value
    } else if value > high {
        value - high
    } else {
        0.0
    }
}

pub fn longest_run(set: &NumberSet) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for n in 1..=UNIVERSE_SIZE {
        if set.contains(n) {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(numbers: &[u8]) -> NumberSet {
        NumberSet::from_numbers(numbers.iter().copied())
    }

    #[test]
    fn test_bands_for_fifteen() {
        let c = HardConstraints::for_size(15);
        assert_eq!(c.sum, (168, 222));
        assert_eq!(c.odd, (5, 10));
        assert_eq!(c.prime, (3, 8));
        assert_eq!(c.max_run, 3);
        assert_eq!(c.min_per_third, 3);
    }

    #[test]
    fn test_full_universe_is_consistent() {
        let c = HardConstraints::for_size(25);
        assert_eq!(c.check(&NumberSet::full()), Ok(()));
    }

    #[test]
    fn test_plausible_ticket_passes() {
        // sum 192, 8 odd, 5 primes, runs of at most 3
        let ticket = set(&[1, 2, 4, 5, 7, 10, 11, 13, 14, 16, 18, 20, 22, 24, 25]);
        let c = HardConstraints::for_size(15);
        assert_eq!(c.check(&ticket), Ok(()));
    }

    #[test]
    fn test_low_block_fails_on_sum() {
        let c = HardConstraints::for_size(15);
        let low = set(&(1..=15).collect::<Vec<u8>>());
        assert!(matches!(c.check(&low), Err(ConstraintViolation::Sum { .. })));
    }

    #[test]
    fn test_long_run_detected() {
        let c = HardConstraints::for_size(15);
        // sum 191, odd 8, primes 5, but 9..=13 is a run of 5
        let ticket = set(&[1, 3, 4, 6, 9, 10, 11, 12, 13, 16, 18, 20, 22, 23, 24]);
        assert_eq!(longest_run(&ticket), 5);
        assert!(matches!(c.check(&ticket), Err(ConstraintViolation::Run { .. })));
    }

    #[test]
    fn test_violation_is_zero_exactly_when_valid() {
        use rand::rngs::StdRng;
        use rand::seq::index::sample;
        use rand::SeedableRng;

        let mut rng = StdRng::seed_from_u64(41);
        for size in 15..=25 {
            let c = HardConstraints::for_size(size);
            for _ in 0..200 {
                let picked: NumberSet = sample(&mut rng, 25, size).iter().map(|i| i as u8 + 1).collect();
                assert_eq!(c.violation(&picked) == 0.0, c.check(&picked).is_ok(), "{}", picked);
            }
        }
    }

    #[test]
    fn test_violation_grows_with_distance() {
        let c = HardConstraints::for_size(15);
        // sum 120 is 48 below the band, 1..=15 is one run of 15
        let low = set(&(1..=15).collect::<Vec<u8>>());
        let shifted = set(&(2..=16).collect::<Vec<u8>>());
        assert!(c.violation(&low) > c.violation(&shifted));
        assert!(c.violation(&shifted) > 0.0);
    }

    #[test]
    fn test_gap_detected() {
        let c = HardConstraints { max_run: 25, min_per_third: 0, ..HardConstraints::for_size(15) };
        // 9 -> 16 leaves six numbers out
        let ticket = set(&[1, 2, 4, 5, 7, 9, 16, 17, 19, 20, 21, 22, 23, 24, 25]);
        assert!(matches!(c.check(&ticket), Err(ConstraintViolation::Gap { from: 9, to: 16 })));
    }
}
