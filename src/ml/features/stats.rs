use crate::types::{HistoryWindow, NumberSet, DRAW_SIZE};
use serde::{Deserialize, Serialize};

pub const PRIMES: [u8; 9] = [2, 3, 5, 7, 11, 13, 17, 19, 23];
/// Border of the 5x5 ticket grid
pub const FRAME: [u8; 16] = [1, 2, 3, 4, 5, 6, 10, 11, 15, 16, 20, 21, 22, 23, 24, 25];

/// Most recent draws used for the statistics
pub const STATS_SAMPLE: usize = 100;
/// Below this many draws the priors are used
pub const MIN_STATS_SAMPLE: usize = 10;
const MIN_STD_DEV: f64 = 0.5;

pub fn prime_set() -> NumberSet {
    NumberSet::from_numbers(PRIMES)
}

pub fn frame_set() -> NumberSet {
    NumberSet::from_numbers(FRAME)
}

pub fn odd_count(set: &NumberSet) -> usize {
    set.iter().filter(|n| n % 2 == 1).count()
}

pub fn prime_count(set: &NumberSet) -> usize {
    set.intersection(&prime_set()).len()
}

pub fn frame_count(set: &NumberSet) -> usize {
    set.intersection(&frame_set()).len()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricStats {
    pub mean: f64,
    pub std_dev: f64,
}

impl MetricStats {
    pub fn new(mean: f64, std_dev: f64) -> Self {
        Self {
            mean,
            std_dev: std_dev.max(MIN_STD_DEV),
        }
    }

    fn from_samples(values: &[f64]) -> Self {
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = if values.len() > 1 {
            values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)
        } else {
            0.0
        };
        Self::new(mean, variance.sqrt())
    }

    /// Gaussian closeness in (0, 1]; 1.0 at the mean.
    pub fn closeness(&self, value: f64) -> f64 {
        let z = value - self.mean;
        (-(z * z) / (2.0 * self.std_dev * self.std_dev)).exp()
    }
}

/// Shape statistics of recent draws
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DynamicStats {
    pub odd: MetricStats,
    pub sum: MetricStats,
    pub prime: MetricStats,
    pub frame: MetricStats,
    pub repeat: MetricStats,
    /// Draws the estimate is based on (0 when priors are used)
    pub sample_size: usize,
}

impl Default for DynamicStats {
    fn default() -> Self {
        Self {
            odd: MetricStats::new(8.0, 1.5),
            sum: MetricStats::new(195.0, 20.0),
            prime: MetricStats::new(5.4, 1.5),
            frame: MetricStats::new(9.6, 1.5),
            repeat: MetricStats::new(9.0, 1.6),
            sample_size: 0,
        }
    }
}

impl DynamicStats {
    pub fn from_history(history: HistoryWindow<'_>) -> Self {
        let sample = history.recent(STATS_SAMPLE);
        if sample.len() < MIN_STATS_SAMPLE {
            return Self::default();
        }

        let mut odd = Vec::with_capacity(sample.len());
        let mut sum = Vec::with_capacity(sample.len());
        let mut prime = Vec::with_capacity(sample.len());
        let mut frame = Vec::with_capacity(sample.len());
        let mut repeat = Vec::with_capacity(sample.len());

        for (i, draw) in sample.iter().enumerate() {
            let set = draw.numbers();
            odd.push(odd_count(set) as f64);
            sum.push(f64::from(set.sum()));
            prime.push(prime_count(set) as f64);
            frame.push(frame_count(set) as f64);
            // preceding draw may sit just outside the sample
            if let Some(previous) = history.get(i + 1) {
                repeat.push(set.intersection(previous.numbers()).len() as f64);
            }
        }

        let repeat = if repeat.is_empty() {
            Self::default().repeat
        } else {
            MetricStats::from_samples(&repeat)
        };

        Self {
            odd: MetricStats::from_samples(&odd),
            sum: MetricStats::from_samples(&sum),
            prime: MetricStats::from_samples(&prime),
            frame: MetricStats::from_samples(&frame),
            repeat,
            sample_size: sample.len(),
        }
    }

    /// Rescale 15-number statistics for a candidate of `size` numbers.
    pub fn scaled_for(&self, size: usize) -> Self {
        if size == DRAW_SIZE {
            return *self;
        }
        let factor = size as f64 / DRAW_SIZE as f64;
        let scale = |m: MetricStats| MetricStats::new(m.mean * factor, m.std_dev * factor.sqrt());
        Self {
            odd: scale(self.odd),
            sum: scale(self.sum),
            prime: scale(self.prime),
            frame: scale(self.frame),
            repeat: scale(self.repeat),
            sample_size: self.sample_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Draw, History};

    #[test]
    fn test_small_history_uses_priors() {
        let history = History::from_draws(
            (1..=5)
                .map(|id| Draw::new(id, &(1..=15).collect::<Vec<u8>>(), "", Vec::new()).unwrap())
                .collect(),
        );
        let stats = DynamicStats::from_history(history.window());
        assert_eq!(stats, DynamicStats::default());
        assert_eq!(stats.odd.mean, 8.0);
    }

    #[test]
    fn test_constant_history() {
        let history = History::from_draws(
            (1..=20)
                .map(|id| Draw::new(id, &(1..=15).collect::<Vec<u8>>(), "", Vec::new()).unwrap())
                .collect(),
        );
        let stats = DynamicStats::from_history(history.window());

        assert_eq!(stats.sample_size, 20);
        assert!((stats.sum.mean - 120.0).abs() < 1e-9);
        assert!((stats.odd.mean - 8.0).abs() < 1e-9);
        assert!((stats.repeat.mean - 15.0).abs() < 1e-9);
        // zero variance is floored
        assert_eq!(stats.sum.std_dev, 0.5);
    }

    #[test]
    fn test_shape_counts() {
        let set = NumberSet::from_numbers(1..=15);
        assert_eq!(odd_count(&set), 8);
        assert_eq!(prime_count(&set), 6);
        assert_eq!(frame_count(&set), 9);
    }

    #[test]
    fn test_closeness_peaks_at_mean() {
        let m = MetricStats::new(10.0, 2.0);
        assert!((m.closeness(10.0) - 1.0).abs() < 1e-12);
        assert!(m.closeness(12.0) < 1.0);
        assert!(m.closeness(14.0) < m.closeness(12.0));
    }

    #[test]
    fn test_scaled_for_larger_bets() {
        let stats = DynamicStats::default().scaled_for(18);
        assert!((stats.sum.mean - 195.0 * 1.2).abs() < 1e-9);
    }
}
