use super::cycle::missing_in_cycle;
use crate::types::{HistoryWindow, UNIVERSE_SIZE};
use serde::{Deserialize, Serialize};

/// Where features are evaluated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Predict the next, not yet drawn result: the whole window is the past.
    Future,
    /// Describe the draw at this index: only strictly older draws are visible.
    At(usize),
}

/// Per-number features derived from the past of a given position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub freq_short: f64,
    pub freq_long: f64,
    pub delay: f64,
    pub in_previous: bool,
    pub missing_in_cycle: bool,
}

impl FeatureVector {
    pub const LEN: usize = 5;

    pub fn to_array(&self) -> [f64; Self::LEN] {
        [
            self.freq_short,
            self.freq_long,
            self.delay,
            if self.in_previous { 1.0 } else { 0.0 },
            if self.missing_in_cycle { 1.0 } else { 0.0 },
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureEngine {
    pub short_window: usize,
    pub long_window: usize,
    pub delay_cap: usize,
}

impl Default for FeatureEngine {
    fn default() -> Self {
        Self {
            short_window: 10,
            long_window: 50,
            delay_cap: 20,
        }
    }
}

impl FeatureEngine {
    pub fn new(short_window: usize, long_window: usize, delay_cap: usize) -> Self {
        Self {
            short_window: short_window.max(1),
            long_window: long_window.max(1),
            delay_cap: delay_cap.max(1),
        }
    }

    /// Features for a single number.
    pub fn compute(&self, history: HistoryWindow<'_>, position: Position, number: u8) -> FeatureVector {
        let idx = usize::from(number.clamp(1, UNIVERSE_SIZE) - 1);
        self.compute_all(history, position)[idx]
    }

    /// Features for every number; index `n - 1` holds number `n`.
    pub fn compute_all(&self, history: HistoryWindow<'_>, position: Position) -> Vec<FeatureVector> {
        let past = match position {
            Position::Future => history,
            Position::At(index) => history.older_than(index),
        };

        // NO LOOKAHEAD: everything below only reads `past`
        let short = occurrence_counts(past, self.short_window);
        let long = occurrence_counts(past, self.long_window);
        let short_len = past.len().min(self.short_window);
        let long_len = past.len().min(self.long_window);
        let missing = missing_in_cycle(past);
        let previous = past.latest().map(|d| *d.numbers()).unwrap_or_default();

        (1..=UNIVERSE_SIZE)
            .map(|n| {
                let i = usize::from(n - 1);
                FeatureVector {
                    freq_short: ratio(short[i], short_len),
                    freq_long: ratio(long[i], long_len),
                    delay: self.normalized_delay(past, n),
                    in_previous: previous.contains(n),
                    missing_in_cycle: missing.contains(n),
                }
            })
            .collect()
    }

    /// Draws since `number` last appeared, capped and scaled to [0, 1].
    pub fn normalized_delay(&self, past: HistoryWindow<'_>, number: u8) -> f64 {
        let delay = draws_since(past, number, self.delay_cap).unwrap_or(self.delay_cap);
        delay.min(self.delay_cap) as f64 / self.delay_cap as f64
    }
}

/// Occurrences of every number in the most recent `window` draws.
pub fn occurrence_counts(history: HistoryWindow<'_>, window: usize) -> [u32; UNIVERSE_SIZE as usize] {
    let mut counts = [0u32; UNIVERSE_SIZE as usize];
    for draw in history.recent(window).iter() {
        for n in draw.numbers().iter() {
            counts[usize::from(n - 1)] += 1;
        }
    }
    counts
}

/// Index of the most recent draw containing `number`, searching at most `limit` draws.
pub fn draws_since(history: HistoryWindow<'_>, number: u8, limit: usize) -> Option<usize> {
    history
        .iter()
        .take(limit)
        .position(|d| d.numbers().contains(number))
}

fn ratio(count: u32, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        f64::from(count) / total as f64
    }
}
