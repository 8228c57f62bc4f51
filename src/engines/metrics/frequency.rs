use crate::ml::features::occurrence_counts;
use crate::types::{Draw, HistoryWindow, UNIVERSE_SIZE};
use serde::Serialize;

pub const DEFAULT_TOP: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NumberFrequency {
    pub number: u8,
    pub count: u32,
}

/// Most drawn numbers over a window plus the latest result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyReport {
    pub draws_examined: usize,
    pub most_drawn: Vec<NumberFrequency>,
    pub latest: Option<Draw>,
}

impl FrequencyReport {
    /// Top `top` numbers by count over the whole window, ties to the lower number.
    pub fn from_history(history: HistoryWindow<'_>, top: usize) -> Self {
        let counts = occurrence_counts(history, history.len());
        let mut ranked: Vec<NumberFrequency> = (1..=UNIVERSE_SIZE)
            .map(|number| NumberFrequency {
                number,
                count: counts[usize::from(number - 1)],
            })
            .collect();
        ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.number.cmp(&b.number)));
        ranked.truncate(top);

        Self {
            draws_examined: history.len(),
            most_drawn: ranked,
            latest: history.latest().cloned(),
        }
    }
}
