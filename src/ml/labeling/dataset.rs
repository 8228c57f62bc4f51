use crate::ml::features::{FeatureEngine, FeatureVector, Position};
use crate::types::{HistoryWindow, UNIVERSE_SIZE};

/// One (draw, number) observation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabeledSample {
    pub number: u8,
    pub features: [f64; FeatureVector::LEN],
    /// The number was drawn at this position
    pub label: bool,
}

impl LabeledSample {
    pub fn target(&self) -> f64 {
        if self.label {
            1.0
        } else {
            0.0
        }
    }
}

/// Window indices usable as training targets, oldest first.
///
/// At most `count` of the newest positions, and only those with at least one
/// older draw to derive features from.
pub fn training_positions(history: HistoryWindow<'_>, count: usize) -> Vec<usize> {
    let usable = history.len().saturating_sub(1).min(count);
    (0..usable).rev().collect()
}

/// Samples for every number at every training position, oldest position first.
/// Features at position `i` only see draws older than `i`.
pub fn build_dataset(history: HistoryWindow<'_>, engine: &FeatureEngine, count: usize) -> Vec<LabeledSample> {
    let positions = training_positions(history, count);
    let mut samples = Vec::with_capacity(positions.len() * usize::from(UNIVERSE_SIZE));

    for index in positions {
        let Some(draw) = history.get(index) else {
            continue;
        };
        let features = engine.compute_all(history, Position::At(index));
        for (i, vector) in features.iter().enumerate() {
            let number = i as u8 + 1;
            samples.push(LabeledSample {
                number,
                features: vector.to_array(),
                label: draw.numbers().contains(number),
            });
        }
    }

    samples
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Draw, History};

    fn history(n: u32) -> History {
        History::from_draws(
            (1..=n)
                .map(|id| {
                    let start = (id % 11) as u8 + 1;
                    Draw::new(id, &(start..start + 15).collect::<Vec<u8>>(), "", Vec::new()).unwrap()
                })
                .collect(),
        )
    }

    #[test]
    fn test_positions_need_past_data() {
        let history = history(5);
        assert_eq!(training_positions(history.window(), 100), vec![3, 2, 1, 0]);
        assert_eq!(training_positions(history.window(), 2), vec![1, 0]);
        assert!(training_positions(History::default().window(), 10).is_empty());
    }

    #[test]
    fn test_dataset_labels_match_draws() {
        let history = history(12);
        let samples = build_dataset(history.window(), &FeatureEngine::default(), 4);
        assert_eq!(samples.len(), 4 * 25);

        // last block belongs to position 0, the newest draw
        let newest = history.window().latest().unwrap();
        let block = &samples[75..];
        for sample in block {
            assert_eq!(sample.label, newest.numbers().contains(sample.number));
        }
        assert_eq!(samples.iter().filter(|s| s.label).count(), 4 * 15);
    }
}
