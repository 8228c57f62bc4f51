use crate::types::{Draw, HistoryWindow, NumberSet};

/// Incremental cycle detector.
///
/// A cycle is the run of draws needed until every number of the universe has
/// appeared at least once. Draws must be pushed oldest first. When a draw
/// completes the universe the cycle is closed: the missing set is empty right
/// after that draw, and the next pushed draw starts a fresh cycle.
#[derive(Debug, Clone, Default)]
pub struct CycleTracker {
    drawn: NumberSet,
    closed_cycles: usize,
}

impl CycleTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, draw: &Draw) {
        if self.drawn.is_full() {
            self.drawn = NumberSet::empty();
        }
        self.drawn = self.drawn.union(draw.numbers());
        if self.drawn.is_full() {
            self.closed_cycles += 1;
        }
    }

    /// Numbers drawn since the last closure.
    pub fn drawn(&self) -> NumberSet {
        self.drawn
    }

    /// Numbers still "due" in the open cycle.
    pub fn missing(&self) -> NumberSet {
        self.drawn.complement()
    }

    pub fn closed_cycles(&self) -> usize {
        self.closed_cycles
    }
}

/// Missing set of the open cycle, computed over the whole window.
///
/// The window is newest first; it is walked in reverse so the tracker sees
/// draws in chronological order. The window itself is never reordered.
pub fn missing_in_cycle(history: HistoryWindow<'_>) -> NumberSet {
    let mut tracker = CycleTracker::new();
    for draw in history.iter().rev() {
        tracker.push(draw);
    }
    tracker.missing()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::History;

    fn draw(id: u32, numbers: &[u8]) -> Draw {
        Draw::new(id, numbers, "", Vec::new()).unwrap()
    }

    #[test]
    fn test_two_draws_close_cycle() {
        let mut tracker = CycleTracker::new();
        tracker.push(&draw(1, &(1..=15).collect::<Vec<u8>>()));
        assert_eq!(tracker.missing().to_vec(), (16..=25).collect::<Vec<u8>>());

        tracker.push(&draw(2, &(11..=25).collect::<Vec<u8>>()));
        assert!(tracker.missing().is_empty());
        assert_eq!(tracker.closed_cycles(), 1);

        tracker.push(&draw(3, &(1..=15).collect::<Vec<u8>>()));
        assert_eq!(tracker.missing().len(), 10);
    }

    #[test]
    fn test_window_is_processed_oldest_first() {
        // Newest draw (id 3) repeats 1..=15; the cycle closed at id 2.
        let history = History::from_draws(vec![
            draw(1, &(1..=15).collect::<Vec<u8>>()),
            draw(2, &(11..=25).collect::<Vec<u8>>()),
            draw(3, &(1..=15).collect::<Vec<u8>>()),
        ]);
        assert_eq!(
            missing_in_cycle(history.window()).to_vec(),
            (16..=25).collect::<Vec<u8>>()
        );
    }

    #[test]
    fn test_empty_window_has_everything_missing() {
        let history = History::default();
        assert!(missing_in_cycle(history.window()).is_full());
    }
}
