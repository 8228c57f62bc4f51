use drawbias::ml::features::{missing_in_cycle, CycleTracker, FeatureEngine, Position};
use drawbias::types::{Draw, History, NumberSet};

fn draw(id: u32, numbers: impl IntoIterator<Item = u8>) -> Draw {
    let numbers: Vec<u8> = numbers.into_iter().collect();
    Draw::new(id, &numbers, "", Vec::new()).unwrap()
}

/// Fifteen draws; 25 first shows up in draw 10, closing the first cycle.
fn fixture() -> Vec<Draw> {
    let mut draws = vec![draw(1, 1..=15), draw(2, 10..=24)];
    for id in 3..=9 {
        let start = (id as u8 % 9) + 1;
        draws.push(draw(id, start..start + 15));
    }
    draws.push(draw(10, 11..=25));
    draws.push(draw(11, 1..=15));
    draws.push(draw(12, 2..=16));
    draws.push(draw(13, 1..=15));
    draws.push(draw(14, 3..=17));
    draws.push(draw(15, 1..=15));
    draws
}

fn missing_after(draws: &[Draw], id: u32) -> NumberSet {
    let history = History::from_draws(draws.iter().filter(|d| d.id() <= id).cloned().collect());
    missing_in_cycle(history.window())
}

#[test]
fn test_only_25_missing_before_closure() {
    let draws = fixture();
    for id in 2..=9 {
        assert_eq!(missing_after(&draws, id).to_vec(), vec![25], "after draw {}", id);
    }
}

#[test]
fn test_missing_is_empty_at_closing_draw() {
    let draws = fixture();
    assert!(missing_after(&draws, 10).is_empty());
}

#[test]
fn test_missing_counts_after_closure() {
    let draws = fixture();
    let expected = [(11, 10), (12, 9), (13, 9), (14, 8), (15, 8)];

    for (id, missing) in expected {
        let union = draws
            .iter()
            .filter(|d| d.id() > 10 && d.id() <= id)
            .fold(NumberSet::empty(), |acc, d| acc.union(d.numbers()));
        assert_eq!(25 - union.len(), missing);
        assert_eq!(missing_after(&draws, id).len(), missing, "after draw {}", id);
    }
    assert_eq!(missing_after(&draws, 15).to_vec(), (18..=25).collect::<Vec<u8>>());
}

#[test]
fn test_tracker_counts_closed_cycles() {
    let mut tracker = CycleTracker::new();
    for d in fixture() {
        tracker.push(&d);
    }
    assert_eq!(tracker.closed_cycles(), 1);
    assert_eq!(tracker.drawn().len(), 17);
}

#[test]
fn test_feature_flag_matches_missing_set() {
    let history = History::from_draws(fixture());
    let features = FeatureEngine::default().compute_all(history.window(), Position::Future);
    for n in 1..=25u8 {
        assert_eq!(features[usize::from(n - 1)].missing_in_cycle, n >= 18, "number {}", n);
    }
}
