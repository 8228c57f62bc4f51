use crate::engines::evaluation::payout::MIN_PRIZE_TIER;
use crate::engines::evaluation::AggregateStats;
use crate::types::DRAW_SIZE;
use std::collections::HashMap;

pub struct HitMetrics;

impl HitMetrics {
    pub fn calculate(stats: &AggregateStats) -> HashMap<String, f64> {
        let mut metrics = HashMap::new();

        if stats.games_simulated == 0 {
            return metrics;
        }

        let games = stats.games_simulated as f64;
        metrics.insert("games".to_string(), games);
        metrics.insert("avg_hits".to_string(), stats.average_hits());

        for tier in MIN_PRIZE_TIER..=DRAW_SIZE as u8 {
            let rate = f64::from(stats.hit_distribution.get(tier)) / games * 100.0;
            metrics.insert(format!("hit_rate_{}", tier), rate);
        }

        let win_rate = f64::from(stats.hit_distribution.winning_games()) / games * 100.0;
        metrics.insert("win_rate".to_string(), win_rate);

        metrics
    }
}
