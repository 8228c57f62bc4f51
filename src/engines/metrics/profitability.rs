use crate::engines::evaluation::AggregateStats;
use std::collections::HashMap;

pub struct ProfitabilityMetrics;

impl ProfitabilityMetrics {
    pub fn calculate(stats: &AggregateStats) -> HashMap<String, f64> {
        let mut metrics = HashMap::new();

        if stats.games_simulated == 0 {
            return metrics;
        }

        metrics.insert("total_prize".to_string(), stats.total_prize);
        metrics.insert("total_cost".to_string(), stats.total_cost);
        metrics.insert("net_result".to_string(), stats.net_result());

        // Return on money spent, in percent
        if stats.total_cost > 0.0 {
            let roi = stats.net_result() / stats.total_cost * 100.0;
            metrics.insert("roi_pct".to_string(), roi);
        }

        let prize_per_game = stats.total_prize / stats.games_simulated as f64;
        metrics.insert("prize_per_game".to_string(), prize_per_game);

        metrics
    }
}
