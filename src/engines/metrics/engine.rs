use crate::engines::evaluation::AggregateStats;
use crate::engines::metrics::{HitMetrics, ProfitabilityMetrics};
use crate::engines::strategies::StrategyId;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Summary of one strategy's backtest
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BacktestMetrics {
    pub games: usize,
    pub average_hits: f64,
    /// Percent of games per tier, keyed by hit count
    pub hit_rates: BTreeMap<u8, f64>,
    pub net_result: f64,
    /// `None` when nothing was spent
    pub roi_pct: Option<f64>,
}

pub struct MetricsEngine;

impl MetricsEngine {
    pub fn calculate_all(stats: &AggregateStats) -> HashMap<String, f64> {
        let mut all_metrics = HitMetrics::calculate(stats);
        all_metrics.extend(ProfitabilityMetrics::calculate(stats));
        all_metrics
    }

    pub fn summarize(stats: &AggregateStats) -> BacktestMetrics {
        let metrics = Self::calculate_all(stats);
        let hit_rates = (11..=15u8)
            .map(|tier| {
                let rate = metrics.get(&format!("hit_rate_{}", tier)).copied().unwrap_or(0.0);
                (tier, rate)
            })
            .collect();

        BacktestMetrics {
            games: stats.games_simulated,
            average_hits: stats.average_hits(),
            hit_rates,
            net_result: stats.net_result(),
            roi_pct: metrics.get("roi_pct").copied(),
        }
    }

    pub fn summarize_all(stats: &BTreeMap<StrategyId, AggregateStats>) -> BTreeMap<StrategyId, BacktestMetrics> {
        stats.iter().map(|(id, s)| (*id, Self::summarize(s))).collect()
    }
}
