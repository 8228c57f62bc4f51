pub mod engine;
pub mod frequency;
pub mod hits;
pub mod profitability;

pub use engine::{BacktestMetrics, MetricsEngine};
pub use frequency::{FrequencyReport, NumberFrequency};
pub use hits::HitMetrics;
pub use profitability::ProfitabilityMetrics;
