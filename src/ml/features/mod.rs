pub mod cycle;
pub mod engineer;
pub mod stats;

pub use cycle::{missing_in_cycle, CycleTracker};
pub use engineer::{draws_since, occurrence_counts, FeatureEngine, FeatureVector, Position};
pub use stats::{DynamicStats, MetricStats};
