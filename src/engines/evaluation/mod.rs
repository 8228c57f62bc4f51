pub mod backtester;
pub mod payout;

pub use backtester::{AggregateStats, BacktestHarness, BacktestReport, HitDistribution, SimulationRecord};
pub use payout::{PayoutMode, PayoutTable};
