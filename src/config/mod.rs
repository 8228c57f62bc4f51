pub mod backtesting;
pub mod evolution;
pub mod manager;
pub mod ml;
pub mod sampling;
pub mod traits;

pub use backtesting::{BacktestingConfig, ConsensusConfig};
pub use evolution::EvolutionConfig;
pub use manager::{AppConfig, ConfigManager};
pub use ml::{ForestConfig, GradientConfig, MLConfig, MarkovConfig};
pub use sampling::{LocalSearchConfig, SamplingConfig};
pub use traits::ConfigSection;
