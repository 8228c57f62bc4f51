pub mod evolution_engine;
pub mod local_search;
pub mod operators;
pub mod progress;
pub mod sampler;

pub use evolution_engine::GeneticSearchStrategy;
pub use local_search::{repair, LocalOptimizer};
pub use progress::{ConsoleProgressCallback, GenerationRecorder, NoopProgressCallback, ProgressCallback};
pub use sampler::{sample_candidate, WeightMap, WeightedSamplingStrategy};
