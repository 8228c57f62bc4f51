pub mod cache;
pub mod connectors;
pub mod provider;

pub use cache::{CacheKey, DrawCache};
pub use connectors::{CsvConnector, DatasetMetadata, DrawValidator};
pub use provider::{CachedHistoryProvider, HistoryProvider, InMemoryHistoryProvider};
