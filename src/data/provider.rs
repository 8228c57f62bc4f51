use super::cache::{CacheKey, DrawCache};
use super::connectors::CsvConnector;
use crate::error::Result;
use crate::types::{Draw, History};
use log::debug;
use std::path::Path;

/// Source of historical draws
pub trait HistoryProvider: Send + Sync {
    /// A single draw by id; `None` asks for the latest one.
    fn fetch(&self, id: Option<u32>) -> Result<Option<Draw>>;

    /// Up to `count` draws, newest first, with ids not above `anchor` (latest when `None`).
    fn fetch_window(&self, count: usize, anchor: Option<u32>) -> Result<Vec<Draw>>;

    fn fetch_history(&self, count: usize, anchor: Option<u32>) -> Result<History> {
        Ok(History::from_draws(self.fetch_window(count, anchor)?))
    }
}

/// Provider over draws already in memory, e.g. a loaded CSV file
#[derive(Debug, Clone, Default)]
pub struct InMemoryHistoryProvider {
    history: History,
}

impl InMemoryHistoryProvider {
    pub fn new(history: History) -> Self {
        Self { history }
    }

    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(CsvConnector::load_history(path)?))
    }

    pub fn history(&self) -> &History {
        &self.history
    }
}

impl HistoryProvider for InMemoryHistoryProvider {
    fn fetch(&self, id: Option<u32>) -> Result<Option<Draw>> {
        let draw = match id {
            Some(id) => self.history.find(id),
            None => self.history.window().latest(),
        };
        Ok(draw.cloned())
    }

    fn fetch_window(&self, count: usize, anchor: Option<u32>) -> Result<Vec<Draw>> {
        let draws = self.history.draws();
        let start = match anchor {
            Some(anchor) => draws.partition_point(|d| d.id() > anchor),
            None => 0,
        };
        Ok(draws.iter().skip(start).take(count).cloned().collect())
    }
}

/// Memoizes another provider. The latest draw is never cached since it moves.
pub struct CachedHistoryProvider<P> {
    inner: P,
    cache: DrawCache,
}

impl<P: HistoryProvider> CachedHistoryProvider<P> {
    pub fn new(inner: P, capacity: usize) -> Self {
        Self {
            inner,
            cache: DrawCache::new(capacity),
        }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    pub fn cache(&self) -> &DrawCache {
        &self.cache
    }
}

impl<P: HistoryProvider> HistoryProvider for CachedHistoryProvider<P> {
    fn fetch(&self, id: Option<u32>) -> Result<Option<Draw>> {
        let Some(id) = id else {
            return self.inner.fetch(None);
        };

        let key = CacheKey::Draw(id);
        if let Some(cached) = self.cache.get(&key) {
            debug!("draw {} served from cache", id);
            return Ok(cached.into_iter().next());
        }

        let draw = self.inner.fetch(Some(id))?;
        if let Some(draw) = &draw {
            self.cache.set(key, vec![draw.clone()]);
        }
        Ok(draw)
    }

    fn fetch_window(&self, count: usize, anchor: Option<u32>) -> Result<Vec<Draw>> {
        let Some(anchor) = anchor else {
            return self.inner.fetch_window(count, None);
        };

        let key = CacheKey::Window { count, anchor };
        if let Some(cached) = self.cache.get(&key) {
            debug!("window of {} ending at {} served from cache", count, anchor);
            return Ok(cached);
        }

        let draws = self.inner.fetch_window(count, Some(anchor))?;
        self.cache.set(key, draws.clone());
        Ok(draws)
    }
}
