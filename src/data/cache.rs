use crate::types::Draw;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Draw(u32),
    /// `count` draws ending at `anchor`
    Window { count: usize, anchor: u32 },
}

/// Bounded memo of provider answers
pub struct DrawCache {
    data: Mutex<HashMap<CacheKey, Vec<Draw>>>,
    capacity: usize,
}

impl DrawCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            data: Mutex::new(HashMap::with_capacity(capacity)),
            capacity: capacity.max(1),
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<Vec<Draw>> {
        let data = self.data.lock().unwrap_or_else(|e| e.into_inner());
        data.get(key).cloned()
    }

    pub fn set(&self, key: CacheKey, value: Vec<Draw>) {
        let mut data = self.data.lock().unwrap_or_else(|e| e.into_inner());
        if data.len() >= self.capacity && !data.contains_key(&key) {
            // A simple eviction strategy: clear the cache when full.
            data.clear();
        }
        data.insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.data.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
