//! Bounded memoization of extraction results.
//!
//! An explicit LRU map behind a mutex, exposed as `get_or_compute`. Keys
//! are the exact raw description string; no normalization, so two inputs
//! differing only in whitespace are distinct entries.

use std::num::NonZeroUsize;
use std::sync::Mutex;

use lru::LruCache;

pub const DEFAULT_CAPACITY: usize = 1000;

pub struct ResultCache {
    inner: Mutex<LruCache<String, Vec<String>>>,
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl ResultCache {
    pub fn new(capacity: usize) -> ResultCache {
        let capacity = NonZeroUsize::new(capacity)
            .unwrap_or_else(|| NonZeroUsize::new(DEFAULT_CAPACITY).expect("nonzero"));
        ResultCache {
            inner: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Returns the cached value for `key`, or runs `compute` and stores the
    /// result. The lock is dropped while `compute` runs, so two concurrent
    /// misses on the same key may both compute; the structure itself stays
    /// consistent and last write wins.
    pub fn get_or_compute<E>(
        &self,
        key: &str,
        compute: impl FnOnce() -> Result<Vec<String>, E>,
    ) -> Result<Vec<String>, E> {
        if let Some(hit) = self.get(key) {
            log::debug!("cache hit for {} byte description", key.len());
            return Ok(hit);
        }

        let value = compute()?;
        self.insert(key.to_string(), value.clone());
        Ok(value)
    }

    pub fn get(&self, key: &str) -> Option<Vec<String>> {
        self.lock().get(key).cloned()
    }

    pub fn insert(&self, key: String, value: Vec<String>) {
        self.lock().put(key, value);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock().contains(key)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LruCache<String, Vec<String>>> {
        // A poisoned lock only means a panic elsewhere; the map itself is
        // still structurally sound.
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
