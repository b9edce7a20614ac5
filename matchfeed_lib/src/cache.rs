//! Per-run memoization caches backed by `DashMap` for concurrent access.

use std::sync::Arc;

use dashmap::DashMap;

use crate::document::Document;

/// Key/value store used to avoid repeating network calls and parses within a run.
pub trait Cache<V>: Send + Sync {
    /// Returns the cached value for `key`, or `None` if absent.
    fn get(&self, key: &str) -> Option<V>;
    /// Stores `value` under `key`. Implementations may discard it.
    fn put(&self, key: String, value: V);
}

/// Thread-safe in-memory cache. Entries live until the cache is dropped or cleared.
pub struct MemoryCache<V> {
    store: DashMap<String, V>,
}

impl<V: Clone + Send + Sync> MemoryCache<V> {
    pub fn new() -> Self {
        Self {
            store: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Removes all entries from the cache.
    pub fn clear(&self) {
        self.store.clear();
    }
}

impl<V: Clone + Send + Sync> Default for MemoryCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone + Send + Sync> Cache<V> for MemoryCache<V> {
    fn get(&self, key: &str) -> Option<V> {
        self.store.get(key).map(|entry| entry.value().clone())
    }

    fn put(&self, key: String, value: V) {
        self.store.insert(key, value);
    }
}

/// Cache that never stores anything. Every lookup misses.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopCache;

impl<V> Cache<V> for NoopCache {
    fn get(&self, _key: &str) -> Option<V> {
        None
    }

    fn put(&self, _key: String, _value: V) {}
}

/// The two caches used by one pipeline run: URL → page content and
/// content → parsed document.
pub struct CrawlCache {
    pages: Box<dyn Cache<String>>,
    documents: Box<dyn Cache<Arc<Document>>>,
}

impl CrawlCache {
    pub fn new(pages: Box<dyn Cache<String>>, documents: Box<dyn Cache<Arc<Document>>>) -> Self {
        Self { pages, documents }
    }

    /// Fresh in-memory caches for a single run.
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryCache::new()), Box::new(MemoryCache::new()))
    }

    /// No memoization at all: every fetch hits the network and every payload is re-parsed.
    pub fn disabled() -> Self {
        Self::new(Box::new(NoopCache), Box::new(NoopCache))
    }

    pub fn pages(&self) -> &dyn Cache<String> {
        self.pages.as_ref()
    }

    pub fn documents(&self) -> &dyn Cache<Arc<Document>> {
        self.documents.as_ref()
    }
}
