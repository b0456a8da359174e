use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::memory_store::InMemoryCacheStore;
use crate::modules::retrieval::domain::{
    entities::{CacheEntry, VideoResult},
    repositories::CacheStore,
};

/// Cache statistics for diagnostics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub entries_count: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        if self.hits + self.misses == 0 {
            0.0
        } else {
            self.hits as f64 / (self.hits + self.misses) as f64
        }
    }
}

/// Search-result cache keyed by normalized query text
///
/// Store failures are logged and reported as misses; the cache never fails
/// a search.
#[derive(Clone)]
pub struct RetrievalCache {
    store: Arc<dyn CacheStore>,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
    evictions: Arc<AtomicU64>,
}

impl RetrievalCache {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self {
            store,
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
            evictions: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryCacheStore::new()))
    }

    /// Trimmed, lowercased, runs of whitespace collapsed to one space
    pub fn cache_key(query: &str) -> String {
        let trimmed = query.trim();
        let mut key = String::with_capacity(trimmed.len());
        for word in trimmed.split_whitespace() {
            if !key.is_empty() {
                key.push(' ');
            }
            for ch in word.chars() {
                key.extend(ch.to_lowercase());
            }
        }
        key
    }

    /// Fresh results for `query`, or `None`. Expired entries are removed in
    /// the background.
    pub async fn get(&self, query: &str, ttl: Duration) -> Option<Vec<VideoResult>> {
        let key = Self::cache_key(query);

        let entry = match self.store.read(&key).await {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Cache read failed for '{}': {}", key, e);
                None
            }
        };

        match entry {
            Some(entry) if !entry.is_expired(ttl, Utc::now()) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!("Cache hit for key: {}", key);
                Some(entry.results)
            }
            Some(stale) => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!("Cache entry expired for key: {}", key);
                self.evict_in_background(key, stale.fetched_at);
                None
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!("Cache miss for key: {}", key);
                None
            }
        }
    }

    /// Stores `results` stamped with the current time, replacing any entry.
    pub async fn put(&self, query: &str, results: Vec<VideoResult>) {
        let key = Self::cache_key(query);
        let count = results.len();
        match self.store.write(&key, CacheEntry::new(results)).await {
            Ok(()) => debug!("Cached {} results for key: {}", count, key),
            Err(e) => warn!("Cache write failed for '{}': {}", key, e),
        }
    }

    pub async fn clear(&self) {
        if let Err(e) = self.store.clear().await {
            warn!("Cache clear failed: {}", e);
        }
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.evictions.store(0, Ordering::Relaxed);
        info!("Cache cleared");
    }

    pub async fn stats(&self) -> CacheStats {
        let entries_count = self.store.len().await.unwrap_or_else(|e| {
            warn!("Cache size lookup failed: {}", e);
            0
        });
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            entries_count,
        }
    }

    /// A write-through that lands before this task runs is left in place.
    fn evict_in_background(&self, key: String, fetched_at: DateTime<Utc>) {
        let store = self.store.clone();
        let evictions = self.evictions.clone();
        tokio::spawn(async move {
            match store.remove_if_stale(&key, fetched_at).await {
                Ok(true) => {
                    evictions.fetch_add(1, Ordering::Relaxed);
                    debug!("Removed expired cache entry for key: {}", key);
                }
                Ok(false) => debug!("Expired entry for key {} was refreshed, keeping it", key),
                Err(e) => warn!("Failed to evict expired entry '{}': {}", key, e),
            }
        });
    }
}

impl std::fmt::Debug for RetrievalCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetrievalCache")
            .field("hits", &self.hits.load(Ordering::Relaxed))
            .field("misses", &self.misses.load(Ordering::Relaxed))
            .finish()
    }
}
