use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::modules::retrieval::domain::{entities::CacheEntry, repositories::CacheStore};
use crate::shared::errors::AppResult;

/// Process-local store, lost on restart
#[derive(Debug, Default)]
pub struct InMemoryCacheStore {
    entries: DashMap<String, CacheEntry>,
}

impl InMemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn read(&self, key: &str) -> AppResult<Option<CacheEntry>> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    async fn write(&self, key: &str, entry: CacheEntry) -> AppResult<()> {
        self.entries.insert(key.to_string(), entry);
        Ok(())
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        self.entries.remove(key);
        Ok(())
    }

    async fn remove_if_stale(&self, key: &str, fetched_at: DateTime<Utc>) -> AppResult<bool> {
        Ok(self
            .entries
            .remove_if(key, |_, entry| entry.fetched_at == fetched_at)
            .is_some())
    }

    async fn clear(&self) -> AppResult<()> {
        self.entries.clear();
        Ok(())
    }

    async fn len(&self) -> AppResult<usize> {
        Ok(self.entries.len())
    }
}
