use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::modules::retrieval::domain::entities::CacheEntry;
use crate::shared::errors::AppResult;

/// Durable key-value storage behind the retrieval cache
///
/// Keys arrive already normalized. Implementations need no locking beyond
/// their own consistency; concurrent writers to one key are last-writer-wins.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn read(&self, key: &str) -> AppResult<Option<CacheEntry>>;

    async fn write(&self, key: &str, entry: CacheEntry) -> AppResult<()>;

    async fn remove(&self, key: &str) -> AppResult<()>;

    /// Removes the entry only while it is still the one fetched at
    /// `fetched_at`; an entry rewritten in the meantime is kept. Returns
    /// whether anything was removed.
    async fn remove_if_stale(&self, key: &str, fetched_at: DateTime<Utc>) -> AppResult<bool>;

    async fn clear(&self) -> AppResult<()>;

    async fn len(&self) -> AppResult<usize>;
}
