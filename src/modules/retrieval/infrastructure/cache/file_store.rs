//! JSON-file cache store.
//!
//! The whole map lives in one document that is rewritten on every change.
//! Fine for the few hundred queries a single user produces in a day.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::modules::retrieval::domain::{entities::CacheEntry, repositories::CacheStore};
use crate::shared::errors::AppResult;

type CacheDocument = HashMap<String, CacheEntry>;

#[derive(Debug)]
pub struct JsonFileCacheStore {
    path: PathBuf,
    // serializes read-modify-write cycles within this process
    lock: Mutex<()>,
}

impl JsonFileCacheStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> AppResult<CacheDocument> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(CacheDocument::new()),
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(document) => Ok(document),
                Err(e) => {
                    warn!(
                        "Cache file {} is corrupt ({}), starting empty",
                        self.path.display(),
                        e
                    );
                    Ok(CacheDocument::new())
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(CacheDocument::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, document: &CacheDocument) -> AppResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let bytes = serde_json::to_vec(document)?;
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!(
            "Wrote {} cache entries to {}",
            document.len(),
            self.path.display()
        );
        Ok(())
    }
}

#[async_trait]
impl CacheStore for JsonFileCacheStore {
    async fn read(&self, key: &str) -> AppResult<Option<CacheEntry>> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.remove(key))
    }

    async fn write(&self, key: &str, entry: CacheEntry) -> AppResult<()> {
        let _guard = self.lock.lock().await;
        let mut document = self.load().await?;
        document.insert(key.to_string(), entry);
        self.save(&document).await
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        let _guard = self.lock.lock().await;
        let mut document = self.load().await?;
        if document.remove(key).is_some() {
            self.save(&document).await?;
        }
        Ok(())
    }

    async fn remove_if_stale(&self, key: &str, fetched_at: DateTime<Utc>) -> AppResult<bool> {
        let _guard = self.lock.lock().await;
        let mut document = self.load().await?;
        match document.get(key) {
            Some(entry) if entry.fetched_at == fetched_at => {
                document.remove(key);
                self.save(&document).await?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn clear(&self) -> AppResult<()> {
        let _guard = self.lock.lock().await;
        self.save(&CacheDocument::new()).await
    }

    async fn len(&self) -> AppResult<usize> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.len())
    }
}
