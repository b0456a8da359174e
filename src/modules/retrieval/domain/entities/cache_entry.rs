use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::video_result::VideoResult;

/// Cached search results with their fetch time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub results: Vec<VideoResult>,
    pub fetched_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(results: Vec<VideoResult>) -> Self {
        Self::fetched_at(results, Utc::now())
    }

    pub fn fetched_at(results: Vec<VideoResult>, fetched_at: DateTime<Utc>) -> Self {
        Self {
            results,
            fetched_at,
        }
    }

    /// Expired once its age reaches the TTL. Timestamps in the future count
    /// as age zero.
    pub fn is_expired(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        let age = now
            .signed_duration_since(self.fetched_at)
            .to_std()
            .unwrap_or_default();
        age >= ttl
    }
}
