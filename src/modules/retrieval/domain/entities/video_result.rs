use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A review video ready to show the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoResult {
    pub video_id: String,
    pub title: String,
    pub channel_title: String,
    pub thumbnail_url: String,
    pub view_count: u64,
    #[serde(default)]
    pub like_count: Option<u64>,
    pub published_at: String,
}

impl VideoResult {
    /// Merges a search hit with its statistics. Hits without an id are dropped.
    pub fn from_hit(hit: SearchHit, statistics: &HashMap<String, VideoStatistics>) -> Option<Self> {
        let video_id = hit.video_id.filter(|id| !id.trim().is_empty())?;
        let stats = statistics.get(&video_id).copied().unwrap_or_default();

        Some(Self {
            title: hit.title,
            channel_title: hit.channel_title,
            thumbnail_url: hit.thumbnail_url,
            view_count: stats.view_count,
            like_count: stats.like_count,
            published_at: hit.published_at,
            video_id,
        })
    }

    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.video_id)
    }
}

/// One row of a provider search response, before statistics are known
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchHit {
    pub video_id: Option<String>,
    pub title: String,
    pub channel_title: String,
    pub thumbnail_url: String,
    pub published_at: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VideoStatistics {
    pub view_count: u64,
    pub like_count: Option<u64>,
}

/// Most-watched first; ties keep provider order.
pub fn rank_by_views(results: &mut [VideoResult]) {
    results.sort_by(|a, b| b.view_count.cmp(&a.view_count));
}
