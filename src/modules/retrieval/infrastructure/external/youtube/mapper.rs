use std::collections::HashMap;

use super::dto::{ErrorEnvelope, SearchItem, Thumbnails, VideoItem};
use crate::modules::query::domain::text_normalizer::decode_entities;
use crate::modules::retrieval::domain::entities::{SearchHit, VideoStatistics};

/// Converts YouTube payloads into domain types
pub struct YouTubeMapper;

impl YouTubeMapper {
    pub fn map_search_item(item: SearchItem) -> SearchHit {
        let video_id = item
            .id
            .video_id
            .filter(|_| item.id.kind.is_empty() || item.id.kind == "youtube#video");

        SearchHit {
            video_id,
            title: decode_entities(&item.snippet.title),
            channel_title: decode_entities(&item.snippet.channel_title),
            thumbnail_url: Self::best_thumbnail(&item.snippet.thumbnails),
            published_at: item.snippet.published_at,
        }
    }

    pub fn map_statistics(items: Vec<VideoItem>) -> HashMap<String, VideoStatistics> {
        items
            .into_iter()
            .map(|item| {
                let stats = VideoStatistics {
                    view_count: Self::parse_count(item.statistics.view_count.as_deref())
                        .unwrap_or(0),
                    like_count: Self::parse_count(item.statistics.like_count.as_deref()),
                };
                (item.id, stats)
            })
            .collect()
    }

    /// Human-readable error message from an API error body, when it has one
    pub fn error_message(body: &str) -> Option<String> {
        let envelope: ErrorEnvelope = serde_json::from_str(body).ok()?;
        let reasons: Vec<&str> = envelope
            .error
            .errors
            .iter()
            .map(|detail| detail.reason.as_str())
            .filter(|reason| !reason.is_empty())
            .collect();

        if reasons.is_empty() {
            Some(envelope.error.message)
        } else {
            Some(format!("{} ({})", envelope.error.message, reasons.join(", ")))
        }
    }

    fn best_thumbnail(thumbnails: &Thumbnails) -> String {
        thumbnails
            .high
            .as_ref()
            .or(thumbnails.medium.as_ref())
            .or(thumbnails.default.as_ref())
            .map(|t| t.url.clone())
            .unwrap_or_default()
    }

    fn parse_count(value: Option<&str>) -> Option<u64> {
        value.and_then(|v| v.trim().parse().ok())
    }
}
