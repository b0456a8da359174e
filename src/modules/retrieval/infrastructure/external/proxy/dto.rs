// Wire models for the hosted search proxy

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::modules::query::domain::text_normalizer::decode_entities;
use crate::modules::retrieval::domain::entities::VideoResult;
use crate::shared::errors::{AppError, AppResult};

/// Current result row
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyVideo {
    #[serde(default)]
    pub video_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub channel_title: String,
    #[serde(default)]
    pub thumbnail_url: String,
    #[serde(default, deserialize_with = "lenient_count")]
    pub view_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub like_count: Option<u64>,
    #[serde(default)]
    pub published_at: String,
}

/// Row shape served by proxies deployed before the `results` field existed
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LegacyVideo {
    #[serde(default, alias = "videoId")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, alias = "channelTitle", alias = "channelName")]
    pub channel: String,
    #[serde(default, alias = "thumbnailUrl")]
    pub thumbnail: String,
    #[serde(default, alias = "viewCount", deserialize_with = "lenient_count")]
    pub views: Option<u64>,
    #[serde(default, alias = "likeCount", deserialize_with = "lenient_count")]
    pub likes: Option<u64>,
    #[serde(default, alias = "publishedAt", alias = "uploadDate")]
    pub published: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProxySearchResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub results: Option<Vec<ProxyVideo>>,
    #[serde(default)]
    pub videos: Option<Vec<LegacyVideo>>,
    #[serde(default)]
    pub error: Option<String>,
}

/// A proxy search answer after shape detection
#[derive(Debug, Clone, PartialEq)]
pub enum ProxySearchPayload {
    Results(Vec<ProxyVideo>),
    LegacyVideos(Vec<LegacyVideo>),
    Failure(String),
}

impl ProxySearchResponse {
    pub fn into_payload(self) -> AppResult<ProxySearchPayload> {
        if !self.success || self.error.is_some() {
            let message = self
                .error
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| "proxy reported failure without a message".to_string());
            return Ok(ProxySearchPayload::Failure(message));
        }

        match (self.results, self.videos) {
            (Some(results), _) => Ok(ProxySearchPayload::Results(results)),
            (None, Some(videos)) => Ok(ProxySearchPayload::LegacyVideos(videos)),
            (None, None) => Err(AppError::ValidationError(
                "Proxy search response has neither 'results' nor 'videos'".to_string(),
            )),
        }
    }
}

impl ProxySearchPayload {
    /// Canonical results, or the classified upstream failure.
    pub fn into_results(self) -> AppResult<Vec<VideoResult>> {
        match self {
            ProxySearchPayload::Results(rows) => {
                Ok(rows.into_iter().filter_map(ProxyVideo::into_result).collect())
            }
            ProxySearchPayload::LegacyVideos(rows) => {
                Ok(rows.into_iter().filter_map(LegacyVideo::into_result).collect())
            }
            ProxySearchPayload::Failure(message) => Err(classify_failure(None, &message)),
        }
    }
}

impl ProxyVideo {
    fn into_result(self) -> Option<VideoResult> {
        let video_id = Some(self.video_id.trim().to_string()).filter(|id| !id.is_empty())?;
        Some(VideoResult {
            video_id,
            title: decode_entities(&self.title),
            channel_title: decode_entities(&self.channel_title),
            thumbnail_url: self.thumbnail_url,
            view_count: self.view_count.unwrap_or(0),
            like_count: self.like_count,
            published_at: self.published_at,
        })
    }
}

impl LegacyVideo {
    fn into_result(self) -> Option<VideoResult> {
        let video_id = Some(self.id.trim().to_string()).filter(|id| !id.is_empty())?;
        Some(VideoResult {
            video_id,
            title: decode_entities(&self.title),
            channel_title: decode_entities(&self.channel),
            thumbnail_url: self.thumbnail,
            view_count: self.views.unwrap_or(0),
            like_count: self.likes,
            published_at: self.published,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeTitleRequest<'a> {
    pub product_title: &'a str,
    pub subtitle: Option<&'a str>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeTitleResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub optimized_title: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Quota signals become `QuotaExceeded`; anything else keeps its status
/// when one is known.
pub fn classify_failure(status: Option<u16>, message: &str) -> AppError {
    if AppError::looks_like_quota(status, message) {
        return AppError::QuotaExceeded(message.to_string());
    }
    match status {
        Some(status) => AppError::HttpStatus {
            status,
            message: message.to_string(),
        },
        None => AppError::ExternalServiceError(message.to_string()),
    }
}

/// Counts arrive as numbers or numeric strings depending on the deployment
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64().or_else(|| n.as_f64().map(|f| f.max(0.0) as u64)),
        Some(Value::String(s)) => s.trim().replace(',', "").parse().ok(),
        _ => None,
    })
}
