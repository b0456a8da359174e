use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use super::dto::{SearchListResponse, VideoListResponse};
use super::mapper::YouTubeMapper;
use crate::modules::query::domain::text_normalizer::truncate_chars;
use crate::modules::retrieval::domain::{
    entities::{SearchHit, VideoStatistics},
    repositories::VideoSearchProvider,
};
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::logger::LogContext;

pub const YOUTUBE_API_BASE: &str = "https://www.googleapis.com/youtube/v3";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
/// Hard cap of the search endpoint's `maxResults`
const MAX_RESULTS_LIMIT: usize = 50;
const MAX_ERROR_BODY_CHARS: usize = 300;

/// YouTube Data API v3 client authenticated with the user's API key
pub struct YouTubeClient {
    client: Client,
    base_url: String,
}

impl YouTubeClient {
    pub fn new() -> AppResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                AppError::ConfigurationError(format!("Failed to create HTTP client: {}", e))
            })?;
        Ok(Self::with_client(client))
    }

    /// Create client with custom HTTP client (for testing)
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            base_url: YOUTUBE_API_BASE.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn search_url(&self, query: &str, api_key: &str, max_results: usize) -> String {
        format!(
            "{}/search?part=snippet&type=video&q={}&maxResults={}&key={}",
            self.base_url,
            urlencoding::encode(query),
            max_results.clamp(1, MAX_RESULTS_LIMIT),
            urlencoding::encode(api_key)
        )
    }

    fn statistics_url(&self, video_ids: &[String], api_key: &str) -> String {
        format!(
            "{}/videos?part=statistics&id={}&key={}",
            self.base_url,
            urlencoding::encode(&video_ids.join(",")),
            urlencoding::encode(api_key)
        )
    }

    /// Non-success statuses become `HttpStatus` so the retry layer can see them.
    async fn get<T: DeserializeOwned>(&self, endpoint: &str, url: &str) -> AppResult<T> {
        let started = Instant::now();
        let response = self.client.get(url).send().await?;
        let status = response.status();
        LogContext::api_call(
            "YouTube",
            endpoint,
            status.as_str(),
            Some(started.elapsed().as_millis() as u64),
        );

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = YouTubeMapper::error_message(&body)
                .unwrap_or_else(|| truncate_chars(body.trim(), MAX_ERROR_BODY_CHARS).to_string());
            return Err(AppError::HttpStatus {
                status: status.as_u16(),
                message: if message.is_empty() {
                    status.to_string()
                } else {
                    message
                },
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl VideoSearchProvider for YouTubeClient {
    async fn search_videos(
        &self,
        query: &str,
        api_key: &str,
        max_results: usize,
    ) -> AppResult<Vec<SearchHit>> {
        log::info!("YouTube: Searching for '{}' (limit: {})", query, max_results);

        let response: SearchListResponse =
            self.get("search", &self.search_url(query, api_key, max_results)).await?;
        let hits: Vec<SearchHit> = response
            .items
            .into_iter()
            .map(YouTubeMapper::map_search_item)
            .collect();

        log::info!("YouTube: Found {} results for '{}'", hits.len(), query);
        Ok(hits)
    }

    async fn fetch_statistics(
        &self,
        video_ids: &[String],
        api_key: &str,
    ) -> AppResult<HashMap<String, VideoStatistics>> {
        if video_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let response: VideoListResponse = self
            .get("videos", &self.statistics_url(video_ids, api_key))
            .await?;
        Ok(YouTubeMapper::map_statistics(response.items))
    }
}
