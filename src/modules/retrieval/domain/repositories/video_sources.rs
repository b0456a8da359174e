use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;

use crate::modules::retrieval::domain::entities::{SearchHit, VideoResult, VideoStatistics};
use crate::shared::errors::AppResult;

/// Body of a proxy product search
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxySearchRequest {
    pub product_title: String,
    pub subtitle: Option<String>,
    pub optimize_title: bool,
}

/// Hosted service that searches on the caller's behalf
///
/// Implementations normalize legacy and current response shapes and report
/// quota exhaustion as `AppError::QuotaExceeded`.
#[async_trait]
pub trait RemoteProxyClient: Send + Sync {
    async fn search_by_product(&self, request: &ProxySearchRequest) -> AppResult<Vec<VideoResult>>;
}

/// Video platform API used with the user's own credentials
///
/// Non-success responses come back as `AppError::HttpStatus` so the retry
/// layer can inspect the status code.
#[async_trait]
pub trait VideoSearchProvider: Send + Sync {
    async fn search_videos(
        &self,
        query: &str,
        api_key: &str,
        max_results: usize,
    ) -> AppResult<Vec<SearchHit>>;

    async fn fetch_statistics(
        &self,
        video_ids: &[String],
        api_key: &str,
    ) -> AppResult<HashMap<String, VideoStatistics>>;
}

/// AI rewrite of a marketing title into a search-friendly product name
#[async_trait]
pub trait TitleRewriter: Send + Sync {
    async fn rewrite_title(&self, title: &str, subtitle: Option<&str>) -> AppResult<String>;
}
