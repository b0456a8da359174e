use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::time::{Duration, Instant};

use super::dto::{
    classify_failure, OptimizeTitleRequest, OptimizeTitleResponse, ProxySearchPayload,
    ProxySearchResponse,
};
use crate::modules::extraction::domain::{entities::VideoContext, repositories::InferenceBackend};
use crate::modules::query::domain::text_normalizer::truncate_chars;
use crate::modules::retrieval::domain::{
    entities::VideoResult,
    repositories::{ProxySearchRequest, RemoteProxyClient, TitleRewriter},
};
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::logger::LogContext;

/// Backstop for requests whose caller sets no deadline of its own
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("review-resolver/", env!("CARGO_PKG_VERSION"));
const MAX_ERROR_BODY_CHARS: usize = 300;

/// HTTP client for the hosted search/inference proxy
pub struct HttpProxyClient {
    client: Client,
    base_url: String,
}

impl HttpProxyClient {
    pub fn new(base_url: impl Into<String>) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                AppError::ConfigurationError(format!("Failed to create HTTP client: {}", e))
            })?;
        Ok(Self::with_client(client, base_url))
    }

    /// Create client around an existing reqwest client (for testing)
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> AppResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path);
        let started = Instant::now();
        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();
        LogContext::api_call(
            "Proxy",
            path,
            status.as_str(),
            Some(started.elapsed().as_millis() as u64),
        );

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = if text.trim().is_empty() {
                status.to_string()
            } else {
                truncate_chars(text.trim(), MAX_ERROR_BODY_CHARS).to_string()
            };
            return Err(classify_failure(Some(status.as_u16()), &message));
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl RemoteProxyClient for HttpProxyClient {
    async fn search_by_product(&self, request: &ProxySearchRequest) -> AppResult<Vec<VideoResult>> {
        log::info!("Proxy: Searching videos for '{}'", request.product_title);

        let response: ProxySearchResponse = self.post_json("search-by-product", request).await?;
        let payload = response.into_payload()?;
        if matches!(payload, ProxySearchPayload::LegacyVideos(_)) {
            log::debug!("Proxy: Normalizing legacy 'videos' response");
        }

        let results = payload.into_results()?;
        log::info!(
            "Proxy: Found {} results for '{}'",
            results.len(),
            request.product_title
        );
        Ok(results)
    }
}

#[async_trait]
impl InferenceBackend for HttpProxyClient {
    async fn extract_products(&self, context: &VideoContext) -> AppResult<Value> {
        log::info!("Proxy: Extracting products for '{}'", context.video_title);
        self.post_json("extract-product", context).await
    }
}

#[async_trait]
impl TitleRewriter for HttpProxyClient {
    async fn rewrite_title(&self, title: &str, subtitle: Option<&str>) -> AppResult<String> {
        let request = OptimizeTitleRequest {
            product_title: title,
            subtitle,
        };
        let response: OptimizeTitleResponse = self.post_json("optimize-title", &request).await?;

        match response.optimized_title {
            Some(optimized) if response.success => Ok(optimized.trim().to_string()),
            _ => Err(classify_failure(
                None,
                response
                    .error
                    .as_deref()
                    .unwrap_or("title optimization returned no title"),
            )),
        }
    }
}
