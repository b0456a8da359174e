use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::modules::query::domain::query_builder::{ProductQueryBuilder, QueryVariantSet};
use crate::modules::query::domain::text_normalizer::normalize_whitespace;
use crate::modules::retrieval::domain::{
    entities::{rank_by_views, VideoResult},
    repositories::{ProxySearchRequest, RemoteProxyClient, TitleRewriter, VideoSearchProvider},
    value_objects::{DataSource, ProductSearchRequest, SearchSettings},
};
use crate::modules::retrieval::infrastructure::{
    cache::{InMemoryCacheStore, JsonFileCacheStore, RetrievalCache},
    external::{HttpProxyClient, YouTubeClient},
    http_client::{RetryPolicy, RetryableFetcher},
};
use crate::shared::config::ResolverConfig;
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::logger::{LogContext, TimedOperation};

/// Shown when neither source can be used
pub const SERVICE_UNAVAILABLE_MESSAGE: &str = "Video search service unavailable. Configure a YouTube API key in the settings to search with your own quota.";

/// Tunables for one orchestrator instance
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    pub proxy_timeout: Duration,
    pub provider_timeout: Duration,
    pub rewrite_timeout: Duration,
    pub cache_ttl: Duration,
    pub max_results: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            proxy_timeout: Duration::from_secs(20),
            provider_timeout: Duration::from_secs(15),
            rewrite_timeout: Duration::from_secs(10),
            cache_ttl: Duration::from_secs(24 * 3600),
            max_results: 10,
        }
    }
}

/// Product → review videos, across the hosted proxy and the user's own
/// YouTube credentials
///
/// Sources are tried in the order the caller's [`SourcePreference`] gives.
/// The direct path walks the query variants one at a time and stops at the
/// first that returns anything, so quota is not spent on redundant searches.
///
/// [`SourcePreference`]: crate::modules::retrieval::domain::value_objects::SourcePreference
pub struct SearchOrchestrator {
    provider: Arc<dyn VideoSearchProvider>,
    cache: RetrievalCache,
    proxy: Option<Arc<dyn RemoteProxyClient>>,
    title_rewriter: Option<Arc<dyn TitleRewriter>>,
    query_builder: ProductQueryBuilder,
    fetcher: RetryableFetcher,
    options: SearchOptions,
}

impl SearchOrchestrator {
    pub fn new(provider: Arc<dyn VideoSearchProvider>, cache: RetrievalCache) -> Self {
        Self {
            provider,
            cache,
            proxy: None,
            title_rewriter: None,
            query_builder: ProductQueryBuilder::new(),
            fetcher: RetryableFetcher::default(),
            options: SearchOptions::default(),
        }
    }

    /// Wires the real clients described by `config`.
    pub fn from_config(config: &ResolverConfig) -> AppResult<Self> {
        let cache = match &config.cache_file {
            Some(path) => RetrievalCache::new(Arc::new(JsonFileCacheStore::new(path))),
            None => RetrievalCache::new(Arc::new(InMemoryCacheStore::new())),
        };

        let mut orchestrator = Self::new(Arc::new(YouTubeClient::new()?), cache).with_options(
            SearchOptions {
                cache_ttl: config.cache_ttl,
                max_results: config.max_results,
                ..SearchOptions::default()
            },
        );

        if let Some(url) = &config.proxy_url {
            let proxy = Arc::new(HttpProxyClient::new(url)?);
            orchestrator = orchestrator
                .with_proxy(proxy.clone())
                .with_title_rewriter(proxy);
        }

        Ok(orchestrator)
    }

    pub fn with_proxy(mut self, proxy: Arc<dyn RemoteProxyClient>) -> Self {
        self.proxy = Some(proxy);
        self
    }

    pub fn with_title_rewriter(mut self, rewriter: Arc<dyn TitleRewriter>) -> Self {
        self.title_rewriter = Some(rewriter);
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.fetcher = RetryableFetcher::new(policy);
        self
    }

    pub fn with_query_builder(mut self, query_builder: ProductQueryBuilder) -> Self {
        self.query_builder = query_builder;
        self
    }

    pub fn with_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn cache(&self) -> &RetrievalCache {
        &self.cache
    }

    pub fn has_proxy(&self) -> bool {
        self.proxy.is_some()
    }

    /// Review videos for a product, most viewed first.
    ///
    /// An empty vector means a source was searched and found nothing. When no
    /// source can be reached and the caller has no credentials, the error is a
    /// `ConfigurationError` telling the user to add an API key.
    pub async fn resolve_product_videos(
        &self,
        request: &ProductSearchRequest,
        settings: &SearchSettings,
    ) -> AppResult<Vec<VideoResult>> {
        let title = request.title();
        if title.is_empty() {
            return Err(AppError::ValidationError(
                "Product title is empty; nothing to search for".to_string(),
            ));
        }

        let timer = TimedOperation::new("resolve_product_videos");
        let credentials = settings.credentials();
        let sources = settings
            .source_preference
            .source_order(self.proxy.is_some(), credentials.is_some());

        log::info!(
            "ORCHESTRATOR: Resolving '{}' via {:?} (preference: {})",
            title,
            sources,
            settings.source_preference
        );

        let mut direct_error = None;
        let mut last_error = None;

        for source in sources {
            let outcome = match (source, credentials) {
                (DataSource::RemoteProxy, _) => self.search_proxy(request, settings).await,
                (DataSource::DirectProvider, Some(api_key)) => {
                    self.search_direct(request, settings, api_key).await
                }
                (DataSource::DirectProvider, None) => continue,
            };

            match outcome {
                Ok(results) => {
                    LogContext::search_operation(title, Some(&source.to_string()), Some(results.len()));
                    timer.finish_with_info(&format!("{} results from {}", results.len(), source));
                    return Ok(results);
                }
                Err(error) => {
                    Self::log_source_failure(source, title, &error);
                    if source == DataSource::DirectProvider {
                        direct_error = Some(error.clone());
                    }
                    last_error = Some(error);
                }
            }
        }

        timer.finish_with_info("no source succeeded");

        match direct_error.or(last_error) {
            Some(error) if credentials.is_some() => Err(error),
            _ => Err(AppError::ConfigurationError(
                SERVICE_UNAVAILABLE_MESSAGE.to_string(),
            )),
        }
    }

    async fn search_proxy(
        &self,
        request: &ProductSearchRequest,
        settings: &SearchSettings,
    ) -> AppResult<Vec<VideoResult>> {
        let proxy = self.proxy.as_ref().ok_or_else(|| {
            AppError::ConfigurationError("No remote proxy configured".to_string())
        })?;

        let body = ProxySearchRequest {
            product_title: request.title().to_string(),
            subtitle: request.subtitle().map(str::to_string),
            optimize_title: settings.prefer_ai,
        };

        let mut results =
            with_deadline(self.options.proxy_timeout, proxy.search_by_product(&body)).await?;
        rank_by_views(&mut results);
        Ok(results)
    }

    async fn search_direct(
        &self,
        request: &ProductSearchRequest,
        settings: &SearchSettings,
        api_key: &str,
    ) -> AppResult<Vec<VideoResult>> {
        let (title, subtitle) = self.prepare_title(request, settings).await;
        let variants = self.variants_for(&title, subtitle.as_deref());

        let mut soft_error = None;
        for (index, query) in variants.iter().enumerate() {
            match self.search_variant(query, api_key, settings.bypass_cache).await {
                Ok(results) if !results.is_empty() => {
                    log::debug!(
                        "Variant {}/{} '{}' returned {} results",
                        index + 1,
                        variants.len(),
                        query,
                        results.len()
                    );
                    return Ok(results);
                }
                Ok(_) => log::debug!("Variant '{}' returned no results", query),
                Err(error) if error.is_soft_failure() => {
                    log::warn!("Variant '{}' failed, trying next: {}", query, error);
                    soft_error = Some(error);
                }
                Err(error) => return Err(error),
            }
        }

        match soft_error {
            Some(error) => Err(error),
            None => Ok(Vec::new()),
        }
    }

    /// Best-effort AI rewrite; the rewritten title replaces title and subtitle.
    /// The rewrite runs on the hosted service, so `CredentialsOnly` skips it.
    async fn prepare_title(
        &self,
        request: &ProductSearchRequest,
        settings: &SearchSettings,
    ) -> (String, Option<String>) {
        let title = request.title().to_string();
        let subtitle = request.subtitle().map(str::to_string);

        let rewriter = match &self.title_rewriter {
            Some(rewriter) if settings.prefer_ai && settings.source_preference.allows_proxy() => {
                rewriter
            }
            _ => return (title, subtitle),
        };

        match with_deadline(
            self.options.rewrite_timeout,
            rewriter.rewrite_title(&title, subtitle.as_deref()),
        )
        .await
        {
            Ok(rewritten) if !rewritten.trim().is_empty() => {
                log::info!("AI rewrote '{}' as '{}'", title, rewritten.trim());
                (rewritten.trim().to_string(), None)
            }
            Ok(_) => (title, subtitle),
            Err(error) => {
                log::debug!("AI title rewrite skipped: {}", error);
                (title, subtitle)
            }
        }
    }

    fn variants_for(&self, title: &str, subtitle: Option<&str>) -> Vec<String> {
        let variants: QueryVariantSet = self.query_builder.build_variants(title, subtitle);
        if variants.is_empty() {
            // every word was marketing noise; search for the title as typed
            return vec![normalize_whitespace(title)];
        }
        variants.as_slice().to_vec()
    }

    async fn search_variant(
        &self,
        query: &str,
        api_key: &str,
        bypass_cache: bool,
    ) -> AppResult<Vec<VideoResult>> {
        if !bypass_cache {
            if let Some(cached) = self.cache.get(query, self.options.cache_ttl).await {
                log::debug!("Serving '{}' from cache", query);
                return Ok(cached);
            }
        }

        let provider = self.provider.as_ref();
        let deadline = self.options.provider_timeout;
        let max_results = self.options.max_results;

        let hits = self
            .fetcher
            .execute("YouTube search", move || async move {
                with_deadline(deadline, provider.search_videos(query, api_key, max_results)).await
            })
            .await?;

        let ids: Vec<String> = hits.iter().filter_map(|hit| hit.video_id.clone()).collect();
        let statistics = if ids.is_empty() {
            HashMap::new()
        } else {
            let ids = ids.as_slice();
            match self
                .fetcher
                .execute("YouTube statistics", move || async move {
                    with_deadline(deadline, provider.fetch_statistics(ids, api_key)).await
                })
                .await
            {
                Ok(statistics) => statistics,
                Err(error) => {
                    log::warn!(
                        "Statistics lookup failed for '{}', ranking without view counts: {}",
                        query,
                        error
                    );
                    HashMap::new()
                }
            }
        };

        let mut results: Vec<VideoResult> = hits
            .into_iter()
            .filter_map(|hit| VideoResult::from_hit(hit, &statistics))
            .collect();
        rank_by_views(&mut results);

        if !results.is_empty() {
            self.cache.put(query, results.clone()).await;
        }
        Ok(results)
    }

    fn log_source_failure(source: DataSource, title: &str, error: &AppError) {
        match error {
            AppError::QuotaExceeded(_) => {
                log::info!("{} quota exhausted for '{}', falling back", source, title)
            }
            AppError::TimeoutError(_) => {
                log::warn!("{} timed out for '{}': {}", source, title, error)
            }
            _ => LogContext::error_with_context(error, &format!("{} failed for '{}'", source, title)),
        }
    }
}

async fn with_deadline<T, F>(deadline: Duration, operation: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    tokio::time::timeout(deadline, operation).await?
}
