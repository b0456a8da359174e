/// Hand-written fakes for the outbound ports
use async_trait::async_trait;
use review_resolver::modules::extraction::domain::{entities::VideoContext, InferenceBackend};
use review_resolver::modules::retrieval::domain::{
    entities::{SearchHit, VideoResult, VideoStatistics},
    repositories::{ProxySearchRequest, RemoteProxyClient, TitleRewriter, VideoSearchProvider},
};
use review_resolver::shared::errors::{AppError, AppResult};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

/// YouTube stand-in that answers from a script, one entry per search call
#[derive(Default)]
pub struct ScriptedProvider {
    script: Mutex<VecDeque<AppResult<Vec<SearchHit>>>>,
    views: HashMap<String, u64>,
    statistics_error: Option<AppError>,
    pub queries: Mutex<Vec<String>>,
    pub api_keys: Mutex<Vec<String>>,
    pub statistics_calls: Mutex<usize>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(self, response: AppResult<Vec<SearchHit>>) -> Self {
        self.script.lock().unwrap().push_back(response);
        self
    }

    pub fn with_views(mut self, id: &str, views: u64) -> Self {
        self.views.insert(id.to_string(), views);
        self
    }

    pub fn failing_statistics(mut self, error: AppError) -> Self {
        self.statistics_error = Some(error);
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    pub fn search_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

#[async_trait]
impl VideoSearchProvider for ScriptedProvider {
    async fn search_videos(
        &self,
        query: &str,
        api_key: &str,
        _max_results: usize,
    ) -> AppResult<Vec<SearchHit>> {
        self.queries.lock().unwrap().push(query.to_string());
        self.api_keys.lock().unwrap().push(api_key.to_string());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn fetch_statistics(
        &self,
        video_ids: &[String],
        _api_key: &str,
    ) -> AppResult<HashMap<String, VideoStatistics>> {
        *self.statistics_calls.lock().unwrap() += 1;
        if let Some(error) = &self.statistics_error {
            return Err(error.clone());
        }
        Ok(video_ids
            .iter()
            .map(|id| {
                let stats = VideoStatistics {
                    view_count: self.views.get(id).copied().unwrap_or(0),
                    like_count: None,
                };
                (id.clone(), stats)
            })
            .collect())
    }
}

/// Hosted proxy stand-in with a fixed answer
pub struct FakeProxy {
    response: AppResult<Vec<VideoResult>>,
    delay: Option<Duration>,
    pub requests: Mutex<Vec<ProxySearchRequest>>,
}

impl FakeProxy {
    pub fn returning(response: AppResult<Vec<VideoResult>>) -> Self {
        Self {
            response,
            delay: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn quota_exceeded() -> Self {
        Self::returning(Err(AppError::QuotaExceeded(
            "The request cannot be completed because you have exceeded your quota".to_string(),
        )))
    }

    pub fn slow(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl RemoteProxyClient for FakeProxy {
    async fn search_by_product(&self, request: &ProxySearchRequest) -> AppResult<Vec<VideoResult>> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.response.clone()
    }
}

pub struct FakeRewriter {
    response: AppResult<String>,
    pub calls: Mutex<usize>,
}

impl FakeRewriter {
    pub fn returning(response: AppResult<String>) -> Self {
        Self {
            response,
            calls: Mutex::new(0),
        }
    }
}

#[async_trait]
impl TitleRewriter for FakeRewriter {
    async fn rewrite_title(&self, _title: &str, _subtitle: Option<&str>) -> AppResult<String> {
        *self.calls.lock().unwrap() += 1;
        self.response.clone()
    }
}

/// Inference stand-in that records what it was sent
pub struct FakeInference {
    response: AppResult<Value>,
    delay: Option<Duration>,
    pub contexts: Mutex<Vec<VideoContext>>,
}

impl FakeInference {
    pub fn returning(response: AppResult<Value>) -> Self {
        Self {
            response,
            delay: None,
            contexts: Mutex::new(Vec::new()),
        }
    }

    pub fn slow(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl InferenceBackend for FakeInference {
    async fn extract_products(&self, context: &VideoContext) -> AppResult<Value> {
        self.contexts.lock().unwrap().push(context.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.response.clone()
    }
}
