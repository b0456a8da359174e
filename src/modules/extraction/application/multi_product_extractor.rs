use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::modules::extraction::domain::{
    entities::{ProductCandidate, VideoContext},
    repositories::InferenceBackend,
};
use crate::shared::errors::{AppError, AppResult};

/// Default deadline for one inference call
pub const DEFAULT_EXTRACTION_TIMEOUT: Duration = Duration::from_secs(10);
/// Names at least this similar are treated as the same product
const DUPLICATE_SIMILARITY: f64 = 0.9;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCandidate {
    #[serde(default)]
    product_name: Option<String>,
    #[serde(default)]
    confidence: Option<f64>,
    #[serde(default, alias = "reasoning")]
    rationale: Option<String>,
}

impl RawCandidate {
    fn into_candidate(self) -> Option<ProductCandidate> {
        let name = self.product_name?.trim().to_string();
        let mut candidate = ProductCandidate::new(name, self.confidence.unwrap_or(0.0));
        candidate.rationale = self.rationale.filter(|r| !r.trim().is_empty());
        Some(candidate)
    }
}

/// The two response shapes the backend has shipped
#[derive(Debug)]
enum ExtractionPayload {
    Products(Vec<RawCandidate>),
    Legacy(RawCandidate),
}

impl ExtractionPayload {
    fn decode(value: &Value) -> AppResult<Self> {
        match value.get("products") {
            Some(Value::Array(items)) => {
                let parsed = serde_json::from_value(Value::Array(items.clone())).map_err(|e| {
                    AppError::ValidationError(format!("Malformed products array: {}", e))
                })?;
                Ok(Self::Products(parsed))
            }
            Some(_) => Err(AppError::ValidationError(
                "Extraction response field 'products' is not an array".to_string(),
            )),
            None if value.get("productName").is_some() => {
                let parsed = serde_json::from_value(value.clone()).map_err(|e| {
                    AppError::ValidationError(format!("Malformed legacy extraction response: {}", e))
                })?;
                Ok(Self::Legacy(parsed))
            }
            None => match value.get("error").and_then(Value::as_str) {
                Some(message) => Err(AppError::ExternalServiceError(format!(
                    "Product extraction failed upstream: {}",
                    message
                ))),
                None => Err(AppError::ValidationError(
                    "Extraction response has neither 'products' nor 'productName'".to_string(),
                )),
            },
        }
    }

    fn into_candidates(self) -> Vec<ProductCandidate> {
        let raw = match self {
            Self::Products(items) => items,
            Self::Legacy(item) => vec![item],
        };
        raw.into_iter().filter_map(RawCandidate::into_candidate).collect()
    }
}

/// Asks the inference backend which products a video covers
pub struct MultiProductExtractor {
    backend: Arc<dyn InferenceBackend>,
    timeout: Duration,
}

impl MultiProductExtractor {
    pub fn new(backend: Arc<dyn InferenceBackend>) -> Self {
        Self {
            backend,
            timeout: DEFAULT_EXTRACTION_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Candidates sorted by confidence, all at or above the display threshold.
    ///
    /// An empty vector means the backend found nothing convincing; a response
    /// in neither known shape is a `ValidationError`.
    pub async fn extract_candidates(
        &self,
        context: &VideoContext,
    ) -> AppResult<Vec<ProductCandidate>> {
        if context.is_blank() {
            return Err(AppError::ValidationError(
                "Video context has no title or page text to analyse".to_string(),
            ));
        }

        let request = context.clipped();
        let response = tokio::time::timeout(self.timeout, self.backend.extract_products(&request))
            .await?
            .map_err(|error| match error {
                // a body that is not JSON at all is as malformed as one in an unknown shape
                AppError::SerializationError(message) => AppError::ValidationError(format!(
                    "Extraction response is not valid JSON: {}",
                    message
                )),
                other => other,
            })?;

        let payload = ExtractionPayload::decode(&response)?;
        let received = match &payload {
            ExtractionPayload::Products(items) => items.len(),
            ExtractionPayload::Legacy(_) => 1,
        };

        let candidates = rank_candidates(payload.into_candidates());
        info!(
            "Extracted {} product candidates ({} received) for '{}'",
            candidates.len(),
            received,
            request.video_title
        );
        Ok(candidates)
    }
}

/// Drops weak and nameless candidates, merges near-duplicates and sorts by
/// descending confidence.
pub fn rank_candidates(candidates: Vec<ProductCandidate>) -> Vec<ProductCandidate> {
    let mut accepted: Vec<ProductCandidate> = candidates
        .into_iter()
        .filter(ProductCandidate::is_acceptable)
        .collect();
    accepted.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut ranked: Vec<ProductCandidate> = Vec::with_capacity(accepted.len());
    for candidate in accepted {
        let name = candidate.product_name.to_lowercase();
        let duplicate = ranked.iter().any(|kept| {
            strsim::normalized_levenshtein(&kept.product_name.to_lowercase(), &name)
                >= DUPLICATE_SIMILARITY
        });
        if duplicate {
            debug!("Merged duplicate candidate '{}'", candidate.product_name);
        } else {
            ranked.push(candidate);
        }
    }
    ranked
}
