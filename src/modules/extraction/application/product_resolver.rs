use std::sync::Arc;
use tracing::{info, warn};

use super::multi_product_extractor::MultiProductExtractor;
use crate::modules::extraction::domain::{
    entities::{ProductCandidate, VideoContext},
    fallback_extractor::VideoTextFallbackExtractor,
};
use crate::modules::retrieval::infrastructure::external::HttpProxyClient;
use crate::shared::config::ResolverConfig;
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::logger::TimedOperation;

/// Confidence given to the deterministic guess
pub const FALLBACK_CONFIDENCE: f64 = 0.5;
const FALLBACK_RATIONALE: &str = "Derived from the video title without AI assistance";

/// Video → product entry point: AI extraction first, title heuristics when
/// the backend is absent or not answering.
pub struct VideoProductResolver {
    extractor: Option<MultiProductExtractor>,
    fallback: VideoTextFallbackExtractor,
}

impl VideoProductResolver {
    pub fn new(extractor: MultiProductExtractor) -> Self {
        Self {
            extractor: Some(extractor),
            fallback: VideoTextFallbackExtractor::new(),
        }
    }

    pub fn without_inference() -> Self {
        Self {
            extractor: None,
            fallback: VideoTextFallbackExtractor::new(),
        }
    }

    /// Uses the hosted proxy for inference when one is configured.
    pub fn from_config(config: &ResolverConfig) -> AppResult<Self> {
        match &config.proxy_url {
            Some(url) => {
                let backend = Arc::new(HttpProxyClient::new(url)?);
                Ok(Self::new(MultiProductExtractor::new(backend)))
            }
            None => Ok(Self::without_inference()),
        }
    }

    pub fn has_inference(&self) -> bool {
        self.extractor.is_some()
    }

    /// Malformed backend responses are returned as errors; every other
    /// backend failure degrades to a single heuristic candidate. A context
    /// with no text never reaches the backend.
    pub async fn resolve(&self, context: &VideoContext) -> AppResult<Vec<ProductCandidate>> {
        let timer = TimedOperation::new("resolve_video_products");

        if let Some(extractor) = self.extractor.as_ref().filter(|_| !context.is_blank()) {
            match extractor.extract_candidates(context).await {
                Ok(candidates) => {
                    timer.finish_with_info(&format!("{} AI candidates", candidates.len()));
                    return Ok(candidates);
                }
                Err(error @ AppError::ValidationError(_)) => return Err(error),
                Err(AppError::QuotaExceeded(message)) => {
                    info!("Inference quota exhausted ({}), using title heuristics", message)
                }
                Err(error) => warn!("AI product extraction failed ({}), using title heuristics", error),
            }
        }

        let candidate = self.fallback_candidate(context);
        timer.finish_with_info("title heuristics");
        Ok(vec![candidate])
    }

    fn fallback_candidate(&self, context: &VideoContext) -> ProductCandidate {
        let name = self.fallback.extract_from_context(context);
        ProductCandidate::new(name, FALLBACK_CONFIDENCE).with_rationale(FALLBACK_RATIONALE)
    }
}
