use async_trait::async_trait;

use super::entities::VideoContext;
use crate::shared::errors::AppResult;

/// Remote service that infers products from video text
///
/// Returns the raw JSON body; shape validation belongs to the caller so that
/// legacy and current payloads are handled in one place.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    async fn extract_products(&self, context: &VideoContext) -> AppResult<serde_json::Value>;
}
