use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, Serialize)]
#[serde(tag = "type", content = "message")]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimitError(String),

    #[error("Request timed out: {0}")]
    TimeoutError(String),

    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("External service error: {0}")]
    ExternalServiceError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Cache error: {0}")]
    CacheError(String),
}

impl AppError {
    /// Errors that should make the caller move on to the next source or
    /// variant instead of giving up.
    pub fn is_soft_failure(&self) -> bool {
        matches!(
            self,
            AppError::TimeoutError(_)
                | AppError::QuotaExceeded(_)
                | AppError::ExternalServiceError(_)
                | AppError::HttpStatus { .. }
        )
    }

    /// Heuristic used by upstream services that report quota exhaustion as
    /// free text or a bare 403.
    pub fn looks_like_quota(status: Option<u16>, message: &str) -> bool {
        status == Some(403) || message.to_lowercase().contains("quota") || message.contains("403")
    }

    /// Message suitable for showing to an end user.
    pub fn user_message(&self) -> String {
        match self {
            AppError::ValidationError(_) => {
                "The video service returned an unexpected response. Please try again later."
                    .to_string()
            }
            AppError::RateLimitError(_) => {
                "The video search service is rate limiting requests. Wait a minute and try again."
                    .to_string()
            }
            AppError::TimeoutError(_) => {
                "The video search service did not respond in time. Check your connection and try again."
                    .to_string()
            }
            AppError::QuotaExceeded(_) => {
                "The shared search quota is used up for today. Configure your own YouTube API key to keep searching."
                    .to_string()
            }
            AppError::ConfigurationError(msg) => msg.clone(),
            AppError::HttpStatus { status, .. } => format!(
                "The video search service answered with HTTP {}. Please try again later.",
                status
            ),
            AppError::ExternalServiceError(_) => {
                "The video search service is unavailable right now. Please try again later."
                    .to_string()
            }
            AppError::SerializationError(_) => {
                "The video search service sent data that could not be read.".to_string()
            }
            AppError::CacheError(_) => {
                "Local search cache could not be accessed. Results will be fetched fresh."
                    .to_string()
            }
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::TimeoutError("Request timeout".to_string())
        } else if err.is_connect() {
            AppError::ExternalServiceError("Failed to connect to external service".to_string())
        } else if let Some(status) = err.status() {
            match status.as_u16() {
                429 => AppError::RateLimitError("Too many requests".to_string()),
                code => AppError::HttpStatus {
                    status: code,
                    message: err.to_string(),
                },
            }
        } else if err.is_decode() {
            AppError::SerializationError(err.to_string())
        } else {
            AppError::ExternalServiceError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::SerializationError(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::CacheError(err.to_string())
    }
}

impl From<tokio::time::error::Elapsed> for AppError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        AppError::TimeoutError("Deadline elapsed".to_string())
    }
}

// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
