use std::future::Future;
use tokio::time::sleep;
use tracing::{debug, warn};

use super::retry_policy::RetryPolicy;
use crate::shared::errors::{AppError, AppResult};

/// Runs an outbound call again when the provider throttles it
#[derive(Debug, Clone, Default)]
pub struct RetryableFetcher {
    policy: RetryPolicy,
}

impl RetryableFetcher {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Execute `operation` with exponential backoff on throttling responses.
    ///
    /// Only HTTP 429/403 and `RateLimitError` are retried; every other error
    /// is returned as-is. Running out of attempts yields `RateLimitError`.
    pub async fn execute<F, Fut, T>(&self, operation_name: &str, operation: F) -> AppResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut last_error = None;

        for attempt in 0..max_attempts {
            match operation().await {
                Ok(result) => {
                    if attempt > 0 {
                        debug!(
                            "{} succeeded on attempt {} after {} retries",
                            operation_name,
                            attempt + 1,
                            attempt
                        );
                    }
                    return Ok(result);
                }
                Err(error) if Self::is_retryable(&error) => {
                    if attempt + 1 < max_attempts {
                        let delay = self.policy.calculate_delay(attempt);
                        warn!(
                            "{} throttled on attempt {} ({}), retrying in {:?}",
                            operation_name,
                            attempt + 1,
                            error,
                            delay
                        );
                        sleep(delay).await;
                    } else {
                        warn!(
                            "{} throttled on final attempt {} ({}), giving up",
                            operation_name,
                            attempt + 1,
                            error
                        );
                    }
                    last_error = Some(error);
                }
                Err(error) => {
                    debug!("{} failed with non-retryable error: {}", operation_name, error);
                    return Err(error);
                }
            }
        }

        let detail = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no attempts made".to_string());
        Err(AppError::RateLimitError(format!(
            "{} still rate limited after {} attempts: {}",
            operation_name, max_attempts, detail
        )))
    }

    fn is_retryable(error: &AppError) -> bool {
        match error {
            AppError::HttpStatus { status, .. } => RetryPolicy::is_retryable_status(*status),
            AppError::RateLimitError(_) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    fn throttled() -> AppError {
        AppError::HttpStatus {
            status: 429,
            message: "Too Many Requests".into(),
        }
    }

    async fn run_with_failures(failures: u32, policy: RetryPolicy) -> (AppResult<&'static str>, u32) {
        let calls = AtomicU32::new(0);
        let calls_ref = &calls;
        let result = RetryableFetcher::new(policy)
            .execute("search", move || async move {
                let n = calls_ref.fetch_add(1, Ordering::SeqCst);
                if n < failures {
                    Err(throttled())
                } else {
                    Ok("ok")
                }
            })
            .await;
        (result, calls.load(Ordering::SeqCst))
    }

    #[tokio::test]
    async fn test_two_throttles_then_success() {
        let (result, calls) = run_with_failures(2, RetryPolicy::immediate(3)).await;
        assert_eq!(result.unwrap(), "ok");
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn test_three_throttles_exhaust_budget() {
        let (result, calls) = run_with_failures(3, RetryPolicy::immediate(3)).await;
        assert!(matches!(result, Err(AppError::RateLimitError(_))));
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn test_non_retryable_error_returns_immediately() {
        let calls = AtomicU32::new(0);
        let calls_ref = &calls;
        let result: AppResult<()> = RetryableFetcher::new(RetryPolicy::immediate(3))
            .execute("search", move || async move {
                calls_ref.fetch_add(1, Ordering::SeqCst);
                Err(AppError::HttpStatus {
                    status: 404,
                    message: "Not Found".into(),
                })
            })
            .await;
        assert!(matches!(result, Err(AppError::HttpStatus { status: 404, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_doubles_between_attempts() {
        let started = tokio::time::Instant::now();
        let (result, _) = run_with_failures(2, RetryPolicy::default()).await;
        assert!(result.is_ok());
        // 1s after the first failure, 2s after the second
        assert_eq!(started.elapsed(), Duration::from_millis(3000));
    }
}
