pub mod retry_policy;
pub mod retryable_fetcher;

pub use retry_policy::RetryPolicy;
pub use retryable_fetcher::RetryableFetcher;
