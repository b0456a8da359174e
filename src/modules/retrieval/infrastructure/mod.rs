pub mod cache;
pub mod external;
pub mod http_client;

pub use cache::{CacheStats, InMemoryCacheStore, JsonFileCacheStore, RetrievalCache};
pub use external::{HttpProxyClient, YouTubeClient};
pub use http_client::{RetryPolicy, RetryableFetcher};
