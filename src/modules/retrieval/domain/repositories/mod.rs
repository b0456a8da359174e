pub mod cache_store;
pub mod video_sources;

pub use cache_store::CacheStore;
pub use video_sources::{ProxySearchRequest, RemoteProxyClient, TitleRewriter, VideoSearchProvider};
