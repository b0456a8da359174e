pub mod entities;
pub mod repositories;
pub mod value_objects;

pub use entities::{CacheEntry, SearchHit, VideoResult, VideoStatistics};
pub use repositories::{
    CacheStore, ProxySearchRequest, RemoteProxyClient, TitleRewriter, VideoSearchProvider,
};
pub use value_objects::{DataSource, ProductSearchRequest, SearchSettings, SourcePreference};
