pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{SearchOptions, SearchOrchestrator};
pub use domain::{
    DataSource, ProductSearchRequest, SearchSettings, SourcePreference, VideoResult,
};
pub use infrastructure::{RetrievalCache, RetryPolicy, RetryableFetcher};
