//! Product listing ↔ review video resolution.
//!
//! The `query` module turns marketplace titles into review search queries,
//! `retrieval` runs those queries against the hosted proxy or the YouTube
//! Data API, and `extraction` works the other way round, guessing which
//! products a video is about.

pub mod modules;
pub mod shared;

pub use modules::extraction::{
    MultiProductExtractor, ProductCandidate, VideoContext, VideoProductResolver,
    VideoTextFallbackExtractor,
};
pub use modules::query::{normalize, ProductQueryBuilder, QueryVariantSet};
pub use modules::retrieval::{
    ProductSearchRequest, SearchOrchestrator, SearchSettings, SourcePreference, VideoResult,
};
pub use shared::{AppError, AppResult, ResolverConfig};
