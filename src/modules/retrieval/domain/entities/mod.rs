pub mod cache_entry;
pub mod video_result;

pub use cache_entry::CacheEntry;
pub use video_result::{rank_by_views, SearchHit, VideoResult, VideoStatistics};
