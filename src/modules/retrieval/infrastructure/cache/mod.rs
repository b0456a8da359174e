pub mod file_store;
pub mod memory_store;
pub mod retrieval_cache;

pub use file_store::JsonFileCacheStore;
pub use memory_store::InMemoryCacheStore;
pub use retrieval_cache::{CacheStats, RetrievalCache};
