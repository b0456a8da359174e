pub mod entities;
pub mod fallback_extractor;
pub mod repositories;

pub use entities::{ProductCandidate, VideoContext, MIN_CONFIDENCE};
pub use fallback_extractor::VideoTextFallbackExtractor;
pub use repositories::InferenceBackend;
