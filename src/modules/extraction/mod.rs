//! Video → product direction.

pub mod application;
pub mod domain;

pub use application::{MultiProductExtractor, VideoProductResolver};
pub use domain::{InferenceBackend, ProductCandidate, VideoContext, VideoTextFallbackExtractor};
