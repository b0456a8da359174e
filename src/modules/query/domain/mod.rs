pub mod query_builder;
pub mod text_normalizer;
pub mod vocabulary;

pub use query_builder::{ProductQueryBuilder, QueryVariantSet, MAX_QUERY_LENGTH, MAX_VARIANTS};
pub use text_normalizer::{normalize, TitleNormalizer, TitleTransformation};
