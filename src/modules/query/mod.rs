//! Product title → search query direction.

pub mod domain;

pub use domain::{normalize, ProductQueryBuilder, QueryVariantSet, TitleNormalizer};
