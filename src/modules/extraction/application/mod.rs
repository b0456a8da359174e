pub mod multi_product_extractor;
pub mod product_resolver;

pub use multi_product_extractor::{rank_candidates, MultiProductExtractor};
pub use product_resolver::VideoProductResolver;
