pub mod search_settings;
pub mod source_preference;

pub use search_settings::{ProductSearchRequest, SearchSettings};
pub use source_preference::{DataSource, SourcePreference};
