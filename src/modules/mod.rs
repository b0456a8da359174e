pub mod extraction;
pub mod query;
pub mod retrieval;
