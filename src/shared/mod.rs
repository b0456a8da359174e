// Cross-cutting concerns shared by every module

pub mod config;
pub mod errors;
pub mod utils;

pub use config::ResolverConfig;
pub use errors::{AppError, AppResult};
