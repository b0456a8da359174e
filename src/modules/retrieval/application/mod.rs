pub mod search_orchestrator;

pub use search_orchestrator::{SearchOptions, SearchOrchestrator, SERVICE_UNAVAILABLE_MESSAGE};
