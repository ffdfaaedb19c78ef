pub mod builder;
pub mod manager;
pub mod types;

pub use builder::OrchestratorBuilder;
pub use manager::Orchestrator;
pub use types::{QueryRequest, QueryResponse, QueryStatus};
