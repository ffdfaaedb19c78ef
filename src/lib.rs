//! nexusllm is the orchestration layer of a multi-model LLM comparison service.
//!
//! A caller submits one prompt together with an objective and receives the
//! answers of several backends, chosen and invoked according to that
//! objective, under a per-caller request budget.
//!
//! # Features
//!
//! - **Objective routing**: General, Coding, Fast Response and Cost Saving
//!   policies over a registry of backends with cost, speed and quality attributes
//! - **Parallel fan-out**: every selected backend is queried concurrently with a
//!   per-call timeout; one slow or failing backend never aborts the batch
//! - **Rate limiting**: a fixed window budget per caller, checked before any
//!   backend is contacted
//! - **Telemetry**: one durable record per backend outcome, plus optional
//!   counters through the `metrics` facade
//! - **Reports**: cost estimate and latency summary for every query
//!
//! # Example
//!
//! ```no_run
//! use nexusllm::{Orchestrator, ProviderType, Objective, QualityClass, SpeedClass};
//!
//! async fn example() {
//!     let orchestrator = Orchestrator::builder()
//!         .add_backend(ProviderType::OpenAI, "ChatGPT", "gpt-4o-mini", "api-key")
//!         .cost(0.002)
//!         .speed(SpeedClass::Medium)
//!         .quality(QualityClass::High)
//!         .add_backend(ProviderType::Google, "Gemini", "gemini-1.5-flash", "api-key")
//!         .cost(0.0005)
//!         .speed(SpeedClass::Fast)
//!         .build()
//!         .expect("Failed to build orchestrator");
//!
//!     let response = orchestrator
//!         .run_query("user-1", "Explain Rust in one paragraph", Objective::General)
//!         .await
//!         .expect("query rejected");
//!
//!     for name in response.responses.names() {
//!         println!("{}: {:?}", name, response.responses.get(name));
//!     }
//! }
//! ```

pub mod providers;
pub mod errors;
pub mod constants;
pub mod registry;
pub mod routing;
pub mod rate_limiter;
pub mod executor;
pub mod report;
pub mod telemetry;
pub mod orchestrator;
pub mod config;

pub use providers::{
    ProviderType,
    Backend,
    create_backend,
    OpenAIBackend,
    GoogleBackend,
    OllamaBackend,
};

pub use errors::{LlmError, LlmResult};

pub use registry::{BackendProfile, ModelRegistry, QualityClass, SpeedClass};
pub use routing::{select_backends, Objective};
pub use rate_limiter::{Admission, RateLimiter};
pub use executor::{BackendOutcome, BackendOutcomes, CompletionParams, OutcomeStatus, ParallelExecutor};
pub use report::{summarize, LatencySummary, Report};
pub use orchestrator::{Orchestrator, OrchestratorBuilder, QueryRequest, QueryResponse, QueryStatus};

#[cfg(feature = "metrics")]
pub use telemetry::describe_metrics;

/// Initialize the logging system
///
/// This should be called at the start of your application in case
/// you want to activate the library's debug and info logging.
pub fn use_logging() {
    env_logger::init();
}
