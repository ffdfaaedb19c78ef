//! Configuration module for TOML-based Orchestrator configuration.
//!
//! A configuration file describes the backends (registry attributes and
//! client settings together) and the global settings of the orchestration
//! layer.
//!
//! # Example Configuration File
//!
//! ```toml
//! [settings]
//! temperature = 0.7
//! max_tokens = 1024
//! rate_limit_count = 5
//! rate_limit_window_secs = 60
//! per_call_timeout_secs = 30
//!
//! [[backends]]
//! name = "ChatGPT"
//! type = "openai"
//! model = "gpt-4o-mini"
//! api_key = "${OPENAI_API_KEY}"
//! cost = 0.002
//! speed = "medium"
//! quality = "high"
//! ```
//!
//! # Environment Variables
//!
//! API keys and other sensitive values can reference environment variables
//! using the `${VAR_NAME}` syntax. These are resolved at load time.

mod types;
mod loader;

pub use types::{Config, Settings, BackendConfig};
pub use loader::{load_config, parse_config};
