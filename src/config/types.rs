//! Configuration types for TOML-based configuration.
//!
//! These types map directly to the TOML configuration file structure.

use serde::Deserialize;
use std::time::Duration;

use crate::constants;
use crate::registry::{BackendProfile, QualityClass, SpeedClass};

/// Root configuration structure.
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Global settings for the Orchestrator.
    #[serde(default)]
    pub settings: Settings,

    /// Backend definitions, in the order they are listed to callers.
    #[serde(default)]
    pub backends: Vec<BackendConfig>,
}

/// Global settings for the Orchestrator.
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// Sampling temperature sent to every backend, in [0, 1].
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Token limit sent to every backend.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Queries each caller may run per window.
    #[serde(default = "default_rate_limit_count")]
    pub rate_limit_count: u32,

    /// Rate limit window length in seconds.
    #[serde(default = "default_rate_limit_window_secs")]
    pub rate_limit_window_secs: u64,

    /// Deadline for a single backend call in seconds.
    #[serde(default = "default_per_call_timeout_secs")]
    pub per_call_timeout_secs: u64,

    /// Optional cap on outbound calls in flight across all queries.
    pub max_concurrent_calls: Option<usize>,

    /// CSV file metric records are appended to.
    pub metrics_path: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            rate_limit_count: default_rate_limit_count(),
            rate_limit_window_secs: default_rate_limit_window_secs(),
            per_call_timeout_secs: default_per_call_timeout_secs(),
            max_concurrent_calls: None,
            metrics_path: None,
        }
    }
}

impl Settings {
    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_secs)
    }

    pub fn per_call_timeout(&self) -> Duration {
        Duration::from_secs(self.per_call_timeout_secs)
    }
}

fn default_temperature() -> f32 {
    constants::DEFAULT_TEMPERATURE
}

fn default_max_tokens() -> u32 {
    constants::DEFAULT_MAX_TOKENS
}

fn default_rate_limit_count() -> u32 {
    constants::DEFAULT_RATE_LIMIT_COUNT
}

fn default_rate_limit_window_secs() -> u64 {
    constants::DEFAULT_RATE_LIMIT_WINDOW_SECS
}

fn default_per_call_timeout_secs() -> u64 {
    constants::DEFAULT_PER_CALL_TIMEOUT_SECS
}

/// Backend configuration: registry attributes plus client settings.
#[derive(Debug, Deserialize)]
pub struct BackendConfig {
    /// Unique registry name (e.g. "ChatGPT").
    pub name: String,

    /// Backend type: "openai", "google" or "ollama".
    #[serde(rename = "type")]
    pub backend_type: String,

    /// Model identifier (e.g. "gpt-4o-mini", "gemini-1.5-flash", "llama3").
    pub model: String,

    /// API key (supports environment variable syntax: "${VAR_NAME}").
    #[serde(default)]
    pub api_key: String,

    /// Cost per output token.
    pub cost: f64,

    pub speed: SpeedClass,

    pub quality: QualityClass,

    /// Whether this backend is registered at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Custom endpoint URL (for self-hosted Ollama servers).
    pub endpoint: Option<String>,
}

impl BackendConfig {
    pub fn profile(&self) -> BackendProfile {
        BackendProfile::new(self.name.clone(), self.cost, self.speed, self.quality)
    }
}

fn default_true() -> bool {
    true
}
