use crate::constants;
use crate::errors::{LlmError, LlmResult};
use crate::executor::{CompletionParams, ParallelExecutor};
use crate::providers::{create_backend, Backend, ProviderType};
use crate::rate_limiter::RateLimiter;
use crate::registry::{BackendProfile, ModelRegistry, QualityClass, SpeedClass};
use crate::telemetry::{CsvMetricsStore, MetricsRecorder, MetricsStore};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use log::debug;
use tokio::task::JoinSet;
use super::Orchestrator;

/// Where the client for a backend comes from
enum ClientSource {
    /// Built by `create_backend` at build time
    Provider {
        provider_type: ProviderType,
        model: String,
        api_key: String,
        custom_endpoint: Option<String>,
    },
    /// Supplied ready-made by the caller
    Client(Arc<dyn Backend + Send + Sync>),
}

/// Internal helper struct for Builder
struct PendingBackend {
    profile: BackendProfile,
    source: ClientSource,
    enabled: bool,
}

/// Orchestrator Builder
pub struct OrchestratorBuilder {
    backends: Vec<PendingBackend>,
    params: CompletionParams,
    per_call_timeout: Duration,
    rate_limit_count: u32,
    rate_limit_window: Duration,
    max_concurrent_calls: Option<usize>,
    metrics_store: Option<Arc<dyn MetricsStore + Send + Sync>>,
    /// First misuse of a per-backend setter, reported by `build()`
    misuse: Option<String>,
}

impl Default for OrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl OrchestratorBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        OrchestratorBuilder {
            backends: Vec::new(),
            params: CompletionParams::default(),
            per_call_timeout: Duration::from_secs(constants::DEFAULT_PER_CALL_TIMEOUT_SECS),
            rate_limit_count: constants::DEFAULT_RATE_LIMIT_COUNT,
            rate_limit_window: Duration::from_secs(constants::DEFAULT_RATE_LIMIT_WINDOW_SECS),
            max_concurrent_calls: None,
            metrics_store: None,
            misuse: None,
        }
    }

    /// Sets the sampling temperature sent to every backend.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.params.temperature = temperature;
        self
    }

    /// Sets the token limit sent to every backend.
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.params.max_tokens = max_tokens;
        self
    }

    /// Sets the deadline for each individual backend call.
    pub fn per_call_timeout(mut self, timeout: Duration) -> Self {
        self.per_call_timeout = timeout;
        self
    }

    /// Allows each caller `count` queries per `window`.
    pub fn rate_limit(mut self, count: u32, window: Duration) -> Self {
        self.rate_limit_count = count;
        self.rate_limit_window = window;
        self
    }

    /// Caps outbound calls in flight across all concurrent queries.
    pub fn max_concurrent_calls(mut self, max_calls: usize) -> Self {
        self.max_concurrent_calls = Some(max_calls);
        self
    }

    /// Appends metric records to the given store.
    pub fn metrics_store(mut self, store: Arc<dyn MetricsStore + Send + Sync>) -> Self {
        self.metrics_store = Some(store);
        self
    }

    /// Appends metric records to a CSV file at `path`.
    pub fn csv_metrics(self, path: impl Into<PathBuf>) -> Self {
        self.metrics_store(Arc::new(CsvMetricsStore::new(path)))
    }

    /// Begins configuring a new backend served by one of the built-in clients.
    /// Subsequent calls like `.cost()`, `.speed()`, `.quality()`, `.enabled()`
    /// and `.custom_endpoint()` apply to this backend.
    pub fn add_backend(
        mut self,
        provider_type: ProviderType,
        name: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        self.backends.push(PendingBackend {
            profile: BackendProfile::new(name, 0.0, SpeedClass::Medium, QualityClass::Medium),
            source: ClientSource::Provider {
                provider_type,
                model: model.into(),
                api_key: api_key.into(),
                custom_endpoint: None,
            },
            enabled: true,
        });
        self
    }

    /// Registers a backend with a ready-made client.
    /// The client's `name()` must match the profile name.
    pub fn add_client(mut self, profile: BackendProfile, client: Arc<dyn Backend + Send + Sync>) -> Self {
        self.backends.push(PendingBackend {
            profile,
            source: ClientSource::Client(client),
            enabled: true,
        });
        self
    }

    /// Sets the unit cost of the *last added* backend.
    pub fn cost(self, unit_cost: f64) -> Self {
        self.with_last("cost", |backend| backend.profile.unit_cost = unit_cost)
    }

    /// Sets the speed class of the *last added* backend.
    pub fn speed(self, speed: SpeedClass) -> Self {
        self.with_last("speed", |backend| backend.profile.speed_class = speed)
    }

    /// Sets the quality class of the *last added* backend.
    pub fn quality(self, quality: QualityClass) -> Self {
        self.with_last("quality", |backend| backend.profile.quality_class = quality)
    }

    /// Sets the enabled status for the *last added* backend.
    /// Disabled backends are left out of the registry.
    pub fn enabled(self, enabled: bool) -> Self {
        self.with_last("enabled", |backend| backend.enabled = enabled)
    }

    /// Sets a custom endpoint for the *last added* backend.
    pub fn custom_endpoint(self, endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        self.with_last("custom_endpoint", move |backend| {
            if let ClientSource::Provider { custom_endpoint, .. } = &mut backend.source {
                *custom_endpoint = Some(endpoint);
            }
        })
    }

    fn with_last(mut self, setter: &str, apply: impl FnOnce(&mut PendingBackend)) -> Self {
        match self.backends.last_mut() {
            Some(backend) => apply(backend),
            None => {
                self.misuse.get_or_insert_with(|| {
                    format!("'.{}()' called before '.add_backend()' or '.add_client()'", setter)
                });
            }
        }
        self
    }

    /// Consumes the builder and constructs the `Orchestrator`.
    /// Returns an error for invalid settings, duplicate backend names or
    /// clients that cannot be created.
    pub fn build(self) -> LlmResult<Orchestrator> {
        if let Some(misuse) = self.misuse {
            return Err(LlmError::ConfigError(format!("Build failed: {}", misuse)));
        }
        if !(0.0..=1.0).contains(&self.params.temperature) {
            return Err(LlmError::ConfigError(format!(
                "Build failed: temperature {} is outside [0, 1]",
                self.params.temperature
            )));
        }
        if self.params.max_tokens == 0 {
            return Err(LlmError::ConfigError("Build failed: max_tokens must be positive".to_string()));
        }
        if self.per_call_timeout.is_zero() || self.rate_limit_window.is_zero() {
            return Err(LlmError::ConfigError(
                "Build failed: per_call_timeout and rate limit window must be non-zero".to_string(),
            ));
        }

        let mut executor = ParallelExecutor::new();
        if let Some(max_calls) = self.max_concurrent_calls {
            executor = executor.with_max_concurrent_calls(max_calls);
        }

        let mut profiles = Vec::with_capacity(self.backends.len());
        for backend in self.backends {
            if !backend.enabled {
                debug!("Skipping disabled backend '{}'", backend.profile.name);
                continue;
            }

            let client = match backend.source {
                ClientSource::Provider { provider_type, model, api_key, custom_endpoint } => {
                    create_backend(provider_type, backend.profile.name.clone(), api_key, model, custom_endpoint)?
                }
                ClientSource::Client(client) => {
                    if client.name() != backend.profile.name {
                        return Err(LlmError::ConfigError(format!(
                            "Build failed: client named '{}' registered for backend '{}'",
                            client.name(), backend.profile.name
                        )));
                    }
                    client
                }
            };

            debug!("Built backend: {} ({})", backend.profile.name, client.model());
            profiles.push(backend.profile);
            executor.register(client);
        }

        let registry = ModelRegistry::new(profiles)?;
        if registry.is_empty() {
            log::warn!("Orchestrator built with no backends.");
        }

        Ok(Orchestrator {
            registry,
            executor,
            rate_limiter: RateLimiter::new(self.rate_limit_count, self.rate_limit_window),
            recorder: self.metrics_store.map(MetricsRecorder::new),
            params: self.params,
            per_call_timeout: self.per_call_timeout,
            metrics_writes: Mutex::new(JoinSet::new()),
        })
    }
}
