use crate::config::{self, Config};
use crate::errors::{LlmError, LlmResult};
use crate::executor::{BackendOutcomes, CompletionParams, ParallelExecutor};
use crate::orchestrator::builder::OrchestratorBuilder;
use crate::orchestrator::types::{QueryRequest, QueryResponse, QueryStatus};
use crate::rate_limiter::{Admission, RateLimiter};
use crate::registry::ModelRegistry;
use crate::report;
use crate::routing::{self, Objective};
use crate::telemetry::MetricsRecorder;
use log::{debug, error, info, warn};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::Instant;

/// Main orchestrator: admission, routing, fan-out, telemetry and reporting
pub struct Orchestrator {
    pub(crate) registry: ModelRegistry,
    pub(crate) executor: ParallelExecutor,
    pub(crate) rate_limiter: RateLimiter,
    pub(crate) recorder: Option<MetricsRecorder>,
    pub(crate) params: CompletionParams,
    pub(crate) per_call_timeout: Duration,
    /// Metric appends still running on the blocking pool.
    pub(crate) metrics_writes: Mutex<JoinSet<()>>,
}

impl Orchestrator {
    /// Creates a new builder to configure the Orchestrator.
    pub fn builder() -> OrchestratorBuilder {
        OrchestratorBuilder::new()
    }

    /// Creates an Orchestrator from a TOML configuration file.
    ///
    /// # Example
    /// ```no_run
    /// use nexusllm::Orchestrator;
    ///
    /// let orchestrator = Orchestrator::from_config_file("nexus.toml").unwrap();
    /// ```
    pub fn from_config_file<P: AsRef<Path>>(path: P) -> LlmResult<Self> {
        let config = config::load_config(path)?;
        Self::from_config(config)
    }

    /// Creates an Orchestrator from a TOML configuration string.
    pub fn from_config_str(toml_content: &str) -> LlmResult<Self> {
        let config = config::parse_config(toml_content)?;
        Self::from_config(config)
    }

    /// Creates an Orchestrator from a parsed configuration.
    pub fn from_config(config: Config) -> LlmResult<Self> {
        let settings = config.settings;

        let mut builder = OrchestratorBuilder::new()
            .temperature(settings.temperature)
            .max_tokens(settings.max_tokens)
            .rate_limit(settings.rate_limit_count, settings.rate_limit_window())
            .per_call_timeout(settings.per_call_timeout())
            .csv_metrics(
                settings
                    .metrics_path
                    .as_deref()
                    .unwrap_or(crate::constants::DEFAULT_METRICS_PATH),
            );

        if let Some(max_calls) = settings.max_concurrent_calls {
            builder = builder.max_concurrent_calls(max_calls);
        }

        for backend in config.backends {
            let provider_type = backend.backend_type.parse()?;
            builder = builder
                .add_backend(provider_type, backend.name.clone(), backend.model.clone(), backend.api_key.clone())
                .cost(backend.cost)
                .speed(backend.speed)
                .quality(backend.quality)
                .enabled(backend.enabled);

            if let Some(endpoint) = backend.endpoint {
                builder = builder.custom_endpoint(endpoint);
            }
        }

        builder.build()
    }

    /// Answers one prompt from the backends chosen for `objective`
    ///
    /// # Parameters
    /// * `caller_id` - Opaque caller identifier, used for rate limiting
    /// * `prompt` - The prompt, must contain non-whitespace text
    /// * `objective` - Drives which backends are asked
    ///
    /// # Returns
    /// * The per-backend responses with timing and cost data, or the reason
    ///   the query was rejected before any backend was contacted
    pub async fn run_query(
        &self,
        caller_id: impl Into<String>,
        prompt: impl Into<String>,
        objective: Objective,
    ) -> LlmResult<QueryResponse> {
        self.run(QueryRequest::new(caller_id, prompt, objective)).await
    }

    /// Runs a fully specified query request.
    pub async fn run(&self, request: QueryRequest) -> LlmResult<QueryResponse> {
        if request.prompt.trim().is_empty() {
            return Self::reject(LlmError::EmptyPrompt);
        }

        let params = match self.resolve_params(&request) {
            Ok(params) => params,
            Err(e) => return Self::reject(e),
        };

        if self.rate_limiter.check(&request.caller_id) == Admission::Denied {
            return Self::reject(LlmError::RateLimited {
                caller_id: request.caller_id.clone(),
            });
        }

        let backends = match routing::select_backends(request.objective, &self.registry) {
            Ok(backends) => backends,
            Err(e) => return Self::reject(e),
        };

        info!(
            "Caller '{}' querying {} backends for '{}'",
            request.caller_id,
            backends.len(),
            request.objective
        );

        let start = Instant::now();
        let outcomes = self
            .executor
            .execute(&request.prompt, &backends, params, self.per_call_timeout)
            .await;
        let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        self.record_metrics(&request, &outcomes);

        let report = report::summarize(&request.prompt, &outcomes, &self.registry);
        let status = QueryStatus::from_outcomes(&outcomes);

        match status {
            QueryStatus::AllBackendsFailed => warn!(
                "All {} backends failed for caller '{}'",
                outcomes.len(),
                request.caller_id
            ),
            _ => info!(
                "Query for caller '{}' finished in {} ms: {}/{} backends answered, estimated cost {:.6}",
                request.caller_id,
                elapsed_ms,
                outcomes.success_count(),
                outcomes.len(),
                report.estimated_cost
            ),
        }

        Ok(QueryResponse {
            responses: outcomes,
            elapsed_ms,
            report,
            status,
        })
    }

    /// Registry this orchestrator routes over.
    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }

    pub fn params(&self) -> CompletionParams {
        self.params
    }

    pub fn per_call_timeout(&self) -> Duration {
        self.per_call_timeout
    }

    /// Number of backends a query can be routed to.
    pub fn backend_count(&self) -> usize {
        self.registry.len()
    }

    fn resolve_params(&self, request: &QueryRequest) -> LlmResult<CompletionParams> {
        let temperature = request.temperature.unwrap_or(self.params.temperature);
        if !(0.0..=1.0).contains(&temperature) {
            return Err(LlmError::InvalidParameter(format!(
                "temperature {} is outside [0, 1]",
                temperature
            )));
        }

        let max_tokens = request.max_tokens.unwrap_or(self.params.max_tokens);
        if max_tokens == 0 {
            return Err(LlmError::InvalidParameter("max_tokens must be positive".to_string()));
        }

        Ok(CompletionParams { temperature, max_tokens })
    }

    /// Hands the records to the blocking pool so a slow store never delays
    /// the response. Failures are reported and swallowed there.
    fn record_metrics(&self, request: &QueryRequest, outcomes: &BackendOutcomes) {
        #[cfg(feature = "metrics")]
        for outcome in outcomes.iter() {
            crate::telemetry::record_outcome(request.objective, outcome);
        }

        let Some(recorder) = &self.recorder else {
            debug!("No metrics store configured, skipping records");
            return;
        };

        let recorder = recorder.clone();
        let caller_id = request.caller_id.clone();
        let objective = request.objective;
        let outcomes = outcomes.clone();

        let Ok(mut writes) = self.metrics_writes.lock() else {
            error!("Metrics write set poisoned, dropping records for caller '{}'", caller_id);
            return;
        };
        // Reap finished appends so the set only holds in-flight ones
        while writes.try_join_next().is_some() {}

        writes.spawn_blocking(move || {
            if let Err(e) = recorder.record(&caller_id, objective, &outcomes) {
                warn!("Failed to record metrics for caller '{}': {}", caller_id, e);
                #[cfg(feature = "metrics")]
                crate::telemetry::record_store_failure();
            }
        });
    }

    /// Waits until every metric append started so far has finished.
    pub async fn flush_metrics(&self) {
        let mut pending = match self.metrics_writes.lock() {
            Ok(mut writes) => std::mem::take(&mut *writes),
            Err(_) => return,
        };

        while let Some(result) = pending.join_next().await {
            if let Err(e) = result {
                error!("Metrics write task did not complete: {}", e);
            }
        }
    }

    fn reject<T>(error: LlmError) -> LlmResult<T> {
        info!("Query rejected: {}", error);
        #[cfg(feature = "metrics")]
        crate::telemetry::record_rejection(&error);
        Err(error)
    }
}
