//! Concurrent fan-out of one prompt to several backends.
//!
//! Every selected backend is invoked on its own task. A per-call timeout
//! cancels only the invocation it guards, and the batch returns once every
//! invocation has reached a terminal state.

mod outcome;

pub use outcome::{BackendOutcome, BackendOutcomes, OutcomeStatus};

use futures::future::join_all;
use log::{debug, error, warn};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time::{timeout, Instant};

use crate::constants;
use crate::providers::Backend;
use crate::registry::BackendProfile;
use outcome::duration_ms;

/// Generation parameters passed to every backend of a batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for CompletionParams {
    fn default() -> Self {
        Self {
            temperature: constants::DEFAULT_TEMPERATURE,
            max_tokens: constants::DEFAULT_MAX_TOKENS,
        }
    }
}

/// Binds registry names to backend clients and runs fan-outs over them.
pub struct ParallelExecutor {
    backends: HashMap<String, Arc<dyn Backend + Send + Sync>>,
    /// Global cap on in-flight calls, shared by all concurrent batches.
    permits: Option<Arc<Semaphore>>,
}

impl Default for ParallelExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl ParallelExecutor {
    pub fn new() -> Self {
        Self {
            backends: HashMap::new(),
            permits: None,
        }
    }

    /// Caps the number of outbound calls in flight across all requests.
    pub fn with_max_concurrent_calls(mut self, max_calls: usize) -> Self {
        self.permits = Some(Arc::new(Semaphore::new(max_calls.max(1))));
        self
    }

    /// Binds a client to the registry name it reports through [`Backend::name`].
    pub fn register(&mut self, backend: Arc<dyn Backend + Send + Sync>) {
        let name = backend.name().to_string();
        if self.backends.insert(name.clone(), backend).is_some() {
            warn!("Backend client for '{}' replaced", name);
        }
    }

    pub fn is_bound(&self, backend_name: &str) -> bool {
        self.backends.contains_key(backend_name)
    }

    pub fn bound_count(&self) -> usize {
        self.backends.len()
    }

    /// Permits currently free under the global cap, if one is set.
    pub fn available_permits(&self) -> Option<usize> {
        self.permits.as_ref().map(|p| p.available_permits())
    }

    /// Invokes every backend in `backends` concurrently
    ///
    /// # Parameters
    /// * `prompt` - Prompt sent to each backend
    /// * `backends` - Backends to dispatch to, duplicates are dispatched once
    /// * `params` - Temperature and token limit for every call
    /// * `per_call_timeout` - Deadline for each individual call
    ///
    /// # Returns
    /// * One outcome per dispatched backend. Failures are recorded as
    ///   `Timeout` or `Error` outcomes and never abort the batch.
    pub async fn execute(
        &self,
        prompt: &str,
        backends: &[BackendProfile],
        params: CompletionParams,
        per_call_timeout: Duration,
    ) -> BackendOutcomes {
        let batch_start = Instant::now();
        let prompt: Arc<str> = Arc::from(prompt);
        let mut outcomes = BackendOutcomes::new();
        let mut dispatched = HashSet::new();
        let mut handles = Vec::with_capacity(backends.len());

        for profile in backends {
            if !dispatched.insert(profile.name.as_str()) {
                continue;
            }

            let Some(backend) = self.backends.get(&profile.name) else {
                warn!("No client bound for backend '{}'", profile.name);
                outcomes.insert(BackendOutcome::error(
                    profile.name.clone(),
                    0,
                    format!("no client bound for backend '{}'", profile.name),
                ));
                continue;
            };

            let handle = tokio::spawn(invoke(
                profile.name.clone(),
                Arc::clone(backend),
                Arc::clone(&prompt),
                params,
                per_call_timeout,
                self.permits.clone(),
            ));
            handles.push((profile.name.clone(), handle));
        }

        debug!("Dispatched {} backend calls", handles.len());

        let joined = join_all(
            handles
                .into_iter()
                .map(|(name, handle)| async move { (name, handle.await) }),
        )
        .await;

        for (name, result) in joined {
            match result {
                Ok(outcome) => outcomes.insert(outcome),
                Err(join_error) => {
                    error!("Backend task for '{}' did not complete: {}", name, join_error);
                    outcomes.insert(BackendOutcome::error(
                        name,
                        duration_ms(batch_start.elapsed()),
                        format!("backend task failed: {}", join_error),
                    ));
                }
            }
        }

        debug!(
            "Batch finished in {:?}: {}/{} backends succeeded",
            batch_start.elapsed(),
            outcomes.success_count(),
            outcomes.len()
        );

        outcomes
    }
}

/// Runs one backend call under its own deadline.
///
/// The global permit, if any, is held until the call reaches a terminal
/// state and is released when this future completes or is dropped.
async fn invoke(
    name: String,
    backend: Arc<dyn Backend + Send + Sync>,
    prompt: Arc<str>,
    params: CompletionParams,
    per_call_timeout: Duration,
    permits: Option<Arc<Semaphore>>,
) -> BackendOutcome {
    let _permit = match permits {
        Some(semaphore) => match semaphore.acquire_owned().await {
            Ok(permit) => Some(permit),
            Err(_) => return BackendOutcome::error(name, 0, "concurrency limiter closed"),
        },
        None => None,
    };

    let start = Instant::now();
    let call = backend.complete(&prompt, params.temperature, params.max_tokens);

    match timeout(per_call_timeout, call).await {
        Ok(Ok(text)) => {
            let outcome = BackendOutcome::ok(name, text, duration_ms(start.elapsed()));
            debug!(
                "Backend '{}' answered in {} ms ({} chars)",
                outcome.backend_name, outcome.latency_ms, outcome.response_length
            );
            outcome
        }
        Ok(Err(e)) if e.is_timeout() => {
            warn!("Backend '{}' timed out in transport: {}", name, e);
            BackendOutcome {
                latency_ms: duration_ms(start.elapsed()),
                error: Some(e.to_string()),
                ..BackendOutcome::timeout(name, per_call_timeout)
            }
        }
        Ok(Err(e)) => {
            warn!("Backend '{}' failed: {}", name, e);
            BackendOutcome::error(name, duration_ms(start.elapsed()), e.to_string())
        }
        Err(_) => {
            warn!("Backend '{}' exceeded {:?}", name, per_call_timeout);
            BackendOutcome::timeout(name, per_call_timeout)
        }
    }
}
