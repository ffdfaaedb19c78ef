use serde::{Serialize, Deserialize};
use std::collections::HashMap;
use std::time::Duration;

/// Terminal state of one backend invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Ok,
    Timeout,
    Error,
}

impl OutcomeStatus {
    pub fn as_label(&self) -> &'static str {
        match self {
            OutcomeStatus::Ok => "ok",
            OutcomeStatus::Timeout => "timeout",
            OutcomeStatus::Error => "error",
        }
    }
}

/// Result of invoking one backend for one request. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendOutcome {
    pub backend_name: String,
    pub status: OutcomeStatus,
    /// Present iff `status` is `Ok`.
    pub text: Option<String>,
    /// Failure description for `Timeout` and `Error`.
    pub error: Option<String>,
    pub latency_ms: u64,
    /// Length of `text` in characters, zero on failure.
    pub response_length: usize,
}

impl BackendOutcome {
    pub fn ok(backend_name: impl Into<String>, text: String, latency_ms: u64) -> Self {
        let response_length = text.chars().count();
        Self {
            backend_name: backend_name.into(),
            status: OutcomeStatus::Ok,
            text: Some(text),
            error: None,
            latency_ms,
            response_length,
        }
    }

    /// Timed-out invocations report the full timeout as their latency.
    pub fn timeout(backend_name: impl Into<String>, per_call_timeout: Duration) -> Self {
        Self {
            backend_name: backend_name.into(),
            status: OutcomeStatus::Timeout,
            text: None,
            error: Some(format!("timed out after {} ms", per_call_timeout.as_millis())),
            latency_ms: duration_ms(per_call_timeout),
            response_length: 0,
        }
    }

    pub fn error(backend_name: impl Into<String>, latency_ms: u64, message: impl Into<String>) -> Self {
        Self {
            backend_name: backend_name.into(),
            status: OutcomeStatus::Error,
            text: None,
            error: Some(message.into()),
            latency_ms,
            response_length: 0,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == OutcomeStatus::Ok
    }
}

/// Outcomes of one fan-out, keyed by backend name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BackendOutcomes {
    outcomes: HashMap<String, BackendOutcome>,
}

impl BackendOutcomes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, outcome: BackendOutcome) {
        self.outcomes.insert(outcome.backend_name.clone(), outcome);
    }

    pub fn get(&self, backend_name: &str) -> Option<&BackendOutcome> {
        self.outcomes.get(backend_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BackendOutcome> {
        self.outcomes.values()
    }

    /// Backend names sorted alphabetically, for stable presentation.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.outcomes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn success_count(&self) -> usize {
        self.iter().filter(|o| o.is_ok()).count()
    }

    /// True when at least one backend was dispatched and none succeeded.
    pub fn all_failed(&self) -> bool {
        !self.outcomes.is_empty() && self.success_count() == 0
    }

    pub fn into_inner(self) -> HashMap<String, BackendOutcome> {
        self.outcomes
    }
}

impl FromIterator<BackendOutcome> for BackendOutcomes {
    fn from_iter<I: IntoIterator<Item = BackendOutcome>>(iter: I) -> Self {
        let mut outcomes = BackendOutcomes::new();
        for outcome in iter {
            outcomes.insert(outcome);
        }
        outcomes
    }
}

pub(crate) fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
