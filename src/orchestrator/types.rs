use serde::{Serialize, Deserialize};
use std::time::SystemTime;

use crate::executor::BackendOutcomes;
use crate::report::Report;
use crate::routing::Objective;

/// One caller action: a prompt to answer under an objective.
#[derive(Debug, Clone)]
pub struct QueryRequest {
    pub caller_id: String,
    pub prompt: String,
    pub objective: Objective,
    pub created_at: SystemTime,
    /// Overrides the configured temperature for this query.
    pub temperature: Option<f32>,
    /// Overrides the configured token limit for this query.
    pub max_tokens: Option<u32>,
}

impl QueryRequest {
    pub fn new(caller_id: impl Into<String>, prompt: impl Into<String>, objective: Objective) -> Self {
        Self {
            caller_id: caller_id.into(),
            prompt: prompt.into(),
            objective,
            created_at: SystemTime::now(),
            temperature: None,
            max_tokens: None,
        }
    }

    /// Sets the temperature for this query in specific
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Sets max tokens for this query in specific
    pub fn max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = Some(tokens);
        self
    }
}

/// How the fan-out went as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryStatus {
    /// Every dispatched backend answered.
    AllSucceeded,
    /// Some backends timed out or failed, at least one answered.
    Partial,
    /// No backend answered. The responses still mark each failure.
    AllBackendsFailed,
}

impl QueryStatus {
    pub fn from_outcomes(outcomes: &BackendOutcomes) -> Self {
        let succeeded = outcomes.success_count();
        if succeeded == 0 {
            QueryStatus::AllBackendsFailed
        } else if succeeded < outcomes.len() {
            QueryStatus::Partial
        } else {
            QueryStatus::AllSucceeded
        }
    }
}

/// Response structure returned to callers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Outcome of every dispatched backend, keyed by backend name.
    pub responses: BackendOutcomes,
    /// Wall time of the fan-out.
    pub elapsed_ms: u64,
    pub report: Report,
    pub status: QueryStatus,
}

impl QueryResponse {
    pub fn is_degraded(&self) -> bool {
        self.status != QueryStatus::AllSucceeded
    }
}
