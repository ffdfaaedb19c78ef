//! Cost and latency summary of one query.

use serde::{Serialize, Deserialize};
use std::collections::BTreeMap;

use crate::constants;
use crate::executor::BackendOutcomes;
use crate::registry::ModelRegistry;

/// Mean and maximum latency over every dispatched backend.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LatencySummary {
    pub mean_ms: f64,
    pub max_ms: u64,
}

/// Data a report consumer needs to render the cost view.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Report {
    pub estimated_cost: f64,
    pub latency_summary: LatencySummary,
    pub prompt_tokens: usize,
    /// Cost contribution of each successful backend.
    pub cost_by_backend: BTreeMap<String, f64>,
}

/// Rough token count used for cost estimates: one token per four characters, rounded up.
pub fn approximate_token_count(text: &str) -> usize {
    text.chars().count().div_ceil(constants::CHARS_PER_TOKEN)
}

/// Summarizes cost and latency for a batch of outcomes
///
/// Cost only counts `Ok` outcomes whose backend is in `registry`. Latency
/// covers every outcome, including timeouts and errors.
///
/// # Parameters
/// * `prompt` - The prompt the outcomes answer
/// * `outcomes` - Outcomes of the fan-out
/// * `registry` - Source of each backend's unit cost
pub fn summarize(prompt: &str, outcomes: &BackendOutcomes, registry: &ModelRegistry) -> Report {
    let mut cost_by_backend = BTreeMap::new();

    for outcome in outcomes.iter().filter(|o| o.is_ok()) {
        let Ok(profile) = registry.get(&outcome.backend_name) else {
            continue;
        };
        let tokens = outcome.text.as_deref().map(approximate_token_count).unwrap_or(0);
        cost_by_backend.insert(outcome.backend_name.clone(), profile.unit_cost * tokens as f64);
    }

    // BTreeMap order keeps the floating point sum stable across calls
    let estimated_cost = cost_by_backend.values().sum();

    let latency_summary = if outcomes.is_empty() {
        LatencySummary::default()
    } else {
        let total: u64 = outcomes.iter().map(|o| o.latency_ms).sum();
        LatencySummary {
            mean_ms: total as f64 / outcomes.len() as f64,
            max_ms: outcomes.iter().map(|o| o.latency_ms).max().unwrap_or(0),
        }
    };

    Report {
        estimated_cost,
        latency_summary,
        prompt_tokens: approximate_token_count(prompt),
        cost_by_backend,
    }
}
