//! Metric emission through the `metrics` facade

use std::time::Duration;

use crate::errors::LlmError;
use crate::executor::{BackendOutcome, OutcomeStatus};
use crate::routing::Objective;

use super::{labels, names};

/// Record one backend call
pub fn record_outcome(objective: Objective, outcome: &BackendOutcome) {
    metrics::counter!(
        names::BACKEND_CALLS_TOTAL,
        labels::keys::BACKEND => outcome.backend_name.clone(),
        labels::keys::OBJECTIVE => objective.as_label()
    )
    .increment(1);

    // Duration is recorded for failures too, they reflect time spent
    metrics::histogram!(
        names::BACKEND_LATENCY,
        labels::keys::BACKEND => outcome.backend_name.clone(),
        labels::keys::STATUS => outcome.status.as_label()
    )
    .record(Duration::from_millis(outcome.latency_ms).as_secs_f64());

    if outcome.status != OutcomeStatus::Ok {
        metrics::counter!(
            names::BACKEND_FAILURES_TOTAL,
            labels::keys::BACKEND => outcome.backend_name.clone(),
            labels::keys::STATUS => outcome.status.as_label()
        )
        .increment(1);
    }
}

/// Record a query rejected before any backend was contacted
pub fn record_rejection(error: &LlmError) {
    metrics::counter!(
        names::ADMISSION_REJECTIONS_TOTAL,
        labels::keys::REASON => labels::error_type_label(error)
    )
    .increment(1);
}

/// Record a metrics store failure
pub fn record_store_failure() {
    metrics::counter!(names::STORE_FAILURES_TOTAL).increment(1);
}
