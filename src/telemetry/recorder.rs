//! Turns a batch of outcomes into stored metric records.

use log::debug;
use std::sync::Arc;

use crate::errors::LlmResult;
use crate::executor::BackendOutcomes;
use crate::routing::Objective;

use super::store::{unix_timestamp, MetricRecord, MetricsStore};

/// Appends one record per backend outcome to a [`MetricsStore`].
#[derive(Clone)]
pub struct MetricsRecorder {
    store: Arc<dyn MetricsStore + Send + Sync>,
}

impl MetricsRecorder {
    pub fn new(store: Arc<dyn MetricsStore + Send + Sync>) -> Self {
        Self { store }
    }

    /// Record the outcomes of one query
    ///
    /// # Parameters
    /// * `caller_id` - Caller the query was made for
    /// * `objective` - Objective the backends were routed by
    /// * `outcomes` - Every dispatched backend's outcome
    ///
    /// # Returns
    /// * `MetricsWrite` if the store rejected the batch
    pub fn record(&self, caller_id: &str, objective: Objective, outcomes: &BackendOutcomes) -> LlmResult<()> {
        let timestamp = unix_timestamp();
        let mut records: Vec<MetricRecord> = outcomes
            .iter()
            .map(|outcome| MetricRecord::from_outcome(timestamp, caller_id, objective, outcome))
            .collect();
        records.sort_by(|a, b| a.model.cmp(&b.model));

        self.store.append(&records)?;
        debug!("Recorded {} metric records for caller '{}'", records.len(), caller_id);
        Ok(())
    }
}
