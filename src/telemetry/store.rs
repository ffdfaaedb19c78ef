//! Append-only sinks for metric records.

use serde::{Serialize, Deserialize};
use std::fs::{create_dir_all, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::constants;
use crate::errors::{LlmError, LlmResult};
use crate::executor::BackendOutcome;
use crate::routing::Objective;

/// Persisted projection of one backend outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    /// Seconds since the Unix epoch.
    pub timestamp: u64,
    pub model: String,
    /// Seconds spent on the call.
    pub latency: f64,
    pub response_length: usize,
    pub caller_id: String,
    pub objective: String,
    pub status: String,
}

impl MetricRecord {
    pub fn from_outcome(timestamp: u64, caller_id: &str, objective: Objective, outcome: &BackendOutcome) -> Self {
        Self {
            timestamp,
            model: outcome.backend_name.clone(),
            latency: outcome.latency_ms as f64 / 1000.0,
            response_length: outcome.response_length,
            caller_id: caller_id.to_string(),
            objective: objective.as_label().to_string(),
            status: outcome.status.as_label().to_string(),
        }
    }

    /// One CSV line, without the trailing newline, in header column order.
    pub fn to_csv_line(&self) -> String {
        format!(
            "{},{},{:.3},{},{},{},{}",
            self.timestamp,
            csv_field(&self.model),
            self.latency,
            self.response_length,
            csv_field(&self.caller_id),
            csv_field(&self.objective),
            csv_field(&self.status),
        )
    }
}

/// Quotes a field when it contains a separator, a quote or a line break.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Durable, append-only destination for metric records.
///
/// Implementations must accept concurrent calls; each call either appends
/// all of its records as whole entries or reports an error.
pub trait MetricsStore {
    fn append(&self, records: &[MetricRecord]) -> LlmResult<()>;
}

/// CSV file sink, the format the dashboards chart from.
#[derive(Debug)]
pub struct CsvMetricsStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl Default for CsvMetricsStore {
    fn default() -> Self {
        Self::new(constants::DEFAULT_METRICS_PATH)
    }
}

impl CsvMetricsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MetricsStore for CsvMetricsStore {
    fn append(&self, records: &[MetricRecord]) -> LlmResult<()> {
        if records.is_empty() {
            return Ok(());
        }

        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| LlmError::MetricsWrite("metrics file lock poisoned".to_string()))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent).map_err(|e| {
                    LlmError::MetricsWrite(format!("Failed to create metrics directory: {}", e))
                })?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                LlmError::MetricsWrite(format!("Failed to open '{}': {}", self.path.display(), e))
            })?;

        let mut buffer = String::new();
        if file.metadata()?.len() == 0 {
            buffer.push_str(constants::METRICS_CSV_HEADER);
            buffer.push('\n');
        }
        for record in records {
            buffer.push_str(&record.to_csv_line());
            buffer.push('\n');
        }

        file.write_all(buffer.as_bytes()).map_err(|e| {
            LlmError::MetricsWrite(format!("Failed to write '{}': {}", self.path.display(), e))
        })?;

        Ok(())
    }
}

/// Process-local sink, handy for tests and embedding.
#[derive(Debug, Default)]
pub struct InMemoryMetricsStore {
    records: Mutex<Vec<MetricRecord>>,
}

impl InMemoryMetricsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<MetricRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MetricsStore for InMemoryMetricsStore {
    fn append(&self, records: &[MetricRecord]) -> LlmResult<()> {
        let mut stored = self
            .records
            .lock()
            .map_err(|_| LlmError::MetricsWrite("in-memory metrics lock poisoned".to_string()))?;
        stored.extend_from_slice(records);
        Ok(())
    }
}
