//! Tests for metric records, the CSV store and metric labels.

use nexusllm::telemetry::{CsvMetricsStore, MetricRecord, MetricsRecorder, MetricsStore};
use nexusllm::{BackendOutcome, BackendOutcomes, LlmError, Objective};
use std::fs;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const HEADER: &str = "timestamp,model,latency,response_length,caller_id,objective,status";

fn record(model: &str, caller_id: &str) -> MetricRecord {
    MetricRecord {
        timestamp: 1_700_000_000,
        model: model.to_string(),
        latency: 0.25,
        response_length: 12,
        caller_id: caller_id.to_string(),
        objective: "general".to_string(),
        status: "ok".to_string(),
    }
}

// ============================================================================
// Record Tests
// ============================================================================

#[test]
fn test_record_from_outcome() {
    let ok = BackendOutcome::ok("Gemini", "hello".to_string(), 1500);
    let record = MetricRecord::from_outcome(42, "u1", Objective::FastResponse, &ok);

    assert_eq!(record.timestamp, 42);
    assert_eq!(record.model, "Gemini");
    assert_eq!(record.latency, 1.5);
    assert_eq!(record.response_length, 5);
    assert_eq!(record.caller_id, "u1");
    assert_eq!(record.objective, "fast_response");
    assert_eq!(record.status, "ok");

    let timeout = BackendOutcome::timeout("LLaMa", Duration::from_secs(30));
    let record = MetricRecord::from_outcome(42, "u1", Objective::General, &timeout);
    assert_eq!(record.status, "timeout");
    assert_eq!(record.latency, 30.0);
    assert_eq!(record.response_length, 0);
}

#[test]
fn test_caller_id_with_comma_is_quoted() {
    let line = record("ChatGPT", "team,alpha").to_csv_line();
    assert_eq!(line, "1700000000,ChatGPT,0.250,12,\"team,alpha\",general,ok");
}

// ============================================================================
// CSV Store Tests
// ============================================================================

#[test]
fn test_csv_header_written_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("metrics.csv");
    let store = CsvMetricsStore::new(&path);

    store.append(&[record("ChatGPT", "u1")]).unwrap();
    store.append(&[record("Gemini", "u2"), record("LLaMa", "u2")]).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();

    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], HEADER);
    assert_eq!(content.matches(HEADER).count(), 1);
    assert!(lines[1].contains(",ChatGPT,"));
    assert!(lines[3].contains(",LLaMa,"));
}

#[test]
fn test_csv_creates_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("metrics").join("metrics.csv");
    let store = CsvMetricsStore::new(&path);

    store.append(&[record("ChatGPT", "u1")]).unwrap();
    assert!(path.exists());
    assert_eq!(store.path(), path.as_path());
}

#[test]
fn test_csv_empty_batch_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("metrics.csv");
    let store = CsvMetricsStore::new(&path);

    store.append(&[]).unwrap();
    assert!(!path.exists());
}

#[test]
fn test_csv_unwritable_path() {
    let dir = tempfile::tempdir().unwrap();
    // A directory cannot be opened for appending
    let store = CsvMetricsStore::new(dir.path());

    let err = store.append(&[record("ChatGPT", "u1")]).unwrap_err();
    assert!(matches!(err, LlmError::MetricsWrite(_)));
}

#[test]
fn test_csv_concurrent_appends_keep_lines_whole() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("metrics.csv");
    let store = Arc::new(CsvMetricsStore::new(&path));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let caller = format!("caller-{}", i);
                for _ in 0..25 {
                    store
                        .append(&[record("ChatGPT", &caller), record("Gemini", &caller)])
                        .unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();

    assert_eq!(lines[0], HEADER);
    assert_eq!(lines.len(), 1 + 8 * 25 * 2);
    assert!(lines[1..].iter().all(|line| line.split(',').count() == 7));
}

// ============================================================================
// Recorder Tests
// ============================================================================

#[test]
fn test_recorder_writes_one_line_per_outcome() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("metrics.csv");
    let recorder = MetricsRecorder::new(Arc::new(CsvMetricsStore::new(&path)));

    let outcomes: BackendOutcomes = vec![
        BackendOutcome::ok("Gemini", "fast".to_string(), 80),
        BackendOutcome::error("ChatGPT", 15, "bad gateway"),
    ]
    .into_iter()
    .collect();

    recorder.record("u1", Objective::CostSaving, &outcomes).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].ends_with(",ChatGPT,0.015,0,u1,cost_saving,error"));
    assert!(lines[2].ends_with(",Gemini,0.080,4,u1,cost_saving,ok"));
}

// ============================================================================
// Label Tests
// ============================================================================

#[cfg(feature = "metrics")]
mod label_tests {
    use nexusllm::telemetry::labels::{error_type_label, keys};
    use nexusllm::LlmError;
    use std::time::Duration;

    #[test]
    fn test_label_keys() {
        assert_eq!(keys::BACKEND, "backend");
        assert_eq!(keys::OBJECTIVE, "objective");
        assert_eq!(keys::STATUS, "status");
        assert_eq!(keys::REASON, "reason");
    }

    #[test]
    fn test_rejection_labels() {
        let rate_limited = LlmError::RateLimited { caller_id: "u1".to_string() };
        assert_eq!(error_type_label(&rate_limited), "rate_limited");
        assert_eq!(error_type_label(&LlmError::EmptyPrompt), "empty_prompt");
        assert_eq!(
            error_type_label(&LlmError::NoEligibleBackends("coding".to_string())),
            "no_eligible_backends"
        );
    }

    #[test]
    fn test_backend_error_labels() {
        assert_eq!(error_type_label(&LlmError::ApiError("x".to_string())), "api_error");
        assert_eq!(error_type_label(&LlmError::Timeout(Duration::from_secs(1))), "timeout");
        assert_eq!(error_type_label(&LlmError::MetricsWrite("x".to_string())), "metrics_write");
    }

    #[test]
    fn test_emission_without_recorder_is_noop() {
        // The facade drops everything while no recorder is installed
        nexusllm::describe_metrics();
        nexusllm::telemetry::record_rejection(&LlmError::EmptyPrompt);
        nexusllm::telemetry::record_store_failure();
    }
}
