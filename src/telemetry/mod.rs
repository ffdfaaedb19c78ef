//! Telemetry for nexusllm
//!
//! Every query appends one [`MetricRecord`] per backend outcome to a
//! durable [`MetricsStore`]. Dashboards read that store on their own.
//!
//! With the `metrics` feature enabled the same outcomes are also emitted as
//! counters and histograms through the `metrics` facade.
//!
//! # Example
//!
//! ```ignore
//! use nexusllm::telemetry::describe_metrics;
//! use metrics_exporter_prometheus::PrometheusBuilder;
//!
//! // User sets up their preferred exporter
//! PrometheusBuilder::new()
//!     .with_http_listener(([127, 0, 0, 1], 9090))
//!     .install()
//!     .expect("prometheus setup");
//!
//! describe_metrics();
//! ```

pub mod store;
mod recorder;

#[cfg(feature = "metrics")]
pub mod labels;
#[cfg(feature = "metrics")]
mod counters;

pub use recorder::MetricsRecorder;
pub use store::{CsvMetricsStore, InMemoryMetricsStore, MetricRecord, MetricsStore};

#[cfg(feature = "metrics")]
pub use counters::*;

/// Metric name constants
#[cfg(feature = "metrics")]
pub mod names {
    /// Total number of backend invocations
    pub const BACKEND_CALLS_TOTAL: &str = "nexus_backend_calls_total";
    /// Backend call latency in seconds
    pub const BACKEND_LATENCY: &str = "nexus_backend_latency_seconds";
    /// Backend invocations ending in timeout or error
    pub const BACKEND_FAILURES_TOTAL: &str = "nexus_backend_failures_total";
    /// Queries rejected before fan-out
    pub const ADMISSION_REJECTIONS_TOTAL: &str = "nexus_admission_rejections_total";
    /// Metric store appends that failed
    pub const STORE_FAILURES_TOTAL: &str = "nexus_metrics_store_failures_total";
}

/// Describe all metrics with their units and descriptions.
/// Call this after setting up your metrics exporter for better discovery.
#[cfg(feature = "metrics")]
pub fn describe_metrics() {
    use metrics::{describe_counter, describe_histogram, Unit};

    describe_counter!(
        names::BACKEND_CALLS_TOTAL,
        Unit::Count,
        "Total number of backend invocations"
    );
    describe_histogram!(
        names::BACKEND_LATENCY,
        Unit::Seconds,
        "Backend call latency in seconds"
    );
    describe_counter!(
        names::BACKEND_FAILURES_TOTAL,
        Unit::Count,
        "Backend invocations ending in timeout or error"
    );
    describe_counter!(
        names::ADMISSION_REJECTIONS_TOTAL,
        Unit::Count,
        "Queries rejected before any backend was contacted"
    );
    describe_counter!(
        names::STORE_FAILURES_TOTAL,
        Unit::Count,
        "Metric store appends that failed"
    );
}
