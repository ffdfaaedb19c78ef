//! Label helpers for consistent metric labeling

use crate::errors::LlmError;

/// Standard label keys
pub mod keys {
    /// Backend name label key
    pub const BACKEND: &str = "backend";
    /// Objective label key
    pub const OBJECTIVE: &str = "objective";
    /// Outcome status label key
    pub const STATUS: &str = "status";
    /// Rejection reason label key
    pub const REASON: &str = "reason";
}

/// Convert LlmError to error type label string
pub fn error_type_label(error: &LlmError) -> &'static str {
    match error {
        LlmError::RequestError(_) => "request_error",
        LlmError::ApiError(_) => "api_error",
        LlmError::UpstreamRateLimit(_) => "upstream_rate_limit",
        LlmError::Timeout(_) => "timeout",
        LlmError::ParseError(_) => "parse_error",
        LlmError::ConfigError(_) => "config_error",
        LlmError::RateLimited { .. } => "rate_limited",
        LlmError::EmptyPrompt => "empty_prompt",
        LlmError::InvalidParameter(_) => "invalid_parameter",
        LlmError::NoEligibleBackends(_) => "no_eligible_backends",
        LlmError::NotFound(_) => "not_found",
        LlmError::MetricsWrite(_) => "metrics_write",
    }
}
