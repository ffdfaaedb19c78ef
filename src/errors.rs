use std::error::Error;
use std::fmt;
use std::time::Duration;
use serde_json;

/// Custom error types for orchestration operations
#[derive(Debug)]
pub enum LlmError {
    /// Error from the HTTP client
    RequestError(reqwest::Error),
    /// Error reported by a backend's API
    ApiError(String),
    /// The backend itself throttled the request
    UpstreamRateLimit(String),
    /// A backend did not answer in time
    Timeout(Duration),
    /// Parsing error
    ParseError(String),
    /// Configuration error
    ConfigError(String),
    /// The caller exhausted its request budget for the current window
    RateLimited { caller_id: String },
    /// The submitted prompt is empty or whitespace only
    EmptyPrompt,
    /// A request parameter is out of range
    InvalidParameter(String),
    /// The router could not find a single backend for the objective
    NoEligibleBackends(String),
    /// Registry lookup miss
    NotFound(String),
    /// Metrics could not be persisted
    MetricsWrite(String),
}

impl fmt::Display for LlmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmError::RequestError(err) => write!(f, "Request error: {}", err),
            LlmError::ApiError(msg) => write!(f, "API error: {}", msg),
            LlmError::UpstreamRateLimit(msg) => write!(f, "Upstream rate limit: {}", msg),
            LlmError::Timeout(after) => write!(f, "Backend timed out after {} ms", after.as_millis()),
            LlmError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            LlmError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            LlmError::RateLimited { caller_id } => write!(f, "Rate limit reached for caller '{}'", caller_id),
            LlmError::EmptyPrompt => write!(f, "Please provide a prompt"),
            LlmError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            LlmError::NoEligibleBackends(objective) => write!(f, "No eligible backends for objective '{}'", objective),
            LlmError::NotFound(name) => write!(f, "Backend not found: {}", name),
            LlmError::MetricsWrite(msg) => write!(f, "Metrics write failed: {}", msg),
        }
    }
}

impl Error for LlmError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            LlmError::RequestError(err) => Some(err),
            _ => None,
        }
    }
}

/// Convert reqwest errors to LlmError
impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        LlmError::RequestError(err)
    }
}

/// Convert serde_json errors to LlmError
impl From<serde_json::Error> for LlmError {
    fn from(err: serde_json::Error) -> Self {
        LlmError::ParseError(err.to_string())
    }
}

/// Convert std::io::Error to LlmError
impl From<std::io::Error> for LlmError {
    fn from(err: std::io::Error) -> Self {
        LlmError::MetricsWrite(err.to_string())
    }
}

/// Convert toml parsing errors to LlmError
impl From<toml::de::Error> for LlmError {
    fn from(err: toml::de::Error) -> Self {
        LlmError::ConfigError(err.to_string())
    }
}

/// Result type alias for orchestration operations
pub type LlmResult<T> = Result<T, LlmError>;

impl LlmError {
    /// Returns UpstreamRateLimit for 429 status or throttling keywords
    pub fn from_api_response(status: reqwest::StatusCode, error_message: String) -> Self {
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return LlmError::UpstreamRateLimit(error_message);
        }

        let msg_lower = error_message.to_lowercase();
        if msg_lower.contains("rate limit")
            || msg_lower.contains("too many requests")
            || msg_lower.contains("quota exceeded")
            || msg_lower.contains("overloaded")
            || msg_lower.contains("throttle") {
            return LlmError::UpstreamRateLimit(error_message);
        }

        LlmError::ApiError(error_message)
    }

    /// Whether this error means the backend ran out of time rather than failed.
    pub fn is_timeout(&self) -> bool {
        match self {
            LlmError::Timeout(_) => true,
            LlmError::RequestError(err) => err.is_timeout(),
            _ => false,
        }
    }

    /// Admission and routing errors are raised before any backend is contacted.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            LlmError::RateLimited { .. }
                | LlmError::EmptyPrompt
                | LlmError::InvalidParameter(_)
                | LlmError::NoEligibleBackends(_)
        )
    }
}
