// General
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
pub const DEFAULT_PER_CALL_TIMEOUT_SECS: u64 = 30;
pub const HTTP_CLIENT_TIMEOUT_SECS: u64 = 120;

// Rate limiting
pub const DEFAULT_RATE_LIMIT_COUNT: u32 = 10;
pub const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 60;
/// Calls to `RateLimiter::check` between sweeps of expired caller windows
pub const RATE_LIMIT_PURGE_INTERVAL: u64 = 1024;

// Metrics
pub const DEFAULT_METRICS_PATH: &str = "data/metrics/metrics.csv";
pub const METRICS_CSV_HEADER: &str = "timestamp,model,latency,response_length,caller_id,objective,status";

// Report
pub const CHARS_PER_TOKEN: usize = 4;

// OpenAI
pub const OPENAI_API_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

// Google
pub const GOOGLE_API_ENDPOINT_PREFIX: &str = "https://generativelanguage.googleapis.com";

// Ollama
pub const OLLAMA_API_ENDPOINT: &str = "http://localhost:11434/api/chat";
