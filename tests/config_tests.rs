//! Tests for TOML configuration loading and parsing.

use nexusllm::config::{load_config, parse_config, Config};
use nexusllm::{LlmError, QualityClass, SpeedClass};
use std::env;
use std::io::Write;
use tempfile::NamedTempFile;

const THREE_BACKENDS: &str = r#"
[settings]
temperature = 0.4
max_tokens = 512
rate_limit_count = 3
rate_limit_window_secs = 30
per_call_timeout_secs = 15
max_concurrent_calls = 8
metrics_path = "./out/metrics.csv"

[[backends]]
name = "ChatGPT"
type = "openai"
model = "gpt-4o-mini"
api_key = "sk-test"
cost = 0.002
speed = "medium"
quality = "high"

[[backends]]
name = "Gemini"
type = "google"
model = "gemini-1.5-flash"
api_key = "g-test"
cost = 0.0005
speed = "fast"
quality = "medium"

[[backends]]
name = "LLaMa"
type = "ollama"
model = "llama3"
cost = 0.0
speed = "slow"
quality = "medium"
endpoint = "http://gpu-box:11434"
"#;

fn single_backend(extra: &str) -> String {
    format!(
        r#"
{}

[[backends]]
name = "Solo"
type = "openai"
model = "gpt-4o-mini"
api_key = "key"
cost = 0.001
speed = "fast"
quality = "low"
"#,
        extra
    )
}

// ============================================================================
// TOML Parsing Tests
// ============================================================================

#[test]
fn test_parse_full_config() {
    let config = parse_config(THREE_BACKENDS).unwrap();

    let settings = &config.settings;
    assert_eq!(settings.temperature, 0.4);
    assert_eq!(settings.max_tokens, 512);
    assert_eq!(settings.rate_limit_count, 3);
    assert_eq!(settings.rate_limit_window_secs, 30);
    assert_eq!(settings.per_call_timeout_secs, 15);
    assert_eq!(settings.max_concurrent_calls, Some(8));
    assert_eq!(settings.metrics_path.as_deref(), Some("./out/metrics.csv"));

    assert_eq!(config.backends.len(), 3);
    let gemini = &config.backends[1];
    assert_eq!(gemini.name, "Gemini");
    assert_eq!(gemini.backend_type, "google");
    assert_eq!(gemini.speed, SpeedClass::Fast);
    assert_eq!(gemini.quality, QualityClass::Medium);
    assert!(gemini.enabled);

    let llama = &config.backends[2];
    assert_eq!(llama.api_key, "");
    assert_eq!(llama.endpoint.as_deref(), Some("http://gpu-box:11434"));

    let profile = llama.profile();
    assert_eq!(profile.name, "LLaMa");
    assert_eq!(profile.unit_cost, 0.0);
    assert_eq!(profile.speed_class, SpeedClass::Slow);
}

#[test]
fn test_default_settings() {
    let config = parse_config(&single_backend("")).unwrap();
    let settings = &config.settings;

    assert_eq!(settings.temperature, 0.7);
    assert_eq!(settings.max_tokens, 1024);
    assert_eq!(settings.rate_limit_count, 10);
    assert_eq!(settings.rate_limit_window_secs, 60);
    assert_eq!(settings.per_call_timeout_secs, 30);
    assert_eq!(settings.max_concurrent_calls, None);
    assert_eq!(settings.metrics_path, None);
}

#[test]
fn test_empty_config() {
    let config: Config = parse_config("").unwrap();
    assert!(config.backends.is_empty());
}

#[test]
fn test_invalid_toml_syntax() {
    let result = parse_config("[[backends]\nname = ");
    assert!(matches!(result, Err(LlmError::ConfigError(_))));
}

#[test]
fn test_unknown_speed_class() {
    let toml = single_backend("").replace("speed = \"fast\"", "speed = \"warp\"");
    assert!(parse_config(&toml).is_err());
}

#[test]
fn test_missing_required_field() {
    let toml = single_backend("").replace("cost = 0.001\n", "");
    assert!(parse_config(&toml).is_err());
}

// ============================================================================
// Validation Tests
// ============================================================================

#[test]
fn test_invalid_backend_type() {
    let toml = single_backend("").replace("type = \"openai\"", "type = \"anthropic\"");
    let err = parse_config(&toml).unwrap_err();
    assert!(err.to_string().contains("anthropic"));
}

#[test]
fn test_duplicate_backend_names() {
    let toml = format!("{}{}", single_backend(""), single_backend(""));
    let err = parse_config(&toml).unwrap_err();
    assert!(err.to_string().contains("Solo"));
}

#[test]
fn test_temperature_out_of_range() {
    assert!(parse_config(&single_backend("[settings]\ntemperature = 1.5")).is_err());
    assert!(parse_config(&single_backend("[settings]\ntemperature = -0.1")).is_err());
    assert!(parse_config(&single_backend("[settings]\ntemperature = 1.0")).is_ok());
}

#[test]
fn test_zero_settings_rejected() {
    for setting in [
        "max_tokens = 0",
        "rate_limit_count = 0",
        "rate_limit_window_secs = 0",
        "per_call_timeout_secs = 0",
        "max_concurrent_calls = 0",
    ] {
        let toml = single_backend(&format!("[settings]\n{}", setting));
        assert!(parse_config(&toml).is_err(), "{} should be rejected", setting);
    }
}

#[test]
fn test_negative_cost_rejected() {
    let toml = single_backend("").replace("cost = 0.001", "cost = -1.0");
    assert!(parse_config(&toml).is_err());
}

// ============================================================================
// Environment Variable Tests
// ============================================================================

#[test]
fn test_env_var_resolution() {
    env::set_var("NEXUS_CONFIG_TEST_KEY", "resolved-api-key");
    let toml = single_backend("").replace("api_key = \"key\"", "api_key = \"${NEXUS_CONFIG_TEST_KEY}\"");

    let config = parse_config(&toml).unwrap();
    assert_eq!(config.backends[0].api_key, "resolved-api-key");

    env::remove_var("NEXUS_CONFIG_TEST_KEY");
}

#[test]
fn test_env_var_missing() {
    env::remove_var("NEXUS_CONFIG_MISSING_KEY");
    let toml = single_backend("").replace("api_key = \"key\"", "api_key = \"${NEXUS_CONFIG_MISSING_KEY}\"");

    let err = parse_config(&toml).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("NEXUS_CONFIG_MISSING_KEY"));
    assert!(message.contains("backends[0].api_key"));
}

#[test]
fn test_env_var_in_metrics_path() {
    env::set_var("NEXUS_CONFIG_TEST_DIR", "/var/lib/nexus");
    let toml = single_backend("[settings]\nmetrics_path = \"${NEXUS_CONFIG_TEST_DIR}/metrics.csv\"");

    let config = parse_config(&toml).unwrap();
    assert_eq!(config.settings.metrics_path.as_deref(), Some("/var/lib/nexus/metrics.csv"));

    env::remove_var("NEXUS_CONFIG_TEST_DIR");
}

#[test]
fn test_disabled_backend_skips_env_resolution() {
    env::remove_var("NEXUS_CONFIG_UNSET_KEY");
    let toml = single_backend("")
        .replace("api_key = \"key\"", "api_key = \"${NEXUS_CONFIG_UNSET_KEY}\"\nenabled = false");

    let config = parse_config(&toml).unwrap();
    assert!(!config.backends[0].enabled);
}

// ============================================================================
// File Loading Tests
// ============================================================================

#[test]
fn test_load_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(THREE_BACKENDS.as_bytes()).unwrap();

    let config = load_config(temp_file.path()).unwrap();
    assert_eq!(config.backends.len(), 3);
    assert_eq!(config.backends[0].name, "ChatGPT");
}

#[test]
fn test_load_nonexistent_file() {
    let err = load_config("/nonexistent/nexus.toml").unwrap_err();
    assert!(matches!(err, LlmError::ConfigError(_)));
    assert!(err.to_string().contains("/nonexistent/nexus.toml"));
}
