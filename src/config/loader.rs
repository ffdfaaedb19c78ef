//! Configuration file loading and environment variable resolution.

use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::Path;
use regex::Regex;

use crate::errors::{LlmError, LlmResult};
use crate::providers::ProviderType;
use super::types::Config;

/// Load and parse a TOML configuration file.
///
/// # Arguments
/// * `path` - Path to the TOML configuration file
///
/// # Returns
/// * `LlmResult<Config>` - Parsed configuration with environment variables resolved
///
/// # Example
/// ```no_run
/// use nexusllm::config::load_config;
///
/// let config = load_config("nexus.toml").unwrap();
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> LlmResult<Config> {
    let path = path.as_ref();

    let content = fs::read_to_string(path).map_err(|e| {
        LlmError::ConfigError(format!(
            "Failed to read config file '{}': {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&content)
}

/// Parse a TOML configuration string.
///
/// # Arguments
/// * `content` - TOML configuration string
///
/// # Returns
/// * `LlmResult<Config>` - Parsed configuration with environment variables resolved
pub fn parse_config(content: &str) -> LlmResult<Config> {
    let mut config: Config = toml::from_str(content).map_err(|e| {
        LlmError::ConfigError(format!("Failed to parse TOML: {}", e))
    })?;

    resolve_env_vars(&mut config)?;
    validate_config(&config)?;

    Ok(config)
}

fn env_var_pattern() -> LlmResult<Regex> {
    Regex::new(r"\$\{([^}]+)\}")
        .map_err(|e| LlmError::ConfigError(format!("Invalid environment variable pattern: {}", e)))
}

/// Resolve environment variable references in the configuration.
///
/// Environment variables are specified using the `${VAR_NAME}` syntax.
/// If a variable is not found, an error is returned with a helpful message.
fn resolve_env_vars(config: &mut Config) -> LlmResult<()> {
    let pattern = env_var_pattern()?;

    for (idx, backend) in config.backends.iter_mut().enumerate() {
        // Disabled backends may reference variables that are not set
        if !backend.enabled {
            continue;
        }

        let location = format!("backends[{}].api_key", idx);
        if let Some(resolved) = resolve_env_var_string(&backend.api_key, &pattern, &location)? {
            backend.api_key = resolved;
        }

        if let Some(ref endpoint) = backend.endpoint {
            let location = format!("backends[{}].endpoint", idx);
            if let Some(resolved) = resolve_env_var_string(endpoint, &pattern, &location)? {
                backend.endpoint = Some(resolved);
            }
        }
    }

    if let Some(ref path) = config.settings.metrics_path {
        if let Some(resolved) = resolve_env_var_string(path, &pattern, "settings.metrics_path")? {
            config.settings.metrics_path = Some(resolved);
        }
    }

    Ok(())
}

/// Resolve environment variables in a single string.
/// Returns None if no env vars are present, Some(resolved) if all resolved successfully.
fn resolve_env_var_string(s: &str, pattern: &Regex, location: &str) -> LlmResult<Option<String>> {
    if !pattern.is_match(s) {
        return Ok(None);
    }

    let mut result = s.to_string();

    for caps in pattern.captures_iter(s) {
        let (Some(full_match), Some(var_name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let var_name = var_name.as_str();

        match env::var(var_name) {
            Ok(value) => {
                result = result.replace(full_match.as_str(), &value);
            }
            Err(_) => {
                return Err(LlmError::ConfigError(format!(
                    "Environment variable '{}' not found\n  \
                     → Referenced in {}\n  \
                     → Set it with: export {}=\"your-value\"",
                    var_name, location, var_name
                )));
            }
        }
    }

    Ok(Some(result))
}

/// Validate the configuration for consistency.
fn validate_config(config: &Config) -> LlmResult<()> {
    let settings = &config.settings;

    if !(0.0..=1.0).contains(&settings.temperature) {
        return Err(LlmError::ConfigError(format!(
            "Temperature {} is out of range\n  → Use a value between 0.0 and 1.0",
            settings.temperature
        )));
    }
    if settings.max_tokens == 0 {
        return Err(LlmError::ConfigError("max_tokens must be greater than 0".to_string()));
    }
    if settings.rate_limit_count == 0 {
        return Err(LlmError::ConfigError("rate_limit_count must be greater than 0".to_string()));
    }
    if settings.rate_limit_window_secs == 0 {
        return Err(LlmError::ConfigError("rate_limit_window_secs must be greater than 0".to_string()));
    }
    if settings.per_call_timeout_secs == 0 {
        return Err(LlmError::ConfigError("per_call_timeout_secs must be greater than 0".to_string()));
    }
    if settings.max_concurrent_calls == Some(0) {
        return Err(LlmError::ConfigError("max_concurrent_calls must be greater than 0 when set".to_string()));
    }

    let mut seen_names = HashSet::new();
    for (idx, backend) in config.backends.iter().enumerate() {
        backend.backend_type.parse::<ProviderType>().map_err(|_| {
            LlmError::ConfigError(format!(
                "Unknown backend type '{}' in backends[{}]\n  \
                 → Valid types: {}",
                backend.backend_type,
                idx,
                ProviderType::VALID_NAMES.join(", ")
            ))
        })?;

        if !seen_names.insert(backend.name.as_str()) {
            return Err(LlmError::ConfigError(format!(
                "Backend '{}' is defined more than once\n  → Backend names must be unique",
                backend.name
            )));
        }

        if !backend.cost.is_finite() || backend.cost < 0.0 {
            return Err(LlmError::ConfigError(format!(
                "Backend '{}' has invalid cost {}\n  → Costs must be finite and non-negative",
                backend.name, backend.cost
            )));
        }
    }

    Ok(())
}
