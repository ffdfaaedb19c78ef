use serde::{Serialize, Deserialize};
use std::str::FromStr;

use crate::errors::LlmError;

/// The API family a backend client speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderType {
    OpenAI,
    Google,
    Ollama,
}

impl ProviderType {
    pub const VALID_NAMES: [&'static str; 3] = ["openai", "google", "ollama"];
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderType::OpenAI => write!(f, "OpenAI"),
            ProviderType::Google => write!(f, "Google"),
            ProviderType::Ollama => write!(f, "Ollama"),
        }
    }
}

impl FromStr for ProviderType {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(ProviderType::OpenAI),
            "google" => Ok(ProviderType::Google),
            "ollama" => Ok(ProviderType::Ollama),
            _ => Err(LlmError::ConfigError(format!(
                "Unknown backend type '{}'\n  → Valid types: {}",
                s,
                ProviderType::VALID_NAMES.join(", ")
            ))),
        }
    }
}

/// Chat message in the role/content shape shared by OpenAI and Ollama.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Message {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}
