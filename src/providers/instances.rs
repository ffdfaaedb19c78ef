use crate::providers::types::ProviderType;
use crate::providers::openai::OpenAIBackend;
use crate::providers::ollama::OllamaBackend;
use crate::providers::google::GoogleBackend;
use crate::errors::{LlmError, LlmResult};
use crate::constants;
use std::sync::Arc;

use async_trait::async_trait;
use std::time::Duration;
use reqwest::Client;

/// Common interface for all completion backends
///
/// This is the only contract the executor relies on. Each implementation
/// turns its provider's response shape into plain text or an `LlmError`
/// before returning.
#[async_trait]
pub trait Backend {
    /// Produce a completion for a single user prompt
    ///
    /// # Parameters
    /// * `prompt` - The user prompt
    /// * `temperature` - Sampling temperature in [0, 1]
    /// * `max_tokens` - Upper bound on generated tokens
    async fn complete(&self, prompt: &str, temperature: f32, max_tokens: u32) -> LlmResult<String>;
    /// Registry name of this backend
    fn name(&self) -> &str;
    /// Model identifier sent to the provider
    fn model(&self) -> &str;
}

/// Base backend implementation with common functionality
///
/// Handles common properties shared across all backends:
/// - HTTP client with timeout
/// - API key storage
/// - Model selection
pub struct BaseBackend {
    name: String,
    client: Client,
    api_key: String,
    model: String,
}

impl BaseBackend {
    /// Create a new BaseBackend
    ///
    /// # Parameters
    /// * `name` - Registry name of the backend
    /// * `api_key` - API key for authentication
    /// * `model` - Model identifier to use
    pub fn new(name: String, api_key: String, model: String) -> LlmResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(constants::HTTP_CLIENT_TIMEOUT_SECS))
            .build()
            .map_err(|e| LlmError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { name, client, api_key, model })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Factory function to create a backend client based on type
///
/// # Parameters
/// * `provider_type` - Which API family to speak
/// * `name` - Registry name the client answers to
/// * `api_key` - API key for authentication
/// * `model` - Model identifier
/// * `endpoint_url` - Optional endpoint override (Ollama only)
///
/// # Returns
/// * Arc-wrapped trait object implementing Backend
pub fn create_backend(
    provider_type: ProviderType,
    name: String,
    api_key: String,
    model: String,
    endpoint_url: Option<String>,
) -> LlmResult<Arc<dyn Backend + Send + Sync>> {
    let backend: Arc<dyn Backend + Send + Sync> = match provider_type {
        ProviderType::OpenAI => Arc::new(OpenAIBackend::new(name, api_key, model)?),
        ProviderType::Google => Arc::new(GoogleBackend::new(name, api_key, model)?),
        ProviderType::Ollama => Arc::new(OllamaBackend::new(name, api_key, model, endpoint_url)?),
    };
    Ok(backend)
}
