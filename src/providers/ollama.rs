use crate::providers::instances::{Backend, BaseBackend};
use crate::providers::types::Message;
use crate::errors::{LlmError, LlmResult};
use crate::constants;
use async_trait::async_trait;
use log::warn;
use reqwest::header;
use serde::{Serialize, Deserialize};
use url::Url;

/// Backend client for Ollama (locally hosted models such as LLaMa)
pub struct OllamaBackend {
    base: BaseBackend,
    endpoint_url: String,
}

/// Request structure for Ollama's chat API
#[derive(Serialize)]
struct OllamaRequest {
    model: String,
    messages: Vec<Message>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32, // Corresponds to max_tokens
}

/// Response structure from Ollama's chat API (non-streaming)
#[derive(Deserialize, Debug)]
struct OllamaResponse {
    message: Message,
}

/// Normalizes an endpoint so that its path ends with `/api/chat`.
///
/// Invalid URLs fall back to the default local endpoint.
pub fn normalize_endpoint(base_endpoint: &str) -> String {
    match Url::parse(base_endpoint) {
        Ok(mut url) => {
            if !url.path().ends_with("/api/chat") {
                if url.path() == "/" {
                    url.set_path("api/chat");
                } else {
                    let current_path = url.path().trim_end_matches('/').to_string();
                    url.set_path(&format!("{}/api/chat", current_path));
                }
            }
            url.to_string()
        }
        Err(_) => {
            warn!(
                "Invalid Ollama endpoint URL '{}' provided. Falling back to default: {}",
                base_endpoint, constants::OLLAMA_API_ENDPOINT
            );
            constants::OLLAMA_API_ENDPOINT.to_string()
        }
    }
}

impl OllamaBackend {
    /// Creates a new Ollama backend
    ///
    /// # Parameters
    /// * `name` - Registry name (e.g. "LLaMa")
    /// * `api_key` - Optional bearer token; empty for a plain local server
    /// * `model` - Model to use (e.g. "llama3")
    /// * `endpoint_url` - Base endpoint override, defaults to the local server
    pub fn new(name: String, api_key: String, model: String, endpoint_url: Option<String>) -> LlmResult<Self> {
        let endpoint_url = normalize_endpoint(
            endpoint_url.as_deref().unwrap_or(constants::OLLAMA_API_ENDPOINT),
        );
        let base = BaseBackend::new(name, api_key, model)?;

        Ok(Self { base, endpoint_url })
    }

    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }
}

#[async_trait]
impl Backend for OllamaBackend {
    async fn complete(&self, prompt: &str, temperature: f32, max_tokens: u32) -> LlmResult<String> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        if !self.base.api_key().is_empty() {
            let value = header::HeaderValue::from_str(&format!("Bearer {}", self.base.api_key()))
                .map_err(|e| LlmError::ConfigError(format!("Invalid API key format for Ollama: {}", e)))?;
            headers.insert(header::AUTHORIZATION, value);
        }

        let ollama_request = OllamaRequest {
            model: self.base.model().to_string(),
            messages: vec![Message::user(prompt)],
            stream: false,
            options: OllamaOptions {
                temperature,
                num_predict: max_tokens,
            },
        };

        let response = self.base.client()
            .post(&self.endpoint_url)
            .headers(headers)
            .json(&ollama_request)
            .send()
            .await?;

        let response_status = response.status();
        if !response_status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| format!("Unknown error. Status: {}", response_status));
            return Err(LlmError::from_api_response(response_status, format!("Ollama API error: {}", error_text)));
        }

        let response_text = response.text().await?;
        if response_text.is_empty() {
            return Err(LlmError::ApiError("Received empty response body from Ollama".to_string()));
        }

        let ollama_response: OllamaResponse = serde_json::from_str(&response_text)
            .map_err(|e| LlmError::ParseError(format!("Failed to parse Ollama JSON response: {}. Body: {}", e, response_text)))?;

        Ok(ollama_response.message.content)
    }

    fn name(&self) -> &str {
        self.base.name()
    }

    fn model(&self) -> &str {
        self.base.model()
    }
}
