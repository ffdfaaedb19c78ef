use crate::providers::instances::{Backend, BaseBackend};
use crate::providers::types::Message;
use crate::errors::{LlmError, LlmResult};
use crate::constants;

use async_trait::async_trait;
use reqwest::header;
use serde::{Serialize, Deserialize};

/// Backend client for OpenAI's chat completion API (GPT models)
pub struct OpenAIBackend {
    base: BaseBackend,
}

/// Request structure for OpenAI's chat completion API
#[derive(Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<Message>,
    max_tokens: u32,
    temperature: f32,
}

/// Response structure from OpenAI's chat completion API
#[derive(Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
}

#[derive(Deserialize)]
struct OpenAIChoice {
    message: Message,
}

impl OpenAIBackend {
    /// Creates a new OpenAI backend
    ///
    /// # Parameters
    /// * `name` - Registry name (e.g. "ChatGPT")
    /// * `api_key` - OpenAI API key
    /// * `model` - Model to use (e.g. "gpt-4o-mini")
    pub fn new(name: String, api_key: String, model: String) -> LlmResult<Self> {
        let base = BaseBackend::new(name, api_key, model)?;
        Ok(Self { base })
    }

    fn build_headers(&self) -> Result<header::HeaderMap, LlmError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", self.base.api_key()))
                .map_err(|e| LlmError::ConfigError(format!("Invalid API key format: {}", e)))?,
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        Ok(headers)
    }
}

#[async_trait]
impl Backend for OpenAIBackend {
    async fn complete(&self, prompt: &str, temperature: f32, max_tokens: u32) -> LlmResult<String> {
        let headers = self.build_headers()?;

        let openai_request = OpenAIRequest {
            model: self.base.model().to_string(),
            messages: vec![Message::user(prompt)],
            max_tokens,
            temperature,
        };

        let response = self.base.client()
            .post(constants::OPENAI_API_ENDPOINT)
            .headers(headers)
            .json(&openai_request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::from_api_response(status, format!("OpenAI API error: {}", error_text)));
        }

        let openai_response: OpenAIResponse = response.json().await?;

        match openai_response.choices.into_iter().next() {
            Some(choice) => Ok(choice.message.content),
            None => Err(LlmError::ApiError("No response from OpenAI".to_string())),
        }
    }

    fn name(&self) -> &str {
        self.base.name()
    }

    fn model(&self) -> &str {
        self.base.model()
    }
}
