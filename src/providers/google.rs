use crate::providers::instances::{Backend, BaseBackend};
use crate::errors::{LlmError, LlmResult};
use crate::constants;

use async_trait::async_trait;
use reqwest::header;
use serde::{Serialize, Deserialize};
use log::debug;

/// Backend client for Google's Gemini models
pub struct GoogleBackend {
    base: BaseBackend,
}

/// Request structure for Google's generateContent API
#[derive(Serialize)]
struct GoogleGenerateContentRequest {
    contents: Vec<GoogleContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GoogleGenerationConfig,
}

#[derive(Serialize, Deserialize)]
struct GoogleContent {
    role: String,
    parts: Vec<GooglePart>,
}

#[derive(Serialize, Deserialize)]
struct GooglePart {
    text: String,
}

#[derive(Serialize)]
struct GoogleGenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

/// Response structure from Google's generateContent API
#[derive(Deserialize)]
struct GoogleGenerateContentResponse {
    #[serde(default)]
    candidates: Vec<GoogleCandidate>,
}

#[derive(Deserialize)]
struct GoogleCandidate {
    content: Option<GoogleContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

impl GoogleBackend {
    /// Creates a new Google backend
    ///
    /// # Parameters
    /// * `name` - Registry name (e.g. "Gemini")
    /// * `api_key` - Google API key
    /// * `model` - Model to use (e.g. "gemini-1.5-flash")
    pub fn new(name: String, api_key: String, model: String) -> LlmResult<Self> {
        let base = BaseBackend::new(name, api_key, model)?;
        Ok(Self { base })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            constants::GOOGLE_API_ENDPOINT_PREFIX,
            self.base.model(),
            self.base.api_key()
        )
    }
}

#[async_trait]
impl Backend for GoogleBackend {
    async fn complete(&self, prompt: &str, temperature: f32, max_tokens: u32) -> LlmResult<String> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let google_request = GoogleGenerateContentRequest {
            contents: vec![GoogleContent {
                role: "user".to_string(),
                parts: vec![GooglePart { text: prompt.to_string() }],
            }],
            generation_config: GoogleGenerationConfig {
                temperature,
                max_output_tokens: max_tokens,
            },
        };

        let response = self.base.client()
            .post(self.endpoint())
            .headers(headers)
            .json(&google_request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_json: Result<serde_json::Value, _> = response.json().await;
            let error_details = match error_json {
                Ok(json) => json.get("error")
                    .and_then(|e| e.get("message"))
                    .and_then(|m| m.as_str())
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| format!("Unknown error structure: {}", json)),
                Err(_) => "Failed to parse error response body".to_string(),
            };
            return Err(LlmError::from_api_response(
                status,
                format!("Google API error ({}): {}", status, error_details),
            ));
        }

        let google_response: GoogleGenerateContentResponse = response.json().await
            .map_err(|e| LlmError::ParseError(format!("Failed to parse Google JSON response: {}", e)))?;

        let candidate = google_response.candidates.into_iter().next().ok_or_else(|| {
            LlmError::ApiError("No candidates returned from Google. Content may have been blocked.".to_string())
        })?;

        debug!("Google finish reason for '{}': {:?}", self.base.name(), candidate.finish_reason);

        let content = candidate.content.ok_or_else(|| {
            LlmError::ApiError(format!(
                "Google returned an empty candidate (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            ))
        })?;

        Ok(content.parts.into_iter().map(|part| part.text).collect::<Vec<String>>().join(""))
    }

    fn name(&self) -> &str {
        self.base.name()
    }

    fn model(&self) -> &str {
        self.base.model()
    }
}
