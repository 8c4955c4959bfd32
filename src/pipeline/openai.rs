use serde::{Deserialize, Serialize};

use super::types::GenerationClient;
use super::PipelineError;

/// Sampling temperature for tabular generation (low; original default).
const GENERATION_TEMPERATURE: f32 = 0.2;

/// HTTP client for an OpenAI-compatible chat completions endpoint.
pub struct OpenAiClient {
    base_url: String,
    api_key: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OpenAiClient {
    /// Create a client against `base_url` (e.g. `https://api.openai.com`).
    pub fn new(base_url: &str, api_key: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
            timeout_secs,
        }
    }
}

/// Request body for /v1/chat/completions
#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Response body from /v1/chat/completions
#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

impl GenerationClient for OpenAiClient {
    fn generate(&self, model: &str, prompt: &str) -> Result<String, PipelineError> {
        // Refuse before any network call — consuming quota with a credential
        // we know is missing helps nobody.
        if self.api_key.trim().is_empty() {
            return Err(PipelineError::MissingApiKey);
        }

        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = ChatCompletionRequest {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: GENERATION_TEMPERATURE,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    PipelineError::HttpClient(format!(
                        "Request timed out after {}s",
                        self.timeout_secs
                    ))
                } else {
                    PipelineError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            let body = response.text().unwrap_or_default();
            return Err(PipelineError::AuthRejected {
                status: status.as_u16(),
                body,
            });
        }
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(PipelineError::ServiceStatus {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .map_err(|e| PipelineError::ResponseParsing(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(PipelineError::EmptyResponse);
        }
        Ok(content.trim().to_string())
    }
}

/// Mock generation client for testing — returns a configurable response.
pub struct MockGenerationClient {
    response: Result<String, fn() -> PipelineError>,
}

impl MockGenerationClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: Ok(response.to_string()),
        }
    }

    /// A client whose every call fails with the given error constructor.
    pub fn failing(make_error: fn() -> PipelineError) -> Self {
        Self {
            response: Err(make_error),
        }
    }
}

impl GenerationClient for MockGenerationClient {
    fn generate(&self, _model: &str, _prompt: &str) -> Result<String, PipelineError> {
        match &self.response {
            Ok(text) => Ok(text.clone()),
            Err(make_error) => Err(make_error()),
        }
    }
}
