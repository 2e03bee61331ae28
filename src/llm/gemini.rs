//! Gemini adapter: the [`TextGenerator`] / [`PromptSource`] traits and the
//! REST implementation [`GeminiClient`].
//!
//! Each trait method is exactly one outbound HTTP call.  There is no retry,
//! no backoff and no client-side timeout; failures are returned to the
//! caller, which decides (per endpoint) whether to fall back or propagate.

use async_trait::async_trait;
use serde_json::{json, Value};
use thiserror::Error;

use crate::config::{GeminiConfig, GeminiDeployment, ModelConfig, VertexTarget};
use crate::llm::extract::{extract_text, finish_reason};

// ---------------------------------------------------------------------------
// LlmError
// ---------------------------------------------------------------------------

/// Errors that can occur while talking to the generative text service.
#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The service answered with a non-2xx status.
    #[error("Gemini returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    /// The HTTP response body was not the expected JSON.
    #[error("failed to parse Gemini response: {0}")]
    Parse(String),

    /// The response carried no usable text.
    #[error("Gemini returned an empty response")]
    EmptyResponse,
}

impl LlmError {
    /// Upstream HTTP status, when the failure was a non-2xx answer.
    pub fn status(&self) -> Option<u16> {
        match self {
            LlmError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        LlmError::Request(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Async trait for single-shot text generation.
///
/// Implementors must be `Send + Sync` so they can be shared across handlers
/// (e.g. wrapped in `Arc<dyn GenerativeBackend>`).
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for `prompt` using the given model settings.
    async fn generate(&self, prompt: &str, model: &ModelConfig) -> Result<String, LlmError>;
}

/// Fetches system prompts stored in AI Studio.
#[async_trait]
pub trait PromptSource: Send + Sync {
    /// Return the text of the hosted prompt `prompt_id`.
    async fn fetch_prompt(&self, prompt_id: &str) -> Result<String, LlmError>;
}

/// Everything the pipeline needs from the generative service.
pub trait GenerativeBackend: TextGenerator + PromptSource {}

impl<T: TextGenerator + PromptSource> GenerativeBackend for T {}

// ---------------------------------------------------------------------------
// GeminiClient
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum Endpoint {
    AiStudio,
    Vertex(VertexTarget),
}

/// Calls the Gemini REST API with an API key.
///
/// Hosted prompts are always fetched from `base_url`; generation goes either
/// to the same host or to Vertex AI when that deployment is configured.
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    endpoint: Endpoint,
}

impl GeminiClient {
    /// Build a client from settings and environment credentials.
    ///
    /// A `VertexAi` deployment without a project/location pair falls back to
    /// AI Studio with a warning.
    pub fn from_config(config: &GeminiConfig, api_key: &str, vertex: Option<&VertexTarget>) -> Self {
        let endpoint = match (config.deployment, vertex) {
            (GeminiDeployment::VertexAi, Some(target)) => Endpoint::Vertex(target.clone()),
            (GeminiDeployment::VertexAi, None) => {
                log::warn!(
                    "Vertex AI deployment selected but GOOGLE_CLOUD_PROJECT/LOCATION unset; using AI Studio"
                );
                Endpoint::AiStudio
            }
            (GeminiDeployment::AiStudio, _) => Endpoint::AiStudio,
        };

        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            endpoint,
        }
    }

    /// URL of the `generateContent` call for `model`.
    pub fn generate_url(&self, model: &str) -> String {
        match &self.endpoint {
            Endpoint::AiStudio => {
                format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
            }
            Endpoint::Vertex(VertexTarget { project, location }) => format!(
                "https://{location}-aiplatform.googleapis.com/v1/projects/{project}/locations/{location}/publishers/google/models/{model}:generateContent"
            ),
        }
    }
}

/// Request body for `generateContent`.
pub fn request_body(prompt: &str, model: &ModelConfig) -> Value {
    let mut generation = json!({
        "maxOutputTokens": model.max_output_tokens,
        "temperature": model.temperature,
    });
    if let Some(top_p) = model.top_p {
        generation["topP"] = json!(top_p);
    }
    if let Some(top_k) = model.top_k {
        generation["topK"] = json!(top_k);
    }
    if let Some(mime) = &model.response_mime_type {
        generation["responseMimeType"] = json!(mime);
    }

    json!({
        "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
        "generationConfig": generation,
    })
}

/// Text of a hosted prompt document: `prompt.text`, else every
/// `prompt.parts[].text` joined by newlines.
fn hosted_prompt_text(body: &Value) -> String {
    let prompt = &body["prompt"];
    if let Some(text) = prompt["text"].as_str().filter(|t| !t.is_empty()) {
        return text.to_string();
    }
    prompt["parts"]
        .as_array()
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p["text"].as_str())
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default()
}

async fn upstream_error(response: reqwest::Response) -> LlmError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    log::error!("Gemini API error: status={status} body={body}");
    LlmError::Upstream { status, body }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str, model: &ModelConfig) -> Result<String, LlmError> {
        let url = self.generate_url(&model.name);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body(prompt, model))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(upstream_error(response).await);
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        if finish_reason(&body) == Some("MAX_TOKENS") {
            log::warn!("Gemini response truncated: MAX_TOKENS (model={})", model.name);
        }

        extract_text(&body).ok_or(LlmError::EmptyResponse)
    }
}

#[async_trait]
impl PromptSource for GeminiClient {
    async fn fetch_prompt(&self, prompt_id: &str) -> Result<String, LlmError> {
        log::info!("Fetching hosted prompt {prompt_id}");
        let url = format!("{}/v1beta/{}", self.base_url, prompt_id);

        let response = self
            .client
            .get(&url)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(upstream_error(response).await);
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        let text = hosted_prompt_text(&body);
        if text.trim().is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(text)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
