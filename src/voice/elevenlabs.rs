//! ElevenLabs adapter: the [`VoiceService`] trait and its REST
//! implementation [`ElevenLabsClient`].
//!
//! | Capability    | Call                                                     |
//! |---------------|----------------------------------------------------------|
//! | `transcribe`  | `POST /v1/speech-to-text` (multipart)                    |
//! | `synthesize`  | `POST /v1/text-to-speech/{voice_id}` → `audio/mpeg`      |
//! | `signed_url`  | `GET /v1/convai/conversation/get-signed-url?agent_id=…`  |
//! | `usage`       | `GET /v1/usage/character-stats?start_unix=…&end_unix=…`  |
//!
//! Every call authenticates with the `xi-api-key` header.

use async_trait::async_trait;
use reqwest::multipart;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::config::{ElevenLabsConfig, VoiceSettings};
use crate::voice::usage::{UsageStats, UsageWindow};

// ---------------------------------------------------------------------------
// VoiceError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum VoiceError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The service answered with a non-2xx status.
    #[error("ElevenLabs returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    /// The response body did not have the expected shape.
    #[error("failed to parse ElevenLabs response: {0}")]
    Parse(String),

    /// The request could not be built from the given input.
    #[error("invalid voice request: {0}")]
    InvalidInput(String),
}

impl From<reqwest::Error> for VoiceError {
    fn from(e: reqwest::Error) -> Self {
        VoiceError::Request(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// Data
// ---------------------------------------------------------------------------

/// Audio received from the browser, forwarded untouched.
#[derive(Debug, Clone)]
pub struct AudioUpload {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub content_type: Option<String>,
}

/// Result of a transcription.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Transcription {
    pub text: String,
    pub language_code: Option<String>,
}

#[derive(Deserialize)]
struct SignedUrlResponse {
    signed_url: String,
}

// ---------------------------------------------------------------------------
// VoiceService trait
// ---------------------------------------------------------------------------

/// Async trait for the voice provider.  One method per capability, each a
/// single outbound call.
#[async_trait]
pub trait VoiceService: Send + Sync {
    async fn transcribe(&self, audio: AudioUpload, language: &str)
        -> Result<Transcription, VoiceError>;

    /// Synthesize `text` and return MPEG audio bytes.
    async fn synthesize(&self, text: &str, voice_id: &str) -> Result<Vec<u8>, VoiceError>;

    /// Pre-authenticated URL for a live agent session.
    async fn signed_url(&self, agent_id: &str) -> Result<String, VoiceError>;

    async fn usage(&self, window: UsageWindow) -> Result<UsageStats, VoiceError>;
}

// ---------------------------------------------------------------------------
// ElevenLabsClient
// ---------------------------------------------------------------------------

pub struct ElevenLabsClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    tts_model: String,
    stt_model: String,
    voice_settings: VoiceSettings,
}

impl ElevenLabsClient {
    pub fn from_config(config: &ElevenLabsConfig, api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            tts_model: config.tts_model.clone(),
            stt_model: config.stt_model.clone(),
            voice_settings: config.voice_settings.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// JSON body for a synthesis request.
    pub fn synthesis_body(&self, text: &str) -> serde_json::Value {
        json!({
            "text": text,
            "model_id": self.tts_model,
            "voice_settings": {
                "stability": self.voice_settings.stability,
                "similarity_boost": self.voice_settings.similarity_boost,
                "style": self.voice_settings.style,
                "use_speaker_boost": self.voice_settings.use_speaker_boost,
            },
        })
    }
}

/// Turn a non-2xx response into [`VoiceError::Upstream`], logging it.
async fn check(response: reqwest::Response, what: &str) -> Result<reqwest::Response, VoiceError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    log::error!("ElevenLabs {what} error: status={status} body={body}");
    Err(VoiceError::Upstream { status, body })
}

#[async_trait]
impl VoiceService for ElevenLabsClient {
    async fn transcribe(
        &self,
        audio: AudioUpload,
        language: &str,
    ) -> Result<Transcription, VoiceError> {
        log::info!(
            "Transcribing {} ({:.2} MB, type={}, language={language})",
            audio.file_name,
            audio.bytes.len() as f64 / 1024.0 / 1024.0,
            audio.content_type.as_deref().unwrap_or("unknown"),
        );

        let mut file = multipart::Part::bytes(audio.bytes).file_name(audio.file_name);
        if let Some(content_type) = audio.content_type.as_deref() {
            file = file
                .mime_str(content_type)
                .map_err(|e| VoiceError::InvalidInput(e.to_string()))?;
        }
        let form = multipart::Form::new()
            .part("file", file)
            .text("model_id", self.stt_model.clone())
            .text("language_code", language.to_string());

        let response = self
            .client
            .post(self.url("/v1/speech-to-text"))
            .header("xi-api-key", &self.api_key)
            .multipart(form)
            .send()
            .await?;
        let response = check(response, "speech-to-text").await?;

        let transcription: Transcription = response
            .json()
            .await
            .map_err(|e| VoiceError::Parse(e.to_string()))?;
        log::info!(
            "Transcription ok: {} chars, language={:?}",
            transcription.text.chars().count(),
            transcription.language_code
        );
        Ok(transcription)
    }

    async fn synthesize(&self, text: &str, voice_id: &str) -> Result<Vec<u8>, VoiceError> {
        let response = self
            .client
            .post(self.url(&format!("/v1/text-to-speech/{voice_id}")))
            .header("xi-api-key", &self.api_key)
            .header(reqwest::header::ACCEPT, "audio/mpeg")
            .json(&self.synthesis_body(text))
            .send()
            .await?;
        let response = check(response, "text-to-speech").await?;

        log::debug!(
            "TTS response: x-request-id={:?} content-type={:?}",
            response.headers().get("x-request-id"),
            response.headers().get(reqwest::header::CONTENT_TYPE)
        );

        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }

    async fn signed_url(&self, agent_id: &str) -> Result<String, VoiceError> {
        log::info!("Generating signed URL for agent {agent_id}");
        let response = self
            .client
            .get(self.url("/v1/convai/conversation/get-signed-url"))
            .query(&[("agent_id", agent_id)])
            .header("xi-api-key", &self.api_key)
            .send()
            .await?;
        let response = check(response, "signed-url").await?;

        let body: SignedUrlResponse = response
            .json()
            .await
            .map_err(|e| VoiceError::Parse(e.to_string()))?;
        Ok(body.signed_url)
    }

    async fn usage(&self, window: UsageWindow) -> Result<UsageStats, VoiceError> {
        let response = self
            .client
            .get(self.url("/v1/usage/character-stats"))
            .query(&[
                ("start_unix", window.start_unix_ms),
                ("end_unix", window.end_unix_ms),
            ])
            .header("xi-api-key", &self.api_key)
            .send()
            .await?;
        let response = check(response, "usage").await?;

        response
            .json()
            .await
            .map_err(|e| VoiceError::Parse(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthesis_body_uses_configured_settings() {
        let client = ElevenLabsClient::from_config(&ElevenLabsConfig::default(), "k");
        let body = client.synthesis_body("Xin chào");
        assert_eq!(body["text"], "Xin chào");
        assert_eq!(body["model_id"], "eleven_multilingual_v2");
        assert_eq!(body["voice_settings"]["stability"], 0.5);
        assert_eq!(body["voice_settings"]["similarity_boost"], 0.75);
        assert_eq!(body["voice_settings"]["use_speaker_boost"], true);
    }

    #[test]
    fn url_trims_trailing_slash() {
        let config = ElevenLabsConfig {
            base_url: "http://localhost:1234/".into(),
            ..ElevenLabsConfig::default()
        };
        let client = ElevenLabsClient::from_config(&config, "k");
        assert_eq!(client.url("/v1/usage"), "http://localhost:1234/v1/usage");
    }

    #[test]
    fn transcription_tolerates_missing_language() {
        let t: Transcription = serde_json::from_str(r#"{"text":"hello"}"#).unwrap();
        assert_eq!(t.text, "hello");
        assert_eq!(t.language_code, None);
    }

    #[test]
    fn client_is_object_safe() {
        let client: Box<dyn VoiceService> = Box::new(ElevenLabsClient::from_config(
            &ElevenLabsConfig::default(),
            "k",
        ));
        drop(client);
    }
}
