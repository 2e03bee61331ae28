//! Shared router state: configuration, credentials and provider clients.

use std::sync::Arc;
use std::time::Duration;

use crate::config::{AppConfig, Credentials};
use crate::llm::{GeminiClient, GenerativeBackend, PromptCache};
use crate::pipeline::PipelineError;
use crate::voice::{ElevenLabsClient, VoiceService};

/// Built once at start-up and shared by every handler through `Arc`.
///
/// A provider client exists only when its API key is configured; handlers
/// that need a missing one fail with a 500 instead of calling out.
pub struct AppState {
    pub config: AppConfig,
    pub credentials: Credentials,
    pub gemini: Option<Arc<dyn GenerativeBackend>>,
    pub voice: Option<Arc<dyn VoiceService>>,
    pub prompt_cache: Arc<PromptCache>,
}

impl AppState {
    /// Build REST clients for every configured credential.
    pub fn from_config(config: AppConfig, credentials: Credentials) -> Self {
        let gemini = credentials.gemini_api_key.as_deref().map(|key| {
            Arc::new(GeminiClient::from_config(
                &config.gemini,
                key,
                credentials.vertex.as_ref(),
            )) as Arc<dyn GenerativeBackend>
        });
        let voice = credentials.elevenlabs_api_key.as_deref().map(|key| {
            Arc::new(ElevenLabsClient::from_config(&config.elevenlabs, key)) as Arc<dyn VoiceService>
        });

        if gemini.is_none() {
            log::warn!("GEMINI_API_KEY not set; chat, feedback, analysis and diary will fail");
        }
        if voice.is_none() {
            log::warn!("ELEVENLABS_API_KEY not set; voice endpoints will fail");
        }

        Self::with_backends(config, credentials, gemini, voice)
    }

    /// Assemble state around the given provider implementations.
    pub fn with_backends(
        config: AppConfig,
        credentials: Credentials,
        gemini: Option<Arc<dyn GenerativeBackend>>,
        voice: Option<Arc<dyn VoiceService>>,
    ) -> Self {
        let ttl = Duration::from_secs(config.prompts.cache_ttl_secs);
        Self {
            config,
            credentials,
            gemini,
            voice,
            prompt_cache: Arc::new(PromptCache::new(ttl)),
        }
    }

    pub fn gemini(&self, missing: &str) -> Result<Arc<dyn GenerativeBackend>, PipelineError> {
        self.gemini
            .clone()
            .ok_or_else(|| PipelineError::MissingCredential(missing.to_string()))
    }

    pub fn voice(&self, missing: &str) -> Result<Arc<dyn VoiceService>, PipelineError> {
        self.voice
            .clone()
            .ok_or_else(|| PipelineError::MissingCredential(missing.to_string()))
    }

    /// `ELEVENLABS_VOICE_ID`, else the configured default voice.
    pub fn voice_id(&self) -> &str {
        self.credentials
            .elevenlabs_voice_id
            .as_deref()
            .unwrap_or(&self.config.elevenlabs.default_voice_id)
    }
}
