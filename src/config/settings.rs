//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across
//! request handlers.  Secrets never live here; see
//! [`Credentials`](super::Credentials).

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

/// Settings for the inbound HTTP listener.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address the router binds to (e.g. `"127.0.0.1:3000"`).
    pub bind_addr: String,
    /// Attach a permissive CORS layer so a browser client on another origin
    /// can call the API.
    pub permissive_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".into(),
            permissive_cors: true,
        }
    }
}

// ---------------------------------------------------------------------------
// ModelConfig
// ---------------------------------------------------------------------------

/// Static record describing how one class of request talks to the model.
///
/// Loaded once at start-up and never modified while serving.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model identifier (e.g. `"gemini-2.0-flash-exp"`).
    pub name: String,
    /// Upper bound on generated tokens.
    pub max_output_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Nucleus sampling cut-off.
    pub top_p: Option<f32>,
    /// Top-k sampling cut-off.
    pub top_k: Option<u32>,
    /// Requested response MIME type; `"application/json"` for structured
    /// output.
    pub response_mime_type: Option<String>,
}

impl ModelConfig {
    fn flash(max_output_tokens: u32, temperature: f32, top_p: f32, json: bool) -> Self {
        Self {
            name: "gemini-2.0-flash-exp".into(),
            max_output_tokens,
            temperature,
            top_p: Some(top_p),
            top_k: None,
            response_mime_type: json.then(|| "application/json".to_string()),
        }
    }

    /// Whether the model was asked for JSON output.
    pub fn wants_json(&self) -> bool {
        self.response_mime_type.as_deref() == Some("application/json")
    }
}

// ---------------------------------------------------------------------------
// GeminiDeployment
// ---------------------------------------------------------------------------

/// Which Gemini front door the generation adapter talks to.
///
/// | Variant   | Endpoint                                                   |
/// |-----------|------------------------------------------------------------|
/// | AiStudio  | `{base_url}/v1beta/models/{model}:generateContent`         |
/// | VertexAi  | `https://{location}-aiplatform.googleapis.com/v1/projects/…` |
///
/// `VertexAi` needs the project/location pair from the environment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GeminiDeployment {
    AiStudio,
    VertexAi,
}

impl Default for GeminiDeployment {
    fn default() -> Self {
        Self::AiStudio
    }
}

// ---------------------------------------------------------------------------
// GeminiConfig
// ---------------------------------------------------------------------------

/// Settings for the generative text service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Base URL of the AI Studio API (also used for hosted prompt fetches).
    pub base_url: String,
    /// Selected deployment target.
    pub deployment: GeminiDeployment,
    /// Conversational replies.
    pub chat: ModelConfig,
    /// Translation feedback (full-practice flow).
    pub feedback: ModelConfig,
    /// Sentence-by-sentence conversation analysis.
    pub analysis: ModelConfig,
    /// First diary pass (the learner's own voice).
    pub diary_authentic: ModelConfig,
    /// Second diary pass (literary rewrite).
    pub diary_literary: ModelConfig,
    /// Chat histories at least this long are costed at the cached-input
    /// rate.
    pub cache_after_messages: usize,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".into(),
            deployment: GeminiDeployment::default(),
            chat: ModelConfig::flash(512, 0.9, 0.95, false),
            feedback: ModelConfig::flash(1024, 0.7, 0.9, true),
            analysis: ModelConfig::flash(2048, 0.7, 0.9, true),
            diary_authentic: ModelConfig::flash(1024, 0.7, 0.9, true),
            diary_literary: ModelConfig::flash(1024, 0.8, 0.95, true),
            cache_after_messages: 6,
        }
    }
}

// ---------------------------------------------------------------------------
// ElevenLabsConfig
// ---------------------------------------------------------------------------

/// Voice settings sent with every synthesis request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceSettings {
    pub stability: f32,
    pub similarity_boost: f32,
    pub style: f32,
    pub use_speaker_boost: bool,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: 0.5,
            similarity_boost: 0.75,
            style: 0.0,
            use_speaker_boost: true,
        }
    }
}

/// Settings for the voice AI service (STT, TTS, live sessions, usage).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElevenLabsConfig {
    /// Base URL of the ElevenLabs REST API.
    pub base_url: String,
    /// Voice used when `ELEVENLABS_VOICE_ID` is not set.
    pub default_voice_id: String,
    /// Synthesis model identifier.
    pub tts_model: String,
    /// Transcription model identifier.
    pub stt_model: String,
    /// Language code used when an STT request omits `language`.
    pub default_language: String,
    /// Voice settings for synthesis.
    pub voice_settings: VoiceSettings,
    /// Width of the usage query window, in days.
    pub usage_window_days: i64,
}

impl Default for ElevenLabsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.elevenlabs.io".into(),
            default_voice_id: "21m00Tcm4TlvDq8ikWAM".into(),
            tts_model: "eleven_multilingual_v2".into(),
            stt_model: "scribe_v1".into(),
            default_language: "en".into(),
            voice_settings: VoiceSettings::default(),
            usage_window_days: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// PromptConfig
// ---------------------------------------------------------------------------

/// Hosted-prompt cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptConfig {
    /// Seconds a fetched hosted prompt stays fresh.
    pub cache_ttl_secs: u64,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self { cache_ttl_secs: 300 }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use lingo_coach::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Generative text service settings.
    #[serde(default)]
    pub gemini: GeminiConfig,
    /// Voice service settings.
    #[serde(default)]
    pub elevenlabs: ElevenLabsConfig,
    /// Hosted-prompt cache settings.
    #[serde(default)]
    pub prompts: PromptConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// so callers never need to special-case a missing file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (used by `--config` and tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = AppConfig::default();
        original.save_to(&path).expect("save");

        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(original.server.bind_addr, loaded.server.bind_addr);
        assert_eq!(original.gemini.base_url, loaded.gemini.base_url);
        assert_eq!(original.gemini.deployment, loaded.gemini.deployment);
        assert_eq!(original.gemini.chat, loaded.gemini.chat);
        assert_eq!(original.gemini.analysis, loaded.gemini.analysis);
        assert_eq!(original.gemini.diary_literary, loaded.gemini.diary_literary);
        assert_eq!(
            original.elevenlabs.voice_settings,
            loaded.elevenlabs.voice_settings
        );
        assert_eq!(original.prompts.cache_ttl_secs, loaded.prompts.cache_ttl_secs);
    }

    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");
        assert_eq!(config.server.bind_addr, "127.0.0.1:3000");
        assert_eq!(config.gemini.chat.name, "gemini-2.0-flash-exp");
    }

    #[test]
    fn partial_file_fills_missing_sections() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("partial.toml");
        std::fs::write(
            &path,
            "[server]\nbind_addr = \"0.0.0.0:8080\"\npermissive_cors = false\n",
        )
        .unwrap();

        let config = AppConfig::load_from(&path).expect("load");
        assert_eq!(config.server.bind_addr, "0.0.0.0:8080");
        assert!(!config.server.permissive_cors);
        assert_eq!(config.elevenlabs.stt_model, "scribe_v1");
    }

    #[test]
    fn default_values() {
        let cfg = AppConfig::default();

        assert_eq!(cfg.gemini.deployment, GeminiDeployment::AiStudio);
        assert_eq!(cfg.gemini.analysis.max_output_tokens, 2048);
        assert!(cfg.gemini.feedback.wants_json());
        assert!(!cfg.gemini.chat.wants_json());
        assert_eq!(cfg.elevenlabs.default_voice_id, "21m00Tcm4TlvDq8ikWAM");
        assert_eq!(cfg.elevenlabs.tts_model, "eleven_multilingual_v2");
        assert_eq!(cfg.elevenlabs.usage_window_days, 30);
        assert_eq!(cfg.prompts.cache_ttl_secs, 300);
    }

    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("modified.toml");

        let mut cfg = AppConfig::default();
        cfg.gemini.deployment = GeminiDeployment::VertexAi;
        cfg.gemini.chat.temperature = 0.4;
        cfg.gemini.chat.top_k = Some(40);
        cfg.elevenlabs.base_url = "http://localhost:9999".into();
        cfg.prompts.cache_ttl_secs = 60;

        cfg.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(loaded.gemini.deployment, GeminiDeployment::VertexAi);
        assert_eq!(loaded.gemini.chat.temperature, 0.4);
        assert_eq!(loaded.gemini.chat.top_k, Some(40));
        assert_eq!(loaded.elevenlabs.base_url, "http://localhost:9999");
        assert_eq!(loaded.prompts.cache_ttl_secs, 60);
    }
}
