//! Configuration module.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for each provider,
//! `AppPaths` for cross-platform config directories, TOML persistence via
//! `AppConfig::load` / `AppConfig::save`, and `Credentials` read from the
//! environment.

pub mod credentials;
pub mod paths;
pub mod settings;

pub use credentials::{Credentials, VertexTarget};
pub use paths::AppPaths;
pub use settings::{
    AppConfig, ElevenLabsConfig, GeminiConfig, GeminiDeployment, ModelConfig, PromptConfig,
    ServerConfig, VoiceSettings,
};
