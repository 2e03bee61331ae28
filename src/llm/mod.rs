//! Generative text layer.
//!
//! This module provides:
//! * [`TextGenerator`] / [`PromptSource`]: async traits for the model and
//!   hosted prompts, combined as [`GenerativeBackend`].
//! * [`GeminiClient`]: REST implementation (AI Studio or Vertex AI).
//! * [`PromptCache`]: TTL cache for hosted system prompts.
//! * [`prompt`]: templates and the builders that fill them.
//! * [`extract_text`]: ordered extraction of text from response envelopes.
//! * [`normalize`] / [`parse_json`]: fence stripping and JSON parsing.
//! * [`LlmError`] / [`NormalizeError`]: error variants.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use lingo_coach::config::AppConfig;
//! use lingo_coach::llm::{prompt, GeminiClient, TextGenerator};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let client = GeminiClient::from_config(&config.gemini, "my-api-key", None);
//!
//!     let full = prompt::build_conversation_prompt(
//!         prompt::DEFAULT_CONVERSATION_PROMPT,
//!         &[],
//!         "Hi! I just got back from the market.",
//!     );
//!     let reply = client.generate(&full, &config.gemini.chat).await.unwrap();
//!     println!("{}", reply);
//! }
//! ```

pub mod extract;
pub mod gemini;
pub mod normalize;
pub mod prompt;
pub mod prompt_cache;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use extract::{extract_text, finish_reason};
pub use gemini::{GeminiClient, GenerativeBackend, LlmError, PromptSource, TextGenerator};
pub use normalize::{normalize, parse_json, strip_code_fences, NormalizeError};
pub use prompt::{ChatMode, FeedbackCase, Placeholder, PromptTemplate};
pub use prompt_cache::{Clock, PromptCache, SystemClock};
