//! Request pipeline: one operation per endpoint.
//!
//! Each operation validates its input, builds a prompt or provider request,
//! makes the outbound call(s) and settles the result through the single
//! failure-policy wrapper [`settle`].
//!
//! # Architecture
//!
//! ```text
//! handler ──▶ run_<operation>()
//!                │
//!                ├─ prompt builder / request shaping
//!                ├─ TextGenerator / VoiceService  (one call per capability)
//!                ├─ normalize + parse              (structured endpoints)
//!                └─ settle(endpoint, result, fallback)
//!                      ├─ Ok        → Outcome { value, Success }
//!                      ├─ fallback  → Outcome { static payload, Fallback(kind) }
//!                      └─ propagate → PipelineError
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use lingo_coach::config::AppConfig;
//! use lingo_coach::conversation::ConversationMessage;
//! use lingo_coach::llm::GeminiClient;
//! use lingo_coach::pipeline::run_analysis;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let client = GeminiClient::from_config(&config.gemini, "my-api-key", None);
//!     let history = vec![ConversationMessage::user("I goed to the park yesterday")];
//!
//!     let outcome = run_analysis(&client, &config.gemini.analysis, &history)
//!         .await
//!         .unwrap();
//!     println!("{} ({})", outcome.value.summary, outcome.state);
//! }
//! ```

pub mod analysis;
pub mod chat;
pub mod diary;
pub mod feedback;
pub mod input;
pub mod outcome;
pub mod state;
pub mod structured;
pub mod voice;

#[cfg(test)]
pub(crate) mod testing;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use analysis::run_analysis;
pub use chat::{run_chat, ChatTurn, EMPTY_REPLY};
pub use diary::{run_diary, DiaryRequest, NO_CHAT};
pub use feedback::run_feedback;
pub use input::{optional_history, require_history, HISTORY_REQUIRED};
pub use outcome::{settle, Endpoint, FailurePolicy, Outcome, PipelineError};
pub use state::{FailureKind, RequestState};
pub use voice::{run_signed_url, run_synthesize, run_transcribe, run_usage, UsageReport};
