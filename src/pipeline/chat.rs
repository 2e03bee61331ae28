//! One conversational turn.
//!
//! ```text
//! mode = reflective ──▶ reflective template + earlier translation context
//! prompt id set     ──▶ hosted prompt (cached; default prompt on failure)
//! otherwise         ──▶ default conversation prompt
//!        │
//!        ▼
//! system prompt + transcript + message ──▶ generate ──▶ reply
//! ```

use crate::config::GeminiConfig;
use crate::conversation::{ConversationMessage, TranslationPair};
use crate::cost::{log_cost, CostEstimate};
use crate::llm::prompt::{
    build_conversation_prompt, build_reflective_system_prompt, DEFAULT_CONVERSATION_PROMPT,
};
use crate::llm::{ChatMode, GenerativeBackend, LlmError, PromptCache};

use super::outcome::{settle, Endpoint, Outcome, PipelineError};
use super::state::FailureKind;

/// Reply served with a 200 when the model returns no text.
pub const EMPTY_REPLY: &str = "I'm having trouble responding right now.";

#[derive(Debug, Clone, Default)]
pub struct ChatTurn {
    pub message: String,
    pub history: Vec<ConversationMessage>,
    pub mode: ChatMode,
    pub context: Option<TranslationPair>,
}

/// Pick the system prompt for `turn`.
async fn system_prompt<B: GenerativeBackend + ?Sized>(
    backend: &B,
    cache: &PromptCache,
    prompt_id: Option<&str>,
    turn: &ChatTurn,
) -> String {
    if turn.mode == ChatMode::Reflective {
        log::info!("[Chat] using reflective mode");
        return build_reflective_system_prompt(turn.context.as_ref());
    }
    let Some(prompt_id) = prompt_id else {
        return DEFAULT_CONVERSATION_PROMPT.to_string();
    };
    match cache.get_or_fetch(prompt_id, backend).await {
        Ok(text) => text,
        Err(e) => {
            log::warn!("[Chat] hosted prompt unavailable ({e}); using default prompt");
            DEFAULT_CONVERSATION_PROMPT.to_string()
        }
    }
}

/// Generate the assistant's reply to `turn`.
pub async fn run_chat<B: GenerativeBackend + ?Sized>(
    backend: &B,
    cache: &PromptCache,
    config: &GeminiConfig,
    prompt_id: Option<&str>,
    turn: &ChatTurn,
) -> Result<Outcome<String>, PipelineError> {
    if turn.message.trim().is_empty() {
        return Err(PipelineError::InvalidInput("Message is required".into()));
    }
    log::info!(
        "[Chat] request: history={} mode={:?} context={}",
        turn.history.len(),
        turn.mode,
        turn.context.is_some()
    );

    let system = system_prompt(backend, cache, prompt_id, turn).await;
    let prompt = build_conversation_prompt(&system, &turn.history, &turn.message);
    let cached_input = turn.history.len() >= config.cache_after_messages;

    match backend.generate(&prompt, &config.chat).await {
        Ok(reply) => {
            log_cost(
                Endpoint::Chat.name(),
                &CostEstimate::for_texts(&prompt, &reply, cached_input),
            );
            settle(Endpoint::Chat, Ok(reply), || None)
        }
        Err(LlmError::EmptyResponse) => {
            log::warn!("[Chat] model returned no text");
            log_cost(
                Endpoint::Chat.name(),
                &CostEstimate::for_texts(&prompt, "", cached_input),
            );
            Ok(Outcome::fallback(EMPTY_REPLY.to_string(), FailureKind::Parse))
        }
        Err(e) => settle(Endpoint::Chat, Err(e.into()), || None),
    }
}
