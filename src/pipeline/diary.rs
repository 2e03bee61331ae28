//! Two-pass diary generation: the learner's own voice first, then a
//! literary rewrite built on it.

use chrono::{DateTime, TimeZone};

use crate::config::GeminiConfig;
use crate::conversation::{
    format_diary_chat, ConversationMessage, DiaryDraft, DiaryEntries, TranslationPair,
    DEFAULT_DIARY_ENTRY,
};
use crate::llm::prompt::{build_diary_authentic_prompt, build_diary_literary_prompt};
use crate::llm::TextGenerator;

use super::outcome::{settle, Endpoint, Outcome, PipelineError};
use super::structured::generate_structured;

/// Chat-history value used when the reflective chat was skipped.
pub const NO_CHAT: &str = "No chat conversation";

#[derive(Debug, Clone, Default)]
pub struct DiaryRequest {
    pub pair: TranslationPair,
    pub chat_history: Vec<ConversationMessage>,
}

async fn generate_entries<G, Tz>(
    generator: &G,
    config: &GeminiConfig,
    request: &DiaryRequest,
    now: &DateTime<Tz>,
) -> Result<DiaryEntries, PipelineError>
where
    G: TextGenerator + ?Sized,
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let chat = format_diary_chat(&request.chat_history).unwrap_or_else(|| NO_CHAT.to_string());

    log::info!("[Diary] generating authentic version");
    let prompt = build_diary_authentic_prompt(&request.pair, &chat);
    let authentic: DiaryDraft =
        generate_structured(generator, &prompt, &config.diary_authentic, "Diary-Authentic").await?;

    log::info!("[Diary] generating literary version");
    let prompt = build_diary_literary_prompt(authentic.text(), &request.pair, &chat);
    let literary: DiaryDraft =
        generate_structured(generator, &prompt, &config.diary_literary, "Diary-Literary").await?;

    Ok(DiaryEntries::new(
        authentic.text().unwrap_or(DEFAULT_DIARY_ENTRY),
        literary.text().unwrap_or(DEFAULT_DIARY_ENTRY),
        now,
    ))
}

/// Generate both diary versions, stamped with `now`.
pub async fn run_diary<G, Tz>(
    generator: &G,
    config: &GeminiConfig,
    request: &DiaryRequest,
    now: DateTime<Tz>,
) -> Result<Outcome<DiaryEntries>, PipelineError>
where
    G: TextGenerator + ?Sized,
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    log::info!(
        "[Diary] request: vietnamese={} english={} chat={}",
        request.pair.vietnamese().is_some(),
        request.pair.english().is_some(),
        request.chat_history.len()
    );

    let result = generate_entries(generator, config, request, &now).await;
    settle(Endpoint::Diary, result, || Some(DiaryEntries::fallback(&now)))
}
