//! Voice operations: transcription, synthesis, live-session URLs and usage.
//! All of them propagate failures.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cost::{log_tts_cost, TtsCost};
use crate::voice::{AudioUpload, Transcription, UsageStats, UsageWindow, VoiceService};

use super::outcome::{settle, Endpoint, Outcome, PipelineError};

pub async fn run_transcribe<V: VoiceService + ?Sized>(
    voice: &V,
    audio: AudioUpload,
    language: &str,
) -> Result<Outcome<Transcription>, PipelineError> {
    let result = voice.transcribe(audio, language).await.map_err(Into::into);
    settle(Endpoint::Stt, result, || None)
}

/// Synthesize `text` and return the audio as base64.
///
/// The cost estimate is logged before the provider call, and the call is
/// made even for empty text.
pub async fn run_synthesize<V: VoiceService + ?Sized>(
    voice: &V,
    text: &str,
    voice_id: &str,
) -> Result<Outcome<String>, PipelineError> {
    log::info!("[TTS] converting {} characters", text.chars().count());
    log_tts_cost(Endpoint::Tts.name(), &TtsCost::estimate(text));

    let result = voice
        .synthesize(text, voice_id)
        .await
        .map(|audio| STANDARD.encode(audio))
        .map_err(Into::into);
    settle(Endpoint::Tts, result, || None)
}

pub async fn run_signed_url<V: VoiceService + ?Sized>(
    voice: &V,
    agent_id: &str,
) -> Result<Outcome<String>, PipelineError> {
    let result = voice.signed_url(agent_id).await.map_err(Into::into);
    if result.is_ok() {
        log::info!("[Signed URL] generated for agent {agent_id}");
    }
    settle(Endpoint::SignedUrl, result, || None)
}

/// Usage statistics plus the human-readable summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageReport {
    pub success: bool,
    pub usage: UsageStats,
    pub summary: String,
}

/// Character usage for the `window_days` days ending at `now`.
pub async fn run_usage<V: VoiceService + ?Sized>(
    voice: &V,
    window_days: i64,
    now: DateTime<Utc>,
) -> Result<Outcome<UsageReport>, PipelineError> {
    let window = UsageWindow::last_days(window_days, now);
    let result = voice
        .usage(window)
        .await
        .map(|usage| {
            let summary = usage.summary(window_days);
            log::info!("{summary}");
            UsageReport {
                success: true,
                usage,
                summary,
            }
        })
        .map_err(Into::into);
    settle(Endpoint::Usage, result, || None)
}
