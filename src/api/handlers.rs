//! Endpoint handlers.
//!
//! Each handler parses its input, resolves the provider it needs, runs the
//! matching pipeline function and shapes the JSON body.  Failure-to-status
//! mapping lives in [`ApiError::from_pipeline`].

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use chrono::{Local, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::conversation::{
    null_as_default, ConversationAnalysis, DiaryEntries, TranslationFeedback, TranslationPair,
};
use crate::llm::ChatMode;
use crate::pipeline::{
    optional_history, require_history, run_analysis, run_chat, run_diary, run_feedback,
    run_signed_url, run_synthesize, run_transcribe, run_usage, ChatTurn, DiaryRequest, Endpoint,
    PipelineError, UsageReport,
};
use crate::voice::AudioUpload;

use super::error::{ApiError, ApiResult};
use super::state::AppState;

const GEMINI_KEY_MISSING: &str = "API key not configured";
/// Reported by chat (Gemini) and STT (ElevenLabs).
const KEY_MISSING_VERBOSE: &str = "API key not configured. Please check environment variables.";
const ELEVENLABS_KEY_MISSING: &str = "ElevenLabs API key not configured";
const ELEVENLABS_CONFIG_MISSING: &str = "ElevenLabs configuration missing";
const NO_AUDIO: &str = "No audio file provided";

type Shared = State<Arc<AppState>>;

/// Parse a JSON body; anything unreadable is a 400.
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> ApiResult<T> {
    serde_json::from_slice(body).map_err(|e| {
        log::warn!("rejecting malformed JSON body: {e}");
        ApiError::bad_request(format!("Invalid JSON body: {e}"))
    })
}

/// Error mapper for `endpoint`: logs the failure and picks the status.
fn failure(endpoint: Endpoint) -> impl Fn(PipelineError) -> ApiError + Copy {
    move |err| {
        log::error!("[{}] {err}", endpoint.name());
        ApiError::from_pipeline(endpoint, err)
    }
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ChatBody {
    message: Option<String>,
    history: Option<Value>,
    mode: Option<String>,
    context: Option<TranslationPair>,
}

pub async fn chat(State(state): Shared, body: Bytes) -> ApiResult<Json<Value>> {
    let fail = failure(Endpoint::Chat);
    let body: ChatBody = parse_body(&body).map_err(ApiError::echoed)?;

    let backend = state.gemini(KEY_MISSING_VERBOSE).map_err(fail)?;
    let turn = ChatTurn {
        message: body.message.unwrap_or_default(),
        history: optional_history(body.history.as_ref()).map_err(fail)?,
        mode: ChatMode::from_request(body.mode.as_deref()),
        context: body.context,
    };

    let outcome = run_chat(
        &*backend,
        &state.prompt_cache,
        &state.config.gemini,
        state.credentials.gemini_prompt_id.as_deref(),
        &turn,
    )
    .await
    .map_err(fail)?;

    Ok(Json(json!({ "response": outcome.into_value() })))
}

// ---------------------------------------------------------------------------
// Feedback / analysis / diary
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct HistoryBody {
    conversation_history: Option<Value>,
}

pub async fn feedback(State(state): Shared, body: Bytes) -> ApiResult<Json<TranslationFeedback>> {
    let fail = failure(Endpoint::Feedback);
    let body: HistoryBody = parse_body(&body)?;
    let history = require_history(body.conversation_history.as_ref()).map_err(fail)?;
    let backend = state.gemini(GEMINI_KEY_MISSING).map_err(fail)?;

    let outcome = run_feedback(&*backend, &state.config.gemini.feedback, &history)
        .await
        .map_err(fail)?;
    Ok(Json(outcome.into_value()))
}

pub async fn conversation_analysis(
    State(state): Shared,
    body: Bytes,
) -> ApiResult<Json<ConversationAnalysis>> {
    let fail = failure(Endpoint::ConversationAnalysis);
    let body: HistoryBody = parse_body(&body)?;
    let history = require_history(body.conversation_history.as_ref()).map_err(fail)?;
    let backend = state.gemini(GEMINI_KEY_MISSING).map_err(fail)?;

    let outcome = run_analysis(&*backend, &state.config.gemini.analysis, &history)
        .await
        .map_err(fail)?;
    Ok(Json(outcome.into_value()))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct DiaryBody {
    #[serde(deserialize_with = "null_as_default")]
    vietnamese_text: String,
    #[serde(deserialize_with = "null_as_default")]
    english_text: String,
    chat_history: Option<Value>,
}

pub async fn diary(State(state): Shared, body: Bytes) -> ApiResult<Json<DiaryEntries>> {
    let fail = failure(Endpoint::Diary);
    let body: DiaryBody = parse_body(&body)?;
    let backend = state.gemini(GEMINI_KEY_MISSING).map_err(fail)?;

    let request = DiaryRequest {
        pair: TranslationPair {
            vietnamese_text: body.vietnamese_text,
            english_text: body.english_text,
        },
        chat_history: optional_history(body.chat_history.as_ref()).map_err(fail)?,
    };
    let outcome = run_diary(&*backend, &state.config.gemini, &request, Local::now())
        .await
        .map_err(fail)?;
    Ok(Json(outcome.into_value()))
}

// ---------------------------------------------------------------------------
// Voice
// ---------------------------------------------------------------------------

/// Read the `audio` file and optional `language` text field.
async fn read_upload(mut multipart: Multipart) -> ApiResult<(Option<AudioUpload>, Option<String>)> {
    let mut audio = None;
    let mut language = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {e}")))?
    {
        match field.name() {
            Some("audio") => {
                let file_name = field.file_name().unwrap_or("recording.webm").to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Invalid audio upload: {e}")))?;
                audio = Some(AudioUpload {
                    bytes: bytes.to_vec(),
                    file_name,
                    content_type,
                });
            }
            Some("language") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Invalid language field: {e}")))?;
                let text = text.trim();
                if !text.is_empty() {
                    language = Some(text.to_string());
                }
            }
            _ => {}
        }
    }
    Ok((audio, language))
}

pub async fn stt(
    State(state): Shared,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<Value>> {
    let fail = failure(Endpoint::Stt);
    let voice = state.voice(KEY_MISSING_VERBOSE).map_err(fail)?;

    let multipart = multipart.map_err(|_| ApiError::bad_request(NO_AUDIO))?;
    let (audio, language) = read_upload(multipart).await?;
    let audio = audio.ok_or_else(|| ApiError::bad_request(NO_AUDIO))?;
    let language = language.unwrap_or_else(|| state.config.elevenlabs.default_language.clone());
    log::info!(
        "[STT] received {} bytes ({}), language={language}",
        audio.bytes.len(),
        audio.content_type.as_deref().unwrap_or("unknown type")
    );

    let transcription = run_transcribe(&*voice, audio, &language)
        .await
        .map_err(fail)?
        .into_value();
    log::info!("[STT] transcript: {:?}", transcription.text);

    let language = transcription.language_code.unwrap_or(language);
    Ok(Json(json!({ "transcript": transcription.text, "language": language })))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TtsBody {
    #[serde(deserialize_with = "null_as_default")]
    text: String,
}

pub async fn tts(State(state): Shared, body: Bytes) -> ApiResult<Json<Value>> {
    let fail = failure(Endpoint::Tts);
    let voice = state.voice(ELEVENLABS_KEY_MISSING).map_err(fail)?;
    let body: TtsBody = parse_body(&body)?;

    let audio = run_synthesize(&*voice, &body.text, state.voice_id())
        .await
        .map_err(fail)?
        .into_value();
    Ok(Json(json!({ "audio": audio })))
}

pub async fn signed_url(State(state): Shared) -> ApiResult<Json<Value>> {
    let fail = failure(Endpoint::SignedUrl);
    let (Some(voice), Some(agent_id)) = (
        state.voice.clone(),
        state.credentials.elevenlabs_agent_id.as_deref(),
    ) else {
        return Err(fail(PipelineError::MissingCredential(
            ELEVENLABS_CONFIG_MISSING.into(),
        )));
    };

    let url = run_signed_url(&*voice, agent_id)
        .await
        .map_err(fail)?
        .into_value();
    Ok(Json(json!({ "signedUrl": url })))
}

pub async fn usage(State(state): Shared) -> ApiResult<Json<UsageReport>> {
    let fail = failure(Endpoint::Usage);
    let voice = state.voice(ELEVENLABS_KEY_MISSING).map_err(fail)?;

    let report = run_usage(&*voice, state.config.elevenlabs.usage_window_days, Utc::now())
        .await
        .map_err(fail)?
        .into_value();
    Ok(Json(report))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
