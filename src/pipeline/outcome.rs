//! Failure policy and the single wrapper that enforces it.
//!
//! | Endpoint              | On provider / parse failure |
//! |-----------------------|-----------------------------|
//! | chat                  | propagate                   |
//! | feedback              | fallback payload            |
//! | conversation-analysis | fallback payload            |
//! | diary                 | fallback payload            |
//! | stt, tts, signed-url, usage | propagate             |
//!
//! Missing credentials and invalid input always propagate, whatever the
//! endpoint's policy.

use thiserror::Error;

use crate::llm::{LlmError, NormalizeError};
use crate::voice::VoiceError;

use super::state::{FailureKind, RequestState};

// ---------------------------------------------------------------------------
// PipelineError
// ---------------------------------------------------------------------------

/// Errors that can surface from a pipeline operation.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A provider credential is not configured.  The message is shown to the
    /// caller as-is.
    #[error("{0}")]
    MissingCredential(String),

    /// The request is malformed.  The message is shown to the caller as-is.
    #[error("{0}")]
    InvalidInput(String),

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Voice(#[from] VoiceError),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

impl PipelineError {
    pub fn kind(&self) -> FailureKind {
        match self {
            PipelineError::MissingCredential(_) => FailureKind::CredentialMissing,
            PipelineError::InvalidInput(_) => FailureKind::InvalidInput,
            PipelineError::Llm(LlmError::Upstream { .. })
            | PipelineError::Voice(VoiceError::Upstream { .. }) => FailureKind::Upstream,
            PipelineError::Llm(LlmError::Request(_))
            | PipelineError::Voice(VoiceError::Request(_)) => FailureKind::Network,
            PipelineError::Voice(VoiceError::InvalidInput(_)) => FailureKind::InvalidInput,
            PipelineError::Llm(LlmError::Parse(_) | LlmError::EmptyResponse)
            | PipelineError::Voice(VoiceError::Parse(_))
            | PipelineError::Normalize(_) => FailureKind::Parse,
        }
    }

    /// HTTP status reported by the provider, if any.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            PipelineError::Llm(e) => e.status(),
            PipelineError::Voice(VoiceError::Upstream { status, .. }) => Some(*status),
            _ => None,
        }
    }

    /// Terminal state of a request that ends in this error.  A propagated
    /// `Err` is how the `Error` state leaves the pipeline.
    pub fn state(&self) -> RequestState {
        RequestState::Pending.advance(RequestState::Error(self.kind()))
    }

    /// Configuration and validation failures surface regardless of policy.
    fn always_surfaces(&self) -> bool {
        matches!(
            self.kind(),
            FailureKind::CredentialMissing | FailureKind::InvalidInput
        )
    }
}

// ---------------------------------------------------------------------------
// Endpoint / FailurePolicy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Return the error to the caller.
    Propagate,
    /// Replace the result with a static payload and report success.
    Fallback,
}

/// Every operation the router exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Chat,
    Feedback,
    ConversationAnalysis,
    Diary,
    Stt,
    Tts,
    SignedUrl,
    Usage,
}

impl Endpoint {
    pub fn policy(self) -> FailurePolicy {
        match self {
            Endpoint::Feedback | Endpoint::ConversationAnalysis | Endpoint::Diary => {
                FailurePolicy::Fallback
            }
            Endpoint::Chat
            | Endpoint::Stt
            | Endpoint::Tts
            | Endpoint::SignedUrl
            | Endpoint::Usage => FailurePolicy::Propagate,
        }
    }

    /// Name used in log lines.
    pub fn name(self) -> &'static str {
        match self {
            Endpoint::Chat => "Chat",
            Endpoint::Feedback => "Feedback",
            Endpoint::ConversationAnalysis => "Conversation Analysis",
            Endpoint::Diary => "Diary",
            Endpoint::Stt => "STT",
            Endpoint::Tts => "TTS",
            Endpoint::SignedUrl => "Signed URL",
            Endpoint::Usage => "Usage",
        }
    }
}

// ---------------------------------------------------------------------------
// Outcome / settle
// ---------------------------------------------------------------------------

/// A settled request: the value to return and the terminal state reached.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T> {
    pub value: T,
    pub state: RequestState,
}

impl<T> Outcome<T> {
    pub fn success(value: T) -> Self {
        Self {
            value,
            state: RequestState::Pending.advance(RequestState::Success),
        }
    }

    pub fn fallback(value: T, kind: FailureKind) -> Self {
        Self {
            value,
            state: RequestState::Pending.advance(RequestState::Fallback(kind)),
        }
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

/// Apply `endpoint`'s failure policy to `result`.
///
/// `fallback` is consulted only when the policy allows it and the error is
/// not a configuration or validation failure; returning `None` propagates.
pub fn settle<T, F>(
    endpoint: Endpoint,
    result: Result<T, PipelineError>,
    fallback: F,
) -> Result<Outcome<T>, PipelineError>
where
    F: FnOnce() -> Option<T>,
{
    let err = match result {
        Ok(value) => return Ok(Outcome::success(value)),
        Err(err) => err,
    };

    let kind = err.kind();
    if err.always_surfaces() || endpoint.policy() == FailurePolicy::Propagate {
        log::error!("[{}] {}: {err}", endpoint.name(), err.state());
        return Err(err);
    }

    match fallback() {
        Some(value) => {
            log::warn!(
                "[{}] {}: {err}; serving fallback payload",
                endpoint.name(),
                kind.label()
            );
            Ok(Outcome::fallback(value, kind))
        }
        None => {
            log::error!("[{}] {}: {err}", endpoint.name(), err.state());
            Err(err)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
