//! HTTP error envelope.
//!
//! Every failure leaves the service as `{"error": "<message>"}` with a
//! non-2xx status.  Chat failures also carry the message in `response` so
//! the conversation view can show it as the assistant's turn.

use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::pipeline::{Endpoint, FailureKind, PipelineError};

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    /// Echoed as `response` (chat only).
    pub response: Option<String>,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn custom(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            response: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::custom(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::custom(StatusCode::BAD_REQUEST, message)
    }

    /// Also report the message as `response`.
    pub fn echoed(mut self) -> Self {
        self.response = Some(self.message.clone());
        self
    }

    /// Map a pipeline failure to the status and message `endpoint` reports.
    pub fn from_pipeline(endpoint: Endpoint, err: PipelineError) -> Self {
        let error = match err.kind() {
            FailureKind::CredentialMissing => Self::internal(err.to_string()),
            FailureKind::InvalidInput => Self::bad_request(err.to_string()),
            _ => match endpoint {
                Endpoint::Chat => chat_failure(err.upstream_status()),
                Endpoint::Feedback => Self::internal("Failed to generate feedback"),
                Endpoint::ConversationAnalysis => Self::internal("Failed to analyze conversation"),
                Endpoint::Diary => Self::internal("Failed to generate diary"),
                Endpoint::Stt => Self::internal("Transcription failed. Please try again."),
                Endpoint::Tts => Self::internal("Failed to generate speech"),
                Endpoint::SignedUrl => Self::internal("Failed to generate signed URL"),
                Endpoint::Usage => Self::internal("Failed to fetch usage statistics"),
            },
        };

        if endpoint == Endpoint::Chat {
            error.echoed()
        } else {
            error
        }
    }
}

/// 403 and 429 from the model are mirrored; everything else is a 500.
fn chat_failure(upstream_status: Option<u16>) -> ApiError {
    match upstream_status {
        Some(403) => ApiError::custom(
            StatusCode::FORBIDDEN,
            "Authentication failed. Please check your API key.",
        ),
        Some(429) => ApiError::custom(
            StatusCode::TOO_MANY_REQUESTS,
            "Rate limit exceeded. Please try again in a moment.",
        ),
        _ => ApiError::internal("I'm having trouble responding right now. Could you try again?"),
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.status.as_u16(), self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = json!({ "error": self.message });
        if let Some(response) = self.response {
            body["response"] = json!(response);
        }
        (self.status, Json(body)).into_response()
    }
}
