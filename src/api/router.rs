use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use super::handlers;
use super::state::AppState;

/// Upper bound on request bodies; sized for recorded audio.
pub const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

/// Build the service router.
pub fn router(state: Arc<AppState>) -> Router {
    let permissive_cors = state.config.server.permissive_cors;

    let router = Router::new()
        .route("/api/chat", post(handlers::chat))
        .route("/api/feedback", post(handlers::feedback))
        .route("/api/conversation-analysis", post(handlers::conversation_analysis))
        .route("/api/diary", post(handlers::diary))
        .route("/api/stt", post(handlers::stt))
        .route("/api/tts", post(handlers::tts))
        .route("/api/elevenlabs-signed-url", get(handlers::signed_url))
        .route("/api/usage/elevenlabs", get(handlers::usage))
        .route("/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state);

    if permissive_cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}
