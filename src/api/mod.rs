//! HTTP surface.
//!
//! | Method | Path                         | Handler                          |
//! |--------|------------------------------|----------------------------------|
//! | POST   | `/api/chat`                  | [`handlers::chat`]               |
//! | POST   | `/api/feedback`              | [`handlers::feedback`]           |
//! | POST   | `/api/conversation-analysis` | [`handlers::conversation_analysis`] |
//! | POST   | `/api/diary`                 | [`handlers::diary`]              |
//! | POST   | `/api/stt`                   | [`handlers::stt`] (multipart)    |
//! | POST   | `/api/tts`                   | [`handlers::tts`]                |
//! | GET    | `/api/elevenlabs-signed-url` | [`handlers::signed_url`]         |
//! | GET    | `/api/usage/elevenlabs`      | [`handlers::usage`]              |
//! | GET    | `/health`                    | [`handlers::health`]             |
//!
//! Errors are returned as `{"error": "..."}`; see [`ApiError`].

pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use router::{router, MAX_BODY_BYTES};
pub use state::AppState;
