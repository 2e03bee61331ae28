//! Session and screen state for the practice flows.
//!
//! A [`FlowSession`] tracks one active screen, whether a request is in
//! flight, and the [`SessionStorage`] values the screens hand to each other.
//! The four concrete flows live in [`flows`].

use thiserror::Error;

pub mod flow;
pub mod flows;
pub mod storage;

pub use flow::{Flow, FlowSession};
pub use flows::{
    translation_message, ConversationOnly, ConversationOnlyScreen, ConversationSubMode,
    FullPractice, FullPracticeScreen, Immersive, ImmersiveScreen, QuickTranslation,
    QuickTranslationScreen, TRANSLATION_UNAVAILABLE,
};
pub use storage::{keys, SessionStorage};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("{flow}: cannot move from {from} to {to}")]
    InvalidTransition {
        flow: &'static str,
        from: String,
        to: String,
    },

    #[error("{flow}: a request is already in flight")]
    RequestInFlight { flow: &'static str },

    #[error("session value is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
