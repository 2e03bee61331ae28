//! Conversation data model.
//!
//! * [`ConversationMessage`] / [`Transcript`]: the ordered turns of a session.
//! * [`ConversationAnalysis`]: detailed sentence-level feedback.
//! * [`TranslationFeedback`] / [`TranslationPair`]: full-practice feedback.
//! * [`DiaryEntries`]: end-of-session diary.
//!
//! Every structured result has a static fallback so clients always receive a
//! complete value.

pub mod analysis;
pub mod diary;
pub mod feedback;
pub mod message;

pub use analysis::{
    AreaToImprove, ConversationAnalysis, SentenceAnalysis, VocabSuggestion,
    DEFAULT_ANALYSIS_SUMMARY,
};
pub use diary::{DiaryDraft, DiaryEntries, DEFAULT_DIARY_ENTRY};
pub use feedback::{
    FeedbackVocab, GrammarStructure, TranslationFeedback, TranslationPair,
};
pub use message::{
    format_diary_chat, format_transcript, null_as_default, ConversationMessage, Role, Transcript,
};
