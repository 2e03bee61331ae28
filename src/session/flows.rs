//! The four practice flows and the actions each screen performs.
//!
//! | Flow               | Screens                                   |
//! |--------------------|-------------------------------------------|
//! | [`FullPractice`]     | conversation → feedback → (chat →) diary |
//! | [`ConversationOnly`] | modal → conversation → analysis          |
//! | [`QuickTranslation`] | conversation → translation               |
//! | [`Immersive`]        | conversation → analysis                  |

use crate::conversation::{
    ConversationMessage, DiaryEntries, TranslationFeedback, TranslationPair,
};

use super::flow::{Flow, FlowSession};
use super::storage::keys;
use super::SessionError;

// ---------------------------------------------------------------------------
// Full practice
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FullPracticeScreen {
    Conversation,
    Feedback,
    Chat,
    Diary,
}

/// Speak Vietnamese then English, get feedback, optionally reflect in a
/// chat, finish with a diary.
#[derive(Debug, Clone)]
pub struct FullPractice;

impl Flow for FullPractice {
    type Screen = FullPracticeScreen;

    const NAME: &'static str = "full practice";
    const START: FullPracticeScreen = FullPracticeScreen::Conversation;
    const STORAGE_KEYS: &'static [&'static str] =
        &[keys::CONVERSATION_HISTORY, keys::CHAT_CONTEXT, keys::CHAT_HISTORY];

    fn can_advance(from: FullPracticeScreen, to: FullPracticeScreen) -> bool {
        use FullPracticeScreen::*;
        matches!(
            (from, to),
            (Conversation, Feedback) | (Feedback, Chat) | (Feedback, Diary) | (Chat, Diary)
        )
    }
}

impl FlowSession<FullPractice> {
    /// Speaking phase over: store the transcript and wait for feedback.
    pub fn end_conversation(&mut self, history: &[ConversationMessage]) -> Result<(), SessionError> {
        self.advance(FullPracticeScreen::Feedback)?;
        self.storage_mut()
            .set_json(keys::CONVERSATION_HISTORY, &history)?;
        self.begin_request()
    }

    /// Feedback arrived (or was replaced by its fallback): remember the
    /// translation pair for the chat and diary.
    pub fn feedback_received(&mut self, _feedback: &TranslationFeedback) -> Result<(), SessionError> {
        self.finish_request();
        let history: Vec<ConversationMessage> = self
            .storage()
            .get_json(keys::CONVERSATION_HISTORY)?
            .unwrap_or_default();
        let context = TranslationPair::from_history(&history);
        self.storage_mut().set_json(keys::CHAT_CONTEXT, &context)
    }

    /// Translation pair stored after feedback, if any.
    pub fn chat_context(&self) -> Result<Option<TranslationPair>, SessionError> {
        self.storage().get_json(keys::CHAT_CONTEXT)
    }

    pub fn start_chat(&mut self) -> Result<(), SessionError> {
        self.advance(FullPracticeScreen::Chat)
    }

    /// Persist the reflective chat transcript after each turn.
    pub fn record_chat(&mut self, chat_history: &[ConversationMessage]) -> Result<(), SessionError> {
        self.storage_mut().set_json(keys::CHAT_HISTORY, &chat_history)
    }

    /// Move to the diary (from feedback or chat) and wait for it.
    pub fn request_diary(&mut self) -> Result<(), SessionError> {
        self.advance(FullPracticeScreen::Diary)?;
        self.begin_request()
    }

    pub fn diary_received(&mut self, _entries: &DiaryEntries) {
        self.finish_request();
    }
}

// ---------------------------------------------------------------------------
// Conversation only
// ---------------------------------------------------------------------------

/// How the conversation-only session is conducted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationSubMode {
    /// Turn-based chat through the chat endpoint.
    Chat,
    /// Live voice agent over a signed URL.
    Immersive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationOnlyScreen {
    Modal,
    Conversation(ConversationSubMode),
    Analysis,
}

#[derive(Debug, Clone)]
pub struct ConversationOnly;

impl Flow for ConversationOnly {
    type Screen = ConversationOnlyScreen;

    const NAME: &'static str = "conversation only";
    const START: ConversationOnlyScreen = ConversationOnlyScreen::Modal;
    const STORAGE_KEYS: &'static [&'static str] = &[keys::CONVERSATION_HISTORY];

    fn can_advance(from: ConversationOnlyScreen, to: ConversationOnlyScreen) -> bool {
        use ConversationOnlyScreen::*;
        matches!((from, to), (Modal, Conversation(_)) | (Conversation(_), Analysis))
    }
}

impl FlowSession<ConversationOnly> {
    pub fn select_mode(&mut self, mode: ConversationSubMode) -> Result<(), SessionError> {
        self.advance(ConversationOnlyScreen::Conversation(mode))
    }

    pub fn end_conversation(&mut self, history: &[ConversationMessage]) -> Result<(), SessionError> {
        self.advance(ConversationOnlyScreen::Analysis)?;
        self.storage_mut()
            .set_json(keys::CONVERSATION_HISTORY, &history)?;
        self.begin_request()
    }

    pub fn analysis_received(&mut self) {
        self.finish_request();
    }
}

// ---------------------------------------------------------------------------
// Quick translation
// ---------------------------------------------------------------------------

/// English text shown when the translation request fails.
pub const TRANSLATION_UNAVAILABLE: &str = "Translation unavailable";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickTranslationScreen {
    Conversation,
    Translation,
}

#[derive(Debug, Clone)]
pub struct QuickTranslation;

impl Flow for QuickTranslation {
    type Screen = QuickTranslationScreen;

    const NAME: &'static str = "quick translation";
    const START: QuickTranslationScreen = QuickTranslationScreen::Conversation;
    const STORAGE_KEYS: &'static [&'static str] = &[keys::TRANSLATION_CONTEXT];

    fn can_advance(from: QuickTranslationScreen, to: QuickTranslationScreen) -> bool {
        from == QuickTranslationScreen::Conversation && to == QuickTranslationScreen::Translation
    }
}

/// Chat message asking the model to translate `vietnamese`.
pub fn translation_message(vietnamese: &str) -> String {
    format!("Translate this Vietnamese to English:\n\n{vietnamese}")
}

impl FlowSession<QuickTranslation> {
    /// Start translating the first turn of `history`; returns the chat
    /// message to send.
    pub fn request_translation(&mut self, history: &[ConversationMessage]) -> Result<String, SessionError> {
        self.begin_request()?;
        let vietnamese = history.first().map(|m| m.content.as_str()).unwrap_or("");
        Ok(translation_message(vietnamese))
    }

    /// Store the translation (or the unavailable marker when the request
    /// failed) and show it.
    pub fn translation_received(
        &mut self,
        vietnamese: &str,
        english: Option<&str>,
    ) -> Result<TranslationPair, SessionError> {
        self.finish_request();
        let pair = TranslationPair {
            vietnamese_text: vietnamese.to_string(),
            english_text: english.unwrap_or(TRANSLATION_UNAVAILABLE).to_string(),
        };
        if english.is_some() {
            self.storage_mut()
                .set_json(keys::TRANSLATION_CONTEXT, &pair)?;
        }
        self.advance(QuickTranslationScreen::Translation)?;
        Ok(pair)
    }
}

// ---------------------------------------------------------------------------
// Immersive
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImmersiveScreen {
    Conversation,
    Analysis,
}

#[derive(Debug, Clone)]
pub struct Immersive;

impl Flow for Immersive {
    type Screen = ImmersiveScreen;

    const NAME: &'static str = "immersive";
    const START: ImmersiveScreen = ImmersiveScreen::Conversation;
    const STORAGE_KEYS: &'static [&'static str] =
        &[keys::CONVERSATION_MESSAGES, keys::ANALYSIS_LOADING];

    fn can_advance(from: ImmersiveScreen, to: ImmersiveScreen) -> bool {
        from == ImmersiveScreen::Conversation && to == ImmersiveScreen::Analysis
    }
}

impl FlowSession<Immersive> {
    /// Hand the live transcript to the analysis screen.
    pub fn end_conversation(&mut self, messages: &[ConversationMessage]) -> Result<(), SessionError> {
        self.storage_mut()
            .set_json(keys::CONVERSATION_MESSAGES, &messages)?;
        self.storage_mut().set(keys::ANALYSIS_LOADING, "true");
        self.advance(ImmersiveScreen::Analysis)?;
        self.begin_request()
    }

    /// Transcript waiting to be analyzed, if any.
    pub fn pending_messages(&self) -> Result<Option<Vec<ConversationMessage>>, SessionError> {
        self.storage().get_json(keys::CONVERSATION_MESSAGES)
    }

    pub fn is_analysis_loading(&self) -> bool {
        self.storage().get(keys::ANALYSIS_LOADING) == Some("true")
    }

    /// Analysis done (or failed): drop the transcript, clear the flag.
    pub fn analysis_finished(&mut self) {
        self.finish_request();
        self.storage_mut().remove(keys::CONVERSATION_MESSAGES);
        self.storage_mut().set(keys::ANALYSIS_LOADING, "false");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn spoken() -> Vec<ConversationMessage> {
        vec![
            ConversationMessage::user("Hôm nay tôi đi làm"),
            ConversationMessage::user("Today I go to work"),
        ]
    }

    #[test]
    fn full_practice_with_chat() {
        let mut session = FlowSession::<FullPractice>::new();
        assert_eq!(session.screen(), FullPracticeScreen::Conversation);

        session.end_conversation(&spoken()).unwrap();
        assert_eq!(session.screen(), FullPracticeScreen::Feedback);
        assert!(session.is_in_flight());

        session
            .feedback_received(&TranslationFeedback::fallback())
            .unwrap();
        assert!(!session.is_in_flight());
        let context = session.chat_context().unwrap().unwrap();
        assert_eq!(context.english_text, "Today I go to work");

        session.start_chat().unwrap();
        session
            .record_chat(&[ConversationMessage::user("It was busy")])
            .unwrap();
        session.request_diary().unwrap();
        assert_eq!(session.screen(), FullPracticeScreen::Diary);
        assert!(session.storage().contains(keys::CHAT_HISTORY));
    }

    #[test]
    fn full_practice_can_skip_chat() {
        let mut session = FlowSession::<FullPractice>::new();
        session.end_conversation(&spoken()).unwrap();
        session.finish_request();
        session.request_diary().unwrap();
        assert_eq!(session.screen(), FullPracticeScreen::Diary);
    }

    #[test]
    fn transitions_are_forward_only() {
        let mut session = FlowSession::<FullPractice>::new();
        assert!(session.advance(FullPracticeScreen::Diary).is_err());
        session.advance(FullPracticeScreen::Feedback).unwrap();
        let err = session.advance(FullPracticeScreen::Conversation).unwrap_err();
        assert!(matches!(err, SessionError::InvalidTransition { .. }));
    }

    #[test]
    fn second_request_while_in_flight_is_refused() {
        let mut session = FlowSession::<FullPractice>::new();
        session.end_conversation(&spoken()).unwrap();
        assert!(matches!(
            session.begin_request(),
            Err(SessionError::RequestInFlight { .. })
        ));
    }

    #[test]
    fn back_to_start_clears_only_flow_keys() {
        let mut session = FlowSession::<FullPractice>::new();
        session.storage_mut().set("unrelated", "kept");
        session.end_conversation(&spoken()).unwrap();
        session
            .feedback_received(&TranslationFeedback::fallback())
            .unwrap();

        session.back_to_start();
        assert_eq!(session.screen(), FullPracticeScreen::Conversation);
        assert!(!session.is_in_flight());
        assert!(!session.storage().contains(keys::CONVERSATION_HISTORY));
        assert!(!session.storage().contains(keys::CHAT_CONTEXT));
        assert_eq!(session.storage().get("unrelated"), Some("kept"));
    }

    #[test]
    fn conversation_only_flow() {
        let mut session = FlowSession::<ConversationOnly>::new();
        assert_eq!(session.screen(), ConversationOnlyScreen::Modal);
        assert!(session.advance(ConversationOnlyScreen::Analysis).is_err());

        session.select_mode(ConversationSubMode::Immersive).unwrap();
        assert_eq!(
            session.screen(),
            ConversationOnlyScreen::Conversation(ConversationSubMode::Immersive)
        );
        session.end_conversation(&spoken()).unwrap();
        session.analysis_received();
        assert_eq!(session.screen(), ConversationOnlyScreen::Analysis);

        session.back_to_start();
        assert!(session.storage().is_empty());
    }

    #[test]
    fn quick_translation_success_and_failure() {
        let mut session = FlowSession::<QuickTranslation>::new();
        let message = session.request_translation(&spoken()).unwrap();
        assert_eq!(message, "Translate this Vietnamese to English:\n\nHôm nay tôi đi làm");

        let pair = session
            .translation_received("Hôm nay tôi đi làm", Some("Today I went to work"))
            .unwrap();
        assert_eq!(pair.english_text, "Today I went to work");
        assert!(session.storage().contains(keys::TRANSLATION_CONTEXT));

        // translate again
        session.back_to_start();
        assert!(!session.storage().contains(keys::TRANSLATION_CONTEXT));

        session.request_translation(&spoken()).unwrap();
        let pair = session.translation_received("Hôm nay", None).unwrap();
        assert_eq!(pair.english_text, TRANSLATION_UNAVAILABLE);
        assert!(!session.storage().contains(keys::TRANSLATION_CONTEXT));
        assert_eq!(session.screen(), QuickTranslationScreen::Translation);
    }

    #[test]
    fn immersive_hand_off() {
        let mut session = FlowSession::<Immersive>::new();
        session.end_conversation(&spoken()).unwrap();
        assert!(session.is_analysis_loading());
        assert_eq!(session.pending_messages().unwrap().map(|m| m.len()), Some(2));

        session.analysis_finished();
        assert!(!session.is_analysis_loading());
        assert!(session.pending_messages().unwrap().is_none());

        session.back_to_start();
        assert!(session.storage().is_empty());
    }
}
