//! Conversation messages and transcripts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// `deserialize_with` helper: an explicit JSON `null` reads as the type's
/// default, the same as a missing field.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Speaker of a message.
///
/// The live voice-agent flow labels the other party `agent`; it is accepted on
/// input and treated as [`Role::Assistant`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    #[serde(alias = "agent")]
    Assistant,
}

impl Role {
    /// Speaker label used in analysis and chat transcripts.
    pub fn transcript_label(self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "Assistant",
        }
    }

    /// Speaker label used in diary prompts, written from the learner's side.
    pub fn diary_label(self) -> &'static str {
        match self {
            Role::User => "Me",
            Role::Assistant => "Listener",
        }
    }
}

// ---------------------------------------------------------------------------
// ConversationMessage
// ---------------------------------------------------------------------------

/// One turn of a practice conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: Role,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl ConversationMessage {
    /// A message stamped with the current time.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Some(Utc::now()),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

// ---------------------------------------------------------------------------
// Transcript helpers
// ---------------------------------------------------------------------------

/// Render `history` as `User: …` / `Assistant: …` lines.
///
/// ```
/// use lingo_coach::conversation::{format_transcript, ConversationMessage};
///
/// let history = vec![
///     ConversationMessage::user("Hi"),
///     ConversationMessage::assistant("Hello!"),
/// ];
/// assert_eq!(format_transcript(&history), "User: Hi\nAssistant: Hello!");
/// ```
pub fn format_transcript(history: &[ConversationMessage]) -> String {
    history
        .iter()
        .map(|m| format!("{}: {}", m.role.transcript_label(), m.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render `history` as `Me: …` / `Listener: …` lines for the diary prompts.
/// Returns `None` when there is nothing to render.
pub fn format_diary_chat(history: &[ConversationMessage]) -> Option<String> {
    if history.is_empty() {
        return None;
    }
    Some(
        history
            .iter()
            .map(|m| format!("{}: {}", m.role.diary_label(), m.content))
            .collect::<Vec<_>>()
            .join("\n"),
    )
}

// ---------------------------------------------------------------------------
// Transcript
// ---------------------------------------------------------------------------

/// Append-only message list owned by the active screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    messages: Vec<ConversationMessage>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message stamped now.
    pub fn push(&mut self, role: Role, content: impl Into<String>) {
        self.messages.push(ConversationMessage::new(role, content));
    }

    /// Append an already-built message.
    pub fn push_message(&mut self, message: ConversationMessage) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[ConversationMessage] {
        &self.messages
    }

    /// The most recent message, if any.
    pub fn last(&self) -> Option<&ConversationMessage> {
        self.messages.last()
    }

    /// The most recent `n` messages (fewer if the transcript is shorter).
    pub fn last_n(&self, n: usize) -> &[ConversationMessage] {
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Drop every message (end of session).
    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

impl From<Vec<ConversationMessage>> for Transcript {
    fn from(messages: Vec<ConversationMessage>) -> Self {
        Self { messages }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
