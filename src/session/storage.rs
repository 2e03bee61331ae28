//! Transient per-tab session storage: an in-memory string map with JSON
//! helpers, cleared when a flow returns to its start.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::SessionError;

/// Keys written by the practice flows.
pub mod keys {
    /// Full transcript of the speaking phase (full practice, conversation only).
    pub const CONVERSATION_HISTORY: &str = "conversationHistory";
    /// Vietnamese/English pair carried into the reflective chat.
    pub const CHAT_CONTEXT: &str = "chatContext";
    /// Reflective chat transcript.
    pub const CHAT_HISTORY: &str = "chatHistory";
    /// Vietnamese text and its machine translation.
    pub const TRANSLATION_CONTEXT: &str = "translationContext";
    /// Transcript handed from the immersive session to the analysis screen.
    pub const CONVERSATION_MESSAGES: &str = "conversationMessages";
    /// `"true"` while the immersive analysis is loading.
    pub const ANALYSIS_LOADING: &str = "analysisLoading";
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionStorage {
    items: BTreeMap<String, String>,
}

impl SessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.items.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.items.insert(key.to_string(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.items.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.items.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Store `value` serialized as JSON.
    pub fn set_json<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), SessionError> {
        let text = serde_json::to_string(value)?;
        self.set(key, text);
        Ok(())
    }

    /// Read and deserialize `key`; `Ok(None)` when absent.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, SessionError> {
        self.get(key)
            .map(|text| serde_json::from_str(text).map_err(SessionError::from))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::{ConversationMessage, TranslationPair};

    #[test]
    fn set_get_remove() {
        let mut storage = SessionStorage::new();
        storage.set(keys::ANALYSIS_LOADING, "true");
        assert_eq!(storage.get(keys::ANALYSIS_LOADING), Some("true"));
        assert_eq!(storage.remove(keys::ANALYSIS_LOADING).as_deref(), Some("true"));
        assert!(storage.is_empty());
    }

    #[test]
    fn json_values() {
        let mut storage = SessionStorage::new();
        let pair = TranslationPair {
            vietnamese_text: "Xin chào".into(),
            english_text: "Hello".into(),
        };
        storage.set_json(keys::CHAT_CONTEXT, &pair).unwrap();
        assert!(storage.get(keys::CHAT_CONTEXT).unwrap().contains("vietnameseText"));
        let back: Option<TranslationPair> = storage.get_json(keys::CHAT_CONTEXT).unwrap();
        assert_eq!(back, Some(pair));

        let missing: Option<Vec<ConversationMessage>> =
            storage.get_json(keys::CHAT_HISTORY).unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn corrupt_json_is_an_error() {
        let mut storage = SessionStorage::new();
        storage.set(keys::CHAT_HISTORY, "[{");
        assert!(storage
            .get_json::<Vec<ConversationMessage>>(keys::CHAT_HISTORY)
            .is_err());
    }
}
