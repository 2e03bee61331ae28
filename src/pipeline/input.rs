//! Validation of inbound request fields.

use serde_json::Value;

use crate::conversation::ConversationMessage;

use super::outcome::PipelineError;

pub const HISTORY_REQUIRED: &str = "Conversation history is required";

/// Parse `conversationHistory`: it must be a non-empty array of messages.
/// `null`, a missing field, a non-array, an empty array or an unreadable
/// element are all rejected with the same message.
pub fn require_history(value: Option<&Value>) -> Result<Vec<ConversationMessage>, PipelineError> {
    let items = match value {
        Some(Value::Array(items)) if !items.is_empty() => items,
        _ => return Err(PipelineError::InvalidInput(HISTORY_REQUIRED.into())),
    };
    items
        .iter()
        .map(|item| {
            serde_json::from_value(item.clone())
                .map_err(|_| PipelineError::InvalidInput(HISTORY_REQUIRED.into()))
        })
        .collect()
}

/// Parse an optional message list, treating `null`/absence as empty.
pub fn optional_history(value: Option<&Value>) -> Result<Vec<ConversationMessage>, PipelineError> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(other) => serde_json::from_value(other.clone())
            .map_err(|e| PipelineError::InvalidInput(format!("Invalid message list: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::Role;
    use serde_json::json;

    #[test]
    fn rejects_every_malformed_shape() {
        for bad in [None, Some(json!(null)), Some(json!("text")), Some(json!([])), Some(json!({}))] {
            let err = require_history(bad.as_ref()).unwrap_err();
            assert_eq!(err.to_string(), HISTORY_REQUIRED);
        }
    }

    #[test]
    fn rejects_unreadable_elements() {
        let bad = json!([{"role": "wizard", "content": "hi"}]);
        assert!(require_history(Some(&bad)).is_err());
    }

    #[test]
    fn accepts_messages_and_agent_role() {
        let ok = json!([
            {"role": "user", "content": "Hello"},
            {"role": "agent", "content": "Hi!", "timestamp": "2026-10-18T09:00:00Z"}
        ]);
        let history = require_history(Some(&ok)).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].role, Role::Assistant);
    }

    #[test]
    fn optional_history_defaults_to_empty() {
        assert!(optional_history(None).unwrap().is_empty());
        assert!(optional_history(Some(&json!(null))).unwrap().is_empty());
        assert!(optional_history(Some(&json!(42))).is_err());
    }
}
