//! Translation feedback for the full-practice flow.
//!
//! The learner first speaks Vietnamese, then tries an English version.  The
//! first two transcript messages are therefore read as a
//! [`TranslationPair`]; either side may be empty.

use serde::{Deserialize, Serialize};

use super::message::{null_as_default, ConversationMessage};

// ---------------------------------------------------------------------------
// TranslationPair
// ---------------------------------------------------------------------------

/// Vietnamese source and English attempt, as carried between screens (the
/// `chatContext` session value) and into the reflective chat and diary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TranslationPair {
    #[serde(deserialize_with = "null_as_default")]
    pub vietnamese_text: String,
    #[serde(deserialize_with = "null_as_default")]
    pub english_text: String,
}

impl TranslationPair {
    /// Take the first message as Vietnamese and the second as English,
    /// trimming both.  Missing messages yield empty strings.
    pub fn from_history(history: &[ConversationMessage]) -> Self {
        let text_at = |idx: usize| {
            history
                .get(idx)
                .map(|m| m.content.trim().to_string())
                .unwrap_or_default()
        };
        Self {
            vietnamese_text: text_at(0),
            english_text: text_at(1),
        }
    }

    pub fn vietnamese(&self) -> Option<&str> {
        non_empty(&self.vietnamese_text)
    }

    pub fn english(&self) -> Option<&str> {
        non_empty(&self.english_text)
    }
}

fn non_empty(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

// ---------------------------------------------------------------------------
// TranslationFeedback
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackVocab {
    pub word: String,
    pub meaning: String,
    pub example: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrammarStructure {
    pub structure: String,
    pub explanation: String,
    pub example: String,
}

/// Feedback on one Vietnamese/English attempt.
///
/// `analysis_type` is filled in by the pipeline with the label of the
/// template that produced the value; the model never supplies it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TranslationFeedback {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub analysis_type: String,
    pub best_version: String,
    pub vocabulary_suggestions: Vec<FeedbackVocab>,
    pub grammar_structures: Vec<GrammarStructure>,
    pub summary: String,
}

impl TranslationFeedback {
    /// Served when the model call fails or its output is unparseable.
    pub fn fallback() -> Self {
        Self {
            analysis_type: String::new(),
            best_version: "Unable to generate feedback at this time.".into(),
            vocabulary_suggestions: Vec::new(),
            grammar_structures: Vec::new(),
            summary: "Good work practicing! Keep it up and you'll continue to improve.".into(),
        }
    }

    /// Served without calling the model when neither language was spoken.
    pub fn no_content() -> Self {
        Self {
            analysis_type: String::new(),
            best_version: "Please speak in Vietnamese or English to get feedback!".into(),
            vocabulary_suggestions: Vec::new(),
            grammar_structures: Vec::new(),
            summary: "Start by speaking about your day in either Vietnamese or English, then we can help you learn.".into(),
        }
    }

    /// Tag the value with the template label and restore non-blank text
    /// fields from the fallback.
    pub fn completed(mut self, analysis_type: &str) -> Self {
        let fallback = Self::fallback();
        self.analysis_type = analysis_type.to_string();
        if self.best_version.trim().is_empty() {
            self.best_version = fallback.best_version;
        }
        if self.summary.trim().is_empty() {
            self.summary = fallback.summary;
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
