//! Structured sentence-by-sentence conversation analysis.
//!
//! A [`ConversationAnalysis`] is always *total*: every list defaults to empty
//! and `summary` is never blank, so clients never see a missing field whether
//! the value came from the model or from [`ConversationAnalysis::fallback`].

use serde::{Deserialize, Serialize};

/// Summary used when the model returns none.
pub const DEFAULT_ANALYSIS_SUMMARY: &str =
    "Great job completing your conversation! Keep practicing to build fluency and confidence.";

const FALLBACK_SUMMARY: &str = "Keep practicing! Every conversation helps you improve.";

// ---------------------------------------------------------------------------
// Element types
// ---------------------------------------------------------------------------

/// Feedback on one learner utterance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentenceAnalysis {
    pub original: String,
    pub improved: String,
    pub issues: Vec<String>,
    pub tips: String,
}

/// One focus area with examples drawn from the conversation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AreaToImprove {
    pub area: String,
    pub explanation: String,
    pub examples: Vec<String>,
}

/// A word or phrase worth learning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VocabSuggestion {
    pub word: String,
    pub meaning: String,
    pub example: String,
    pub context: String,
}

// ---------------------------------------------------------------------------
// ConversationAnalysis
// ---------------------------------------------------------------------------

/// Result of one detailed analysis request.  Replaced wholesale on retry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConversationAnalysis {
    pub sentence_analysis: Vec<SentenceAnalysis>,
    pub overall_strengths: Vec<String>,
    pub areas_to_improve: Vec<AreaToImprove>,
    pub vocabulary_suggestions: Vec<VocabSuggestion>,
    pub summary: String,
}

impl Default for ConversationAnalysis {
    fn default() -> Self {
        Self {
            sentence_analysis: Vec::new(),
            overall_strengths: Vec::new(),
            areas_to_improve: Vec::new(),
            vocabulary_suggestions: Vec::new(),
            summary: DEFAULT_ANALYSIS_SUMMARY.to_string(),
        }
    }
}

impl ConversationAnalysis {
    /// Static payload served when the model call fails or is unparseable.
    pub fn fallback() -> Self {
        Self {
            sentence_analysis: Vec::new(),
            overall_strengths: vec![
                "You practiced speaking English".into(),
                "You engaged in conversation".into(),
                "You're building confidence".into(),
            ],
            areas_to_improve: vec![AreaToImprove {
                area: "Keep practicing".into(),
                explanation: "Continue having conversations to improve fluency and confidence"
                    .into(),
                examples: vec![
                    "Practice daily".into(),
                    "Speak naturally".into(),
                    "Don't worry about mistakes".into(),
                ],
            }],
            vocabulary_suggestions: Vec::new(),
            summary: FALLBACK_SUMMARY.into(),
        }
    }

    /// Restore totality after parsing model output: a blank summary is
    /// replaced with [`DEFAULT_ANALYSIS_SUMMARY`].
    pub fn completed(mut self) -> Self {
        if self.summary.trim().is_empty() {
            self.summary = DEFAULT_ANALYSIS_SUMMARY.to_string();
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
