//! Prompt templates and the builders that fill them.
//!
//! Templates are plain strings with `{NAME}` placeholders.  Filling is a
//! single left-to-right scan: each placeholder token is replaced by its
//! value (or the template's sentinel when the value is missing or blank),
//! and substituted text is never scanned again.  JSON braces inside the
//! templates are left alone because they never spell a placeholder token.
//!
//! | Builder                       | Template(s)                                  |
//! |-------------------------------|----------------------------------------------|
//! | [`build_feedback_prompt`]     | chosen by [`FeedbackCase`]                   |
//! | [`build_analysis_prompt`]     | [`CONVERSATION_DETAILED_ANALYSIS`]           |
//! | [`build_reflective_system_prompt`] | [`REFLECTIVE_CHAT`]                     |
//! | [`build_diary_authentic_prompt`] / [`build_diary_literary_prompt`] | [`DIARY_AUTHENTIC`] / [`DIARY_LITERARY`] |
//! | [`build_conversation_prompt`] | system prompt + transcript + new message     |

use serde::{Deserialize, Serialize};

use crate::conversation::{format_transcript, ConversationMessage, TranslationPair};

// ---------------------------------------------------------------------------
// Placeholders and templates
// ---------------------------------------------------------------------------

/// Every placeholder a template may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    Vietnamese,
    English,
    Conversation,
    ChatHistory,
    AuthenticEntry,
}

impl Placeholder {
    pub const ALL: [Placeholder; 5] = [
        Placeholder::Vietnamese,
        Placeholder::English,
        Placeholder::Conversation,
        Placeholder::ChatHistory,
        Placeholder::AuthenticEntry,
    ];

    /// Literal token as it appears in template text.
    pub fn token(self) -> &'static str {
        match self {
            Placeholder::Vietnamese => "{VIETNAMESE}",
            Placeholder::English => "{ENGLISH}",
            Placeholder::Conversation => "{CONVERSATION}",
            Placeholder::ChatHistory => "{CHAT_HISTORY}",
            Placeholder::AuthenticEntry => "{AUTHENTIC_ENTRY}",
        }
    }
}

/// A static prompt with its display name and missing-value sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptTemplate {
    /// Human-readable name, also reported as the feedback `analysisType`.
    pub name: &'static str,
    pub text: &'static str,
    /// Written in place of any placeholder whose value is missing or blank.
    pub sentinel: &'static str,
}

impl PromptTemplate {
    /// Substitute placeholders in one pass.
    ///
    /// Placeholders absent from `values`, or mapped to `None` or blank text,
    /// become [`sentinel`](Self::sentinel).
    pub fn fill(&self, values: &[(Placeholder, Option<&str>)]) -> String {
        let mut out = String::with_capacity(self.text.len() + 256);
        let mut rest = self.text;

        while let Some(pos) = rest.find('{') {
            out.push_str(&rest[..pos]);
            let tail = &rest[pos..];
            match Placeholder::ALL.iter().find(|p| tail.starts_with(p.token())) {
                Some(&placeholder) => {
                    let value = values
                        .iter()
                        .find(|(p, _)| *p == placeholder)
                        .and_then(|(_, v)| *v)
                        .filter(|v| !v.trim().is_empty())
                        .unwrap_or(self.sentinel);
                    out.push_str(value);
                    rest = &tail[placeholder.token().len()..];
                }
                None => {
                    out.push('{');
                    rest = &tail[1..];
                }
            }
        }
        out.push_str(rest);
        out
    }
}

/// Default chat system prompt, used when no hosted prompt is configured or
/// the hosted fetch fails.
pub const DEFAULT_CONVERSATION_PROMPT: &str = "\
You are a friendly English conversation partner helping users practice their speaking skills.
Keep responses natural, conversational, and encouraging.
Ask follow-up questions to keep the conversation going.
Keep responses concise (2-3 sentences max) so they're easy to listen to.
Occasionally provide gentle corrections or suggest better ways to phrase things.";

pub const TRANSLATION_FEEDBACK: PromptTemplate = PromptTemplate {
    name: "Translation Comparison",
    sentinel: "Not provided",
    text: r#"You are a warm, expert English teacher helping a Vietnamese speaker learn to express their day in English.

The learner first described their day in Vietnamese:
{VIETNAMESE}

Then they tried to say the same thing in English:
{ENGLISH}

Compare the English attempt with the meaning of the Vietnamese original and respond in the following JSON format:
{
  "bestVersion": "The most natural English version of what they meant, building on their own attempt",
  "vocabularySuggestions": [
    { "word": "useful word or phrase", "meaning": "meaning in simple English", "example": "example sentence" }
  ],
  "grammarStructures": [
    { "structure": "grammar pattern", "explanation": "when and why to use it", "example": "example sentence" }
  ],
  "summary": "Two or three encouraging sentences on what they did well and one thing to practice next"
}

Give 3-5 vocabulary suggestions and 2-3 grammar structures drawn from what they were trying to say.

Return ONLY valid JSON, no markdown formatting or additional text."#,
};

pub const VIETNAMESE_TO_ENGLISH: PromptTemplate = PromptTemplate {
    name: "Vietnamese Translation",
    sentinel: "Not provided",
    text: r#"You are a warm, expert English teacher helping a Vietnamese speaker learn to express their day in English.

The learner described their day in Vietnamese but did not try an English version yet:
{VIETNAMESE}

Translate it into natural, everyday spoken English and teach from it, responding in the following JSON format:
{
  "bestVersion": "A natural English version of what they said",
  "vocabularySuggestions": [
    { "word": "key word or phrase from the translation", "meaning": "meaning in simple English", "example": "example sentence" }
  ],
  "grammarStructures": [
    { "structure": "grammar pattern used in the translation", "explanation": "when and why to use it", "example": "example sentence" }
  ],
  "summary": "Two or three encouraging sentences inviting them to try saying it in English next time"
}

Give 3-5 vocabulary suggestions and 2-3 grammar structures.

Return ONLY valid JSON, no markdown formatting or additional text."#,
};

pub const ENGLISH_ANALYSIS: PromptTemplate = PromptTemplate {
    name: "English Analysis",
    sentinel: "Not provided",
    text: r#"You are a warm, expert English teacher helping a Vietnamese speaker improve their spoken English.

The learner described their day in English:
{ENGLISH}

Improve their English while keeping their meaning and voice, responding in the following JSON format:
{
  "bestVersion": "A more natural and fluent version of what they said",
  "vocabularySuggestions": [
    { "word": "better word or phrase", "meaning": "meaning in simple English", "example": "example sentence" }
  ],
  "grammarStructures": [
    { "structure": "grammar pattern they should practice", "explanation": "when and why to use it", "example": "example sentence" }
  ],
  "summary": "Two or three encouraging sentences on their strengths and one focus area"
}

Give 3-5 vocabulary suggestions and 2-3 grammar structures.

Return ONLY valid JSON, no markdown formatting or additional text."#,
};

pub const CONVERSATION_DETAILED_ANALYSIS: PromptTemplate = PromptTemplate {
    name: "Conversation Analysis",
    sentinel: "No conversation",
    text: r#"You are an expert English conversation coach analyzing a learner's conversation practice.

Full conversation:
{CONVERSATION}

Analyze the learner's English in detail and provide feedback in the following JSON format:
{
  "sentenceAnalysis": [
    {
      "original": "What the user said",
      "improved": "A more natural way to say it",
      "issues": ["issue 1", "issue 2"],
      "tips": "Specific advice for this sentence"
    }
  ],
  "overallStrengths": ["strength 1", "strength 2", "strength 3"],
  "areasToImprove": [
    {
      "area": "Name of area (e.g., 'Pronunciation', 'Grammar', 'Vocabulary')",
      "explanation": "What to focus on",
      "examples": ["example 1", "example 2"]
    }
  ],
  "vocabularySuggestions": [
    {
      "word": "useful word",
      "meaning": "definition",
      "example": "example sentence",
      "context": "when/why to use it"
    }
  ],
  "summary": "Encouraging overall summary with key takeaways"
}

Guidelines:

1. Sentence Analysis: examine ONLY the user's messages, not the assistant's. For each one show the original, a more fluent version, the specific issues and an actionable tip.
2. Overall Strengths: 3-4 things the learner did well.
3. Areas to Improve: 2-3 key areas with examples taken from the conversation.
4. Vocabulary Suggestions: 4-5 words or phrases that would enrich their expression, with context for when to use them.
5. Summary: 3-4 encouraging sentences that name their main strengths and 1-2 focus areas for next time.

Return ONLY valid JSON, no markdown formatting or additional text."#,
};

pub const REFLECTIVE_CHAT: PromptTemplate = PromptTemplate {
    name: "Reflective Chat",
    sentinel: "N/A",
    text: "\
You are a gentle, curious listener helping a language learner reflect on their day in English.
Ask one thoughtful open question at a time about their feelings, the people involved and what the day meant to them.
Keep replies short (2-3 sentences) and simple enough for an intermediate learner to follow by ear.
If they make a mistake, model the correct phrasing naturally in your reply instead of correcting them directly.

Context: The user previously shared about their day:
Vietnamese: {VIETNAMESE}
English: {ENGLISH}

Now they want to reflect on this experience with you.",
};

pub const DIARY_AUTHENTIC: PromptTemplate = PromptTemplate {
    name: "Diary (authentic)",
    sentinel: "Not provided",
    text: r#"You are helping a language learner turn today's practice into a personal English diary entry.

What they said about their day in Vietnamese:
{VIETNAMESE}

Their English version:
{ENGLISH}

Their reflective conversation:
{CHAT_HISTORY}

Write a first-person diary entry in simple, natural English that stays faithful to their own words, details and feelings. Do not invent events. Keep it to one or two short paragraphs.

Respond in the following JSON format:
{ "entry": "the diary entry" }

Return ONLY valid JSON, no markdown formatting or additional text."#,
};

pub const DIARY_LITERARY: PromptTemplate = PromptTemplate {
    name: "Diary (literary)",
    sentinel: "Not provided",
    text: r#"You are a gifted writer helping a language learner see how their day could be told in expressive English.

Their own diary entry:
{AUTHENTIC_ENTRY}

Background, in Vietnamese:
{VIETNAMESE}

Background, in English:
{ENGLISH}

Their reflective conversation:
{CHAT_HISTORY}

Rewrite the diary entry as a short literary piece in the first person: vivid imagery, varied sentence rhythm and a reflective closing line, while keeping every fact from their entry. Stay under 200 words.

Respond in the following JSON format:
{ "entry": "the literary diary entry" }

Return ONLY valid JSON, no markdown formatting or additional text."#,
};

// ---------------------------------------------------------------------------
// Feedback
// ---------------------------------------------------------------------------

/// Which languages the learner actually spoke in the full-practice flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackCase {
    VietnameseOnly,
    EnglishOnly,
    Both,
    Neither,
}

impl FeedbackCase {
    pub fn classify(pair: &TranslationPair) -> Self {
        match (pair.vietnamese(), pair.english()) {
            (Some(_), Some(_)) => FeedbackCase::Both,
            (Some(_), None) => FeedbackCase::VietnameseOnly,
            (None, Some(_)) => FeedbackCase::EnglishOnly,
            (None, None) => FeedbackCase::Neither,
        }
    }

    /// Template for this case; `Neither` needs no model call.
    pub fn template(self) -> Option<&'static PromptTemplate> {
        match self {
            FeedbackCase::Both => Some(&TRANSLATION_FEEDBACK),
            FeedbackCase::VietnameseOnly => Some(&VIETNAMESE_TO_ENGLISH),
            FeedbackCase::EnglishOnly => Some(&ENGLISH_ANALYSIS),
            FeedbackCase::Neither => None,
        }
    }
}

/// Feedback prompt for the first two transcript turns, with the template
/// chosen.  `None` when neither language was spoken.
pub fn build_feedback_prompt(pair: &TranslationPair) -> Option<(&'static PromptTemplate, String)> {
    let template = FeedbackCase::classify(pair).template()?;
    let prompt = template.fill(&[
        (Placeholder::Vietnamese, pair.vietnamese()),
        (Placeholder::English, pair.english()),
    ]);
    Some((template, prompt))
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

pub fn build_analysis_prompt(history: &[ConversationMessage]) -> String {
    let transcript = format_transcript(history);
    CONVERSATION_DETAILED_ANALYSIS.fill(&[(Placeholder::Conversation, Some(&transcript))])
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

/// Chat request mode.  Anything other than `reflective` is an ordinary
/// conversation turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatMode {
    #[default]
    Conversation,
    Reflective,
}

impl ChatMode {
    pub fn from_request(mode: Option<&str>) -> Self {
        match mode {
            Some("reflective") => ChatMode::Reflective,
            _ => ChatMode::Conversation,
        }
    }
}

/// System prompt for the reflective chat, embedding what the learner said
/// earlier.
pub fn build_reflective_system_prompt(context: Option<&TranslationPair>) -> String {
    REFLECTIVE_CHAT.fill(&[
        (Placeholder::Vietnamese, context.and_then(TranslationPair::vietnamese)),
        (Placeholder::English, context.and_then(TranslationPair::english)),
    ])
}

/// Full single-turn prompt: system prompt, prior turns as `User:` /
/// `Assistant:` lines, then the new message and an `Assistant:` cue.
pub fn build_conversation_prompt(
    system_prompt: &str,
    history: &[ConversationMessage],
    message: &str,
) -> String {
    let mut prompt = String::with_capacity(system_prompt.len() + message.len() + 512);
    prompt.push_str(system_prompt.trim_end());
    prompt.push_str("\n\n");
    if !history.is_empty() {
        prompt.push_str("Conversation so far:\n");
        prompt.push_str(&format_transcript(history));
        prompt.push_str("\n\n");
    }
    prompt.push_str(&format!("User: {}\nAssistant:", message.trim()));
    prompt
}

// ---------------------------------------------------------------------------
// Diary
// ---------------------------------------------------------------------------

pub fn build_diary_authentic_prompt(pair: &TranslationPair, chat_history: &str) -> String {
    DIARY_AUTHENTIC.fill(&[
        (Placeholder::Vietnamese, pair.vietnamese()),
        (Placeholder::English, pair.english()),
        (Placeholder::ChatHistory, Some(chat_history)),
    ])
}

pub fn build_diary_literary_prompt(
    authentic_entry: Option<&str>,
    pair: &TranslationPair,
    chat_history: &str,
) -> String {
    DIARY_LITERARY.fill(&[
        (Placeholder::AuthenticEntry, authentic_entry),
        (Placeholder::Vietnamese, pair.vietnamese()),
        (Placeholder::English, pair.english()),
        (Placeholder::ChatHistory, Some(chat_history)),
    ])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
