//! Diary entries generated at the end of the full-practice flow.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

/// Entry text used when a model pass returns no `entry`.
pub const DEFAULT_DIARY_ENTRY: &str = "Today was a day worth remembering.";

/// Shape the model is asked to return for each diary pass.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DiaryDraft {
    #[serde(deserialize_with = "super::message::null_as_default")]
    pub entry: String,
}

impl DiaryDraft {
    /// The entry text, or `None` when blank.
    pub fn text(&self) -> Option<&str> {
        let trimmed = self.entry.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

/// Two renditions of the learner's day plus a human-readable stamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaryEntries {
    pub authentic_version: String,
    pub literary_version: String,
    /// e.g. `October 18, 2026`
    pub date: String,
    /// e.g. `02:30 PM`
    pub time: String,
}

impl DiaryEntries {
    /// Build entries stamped with `now`.
    pub fn new<Tz: TimeZone>(
        authentic: impl Into<String>,
        literary: impl Into<String>,
        now: &DateTime<Tz>,
    ) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self {
            authentic_version: authentic.into(),
            literary_version: literary.into(),
            date: now.format("%B %-d, %Y").to_string(),
            time: now.format("%I:%M %p").to_string(),
        }
    }

    /// Static entries served when generation fails.
    pub fn fallback<Tz: TimeZone>(now: &DateTime<Tz>) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self::new(
            "Today I practiced speaking and reflecting on my day.",
            "Today marked another step in my journey of language and self-discovery.",
            now,
        )
    }
}
