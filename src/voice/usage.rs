//! Character-usage statistics for the voice account.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::cost::pricing::ELEVENLABS_FREE_TIER_CHARS;

/// Usage category that aggregates every other one.
pub const ALL_CATEGORY: &str = "All";

/// Query window in Unix milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageWindow {
    pub start_unix_ms: i64,
    pub end_unix_ms: i64,
}

impl UsageWindow {
    /// The `days` days ending at `now`.
    pub fn last_days(days: i64, now: DateTime<Utc>) -> Self {
        Self {
            start_unix_ms: (now - Duration::days(days)).timestamp_millis(),
            end_unix_ms: now.timestamp_millis(),
        }
    }
}

/// `character-stats` response: one timestamp series and per-category counts
/// aligned with it.  Counts arrive as JSON numbers that may be floats.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UsageStats {
    pub time: Vec<i64>,
    pub usage: BTreeMap<String, Vec<f64>>,
}

impl UsageStats {
    /// Sum of the `All` series rounded to whole characters; zero when the
    /// category is absent.
    pub fn total_characters(&self) -> u64 {
        let total: f64 = self
            .usage
            .get(ALL_CATEGORY)
            .map(|counts| counts.iter().sum())
            .unwrap_or(0.0);
        total.max(0.0).round() as u64
    }

    pub fn within_free_tier(&self) -> bool {
        self.total_characters() < ELEVENLABS_FREE_TIER_CHARS
    }

    pub fn free_tier_remaining(&self) -> u64 {
        ELEVENLABS_FREE_TIER_CHARS.saturating_sub(self.total_characters())
    }

    /// Multi-line human-readable summary, also written to the log.
    pub fn summary(&self, window_days: i64) -> String {
        let status = if self.within_free_tier() {
            "FREE TIER"
        } else {
            "PAID TIER"
        };
        format!(
            "ElevenLabs Usage Summary:\n  \
             - Total characters used: {}\n  \
             - Free tier remaining: {} / {}\n  \
             - Status: {}\n  \
             - Period: Last {} days",
            group_thousands(self.total_characters()),
            group_thousands(self.free_tier_remaining()),
            group_thousands(ELEVENLABS_FREE_TIER_CHARS),
            status,
            window_days
        )
    }
}

/// `12345` → `"12,345"`.
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn stats(all: &[f64]) -> UsageStats {
        let mut usage = BTreeMap::new();
        usage.insert(ALL_CATEGORY.to_string(), all.to_vec());
        UsageStats {
            time: (0..all.len() as i64).collect(),
            usage,
        }
    }

    #[test]
    fn window_is_in_milliseconds() {
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 0, 0, 0).unwrap();
        let window = UsageWindow::last_days(30, now);
        assert_eq!(window.end_unix_ms, now.timestamp_millis());
        assert_eq!(window.end_unix_ms - window.start_unix_ms, 30 * 24 * 60 * 60 * 1000);
    }

    #[test]
    fn totals_and_tier() {
        let s = stats(&[1200.0, 800.0, 500.0]);
        assert_eq!(s.total_characters(), 2500);
        assert_eq!(s.free_tier_remaining(), 7500);
        assert!(s.within_free_tier());

        let over = stats(&[9000.0, 1500.0]);
        assert_eq!(over.free_tier_remaining(), 0);
        assert!(!over.within_free_tier());
    }

    #[test]
    fn missing_all_category_counts_as_zero() {
        let s: UsageStats =
            serde_json::from_str(r#"{"time":[1],"usage":{"voice":[10]}}"#).unwrap();
        assert_eq!(s.total_characters(), 0);
    }

    #[test]
    fn float_counts_are_accepted() {
        let s: UsageStats =
            serde_json::from_str(r#"{"time":[1738252091000],"usage":{"All":[49.0, 50.6]}}"#)
                .unwrap();
        assert_eq!(s.total_characters(), 100);

        let mixed: UsageStats =
            serde_json::from_str(r#"{"time":[1,2],"usage":{"All":[10, 2.5]}}"#).unwrap();
        assert_eq!(mixed.total_characters(), 13);
    }

    #[test]
    fn summary_mentions_totals() {
        let text = stats(&[12_345.0]).summary(30);
        assert!(text.contains("Total characters used: 12,345"));
        assert!(text.contains("Free tier remaining: 0 / 10,000"));
        assert!(text.contains("PAID TIER"));
        assert!(text.contains("Last 30 days"));
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }
}
