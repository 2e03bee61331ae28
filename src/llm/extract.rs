//! Pulling generated text out of a `generateContent` response envelope.
//!
//! The envelope shape has drifted across API versions, so extraction is an
//! ordered list of pure functions; the first one yielding non-empty text
//! wins.
//!
//! | # | Path                                   |
//! |---|----------------------------------------|
//! | 1 | `.text`                                |
//! | 2 | `.candidates[0].content.parts[0].text` |
//! | 3 | `.candidates[0].content` (string)      |
//! | 4 | `.candidates[0].content.text`          |

use serde_json::Value;

/// One extraction strategy.
pub type Extractor = fn(&Value) -> Option<&str>;

fn direct_text(body: &Value) -> Option<&str> {
    body.get("text")?.as_str()
}

fn first_part_text(body: &Value) -> Option<&str> {
    first_content(body)?.get("parts")?.get(0)?.get("text")?.as_str()
}

fn content_string(body: &Value) -> Option<&str> {
    first_content(body)?.as_str()
}

fn content_text(body: &Value) -> Option<&str> {
    first_content(body)?.get("text")?.as_str()
}

fn first_content(body: &Value) -> Option<&Value> {
    body.get("candidates")?.get(0)?.get("content")
}

/// Extractors in the order they are tried.
pub const EXTRACTORS: [Extractor; 4] = [direct_text, first_part_text, content_string, content_text];

/// Run [`EXTRACTORS`] in order and return the first non-empty text.
pub fn extract_text(body: &Value) -> Option<String> {
    EXTRACTORS
        .iter()
        .filter_map(|extract| extract(body))
        .find(|text| !text.trim().is_empty())
        .map(str::to_string)
}

/// `finishReason` of the first candidate, if any.
pub fn finish_reason(body: &Value) -> Option<&str> {
    body.get("candidates")?.get(0)?.get("finishReason")?.as_str()
}
