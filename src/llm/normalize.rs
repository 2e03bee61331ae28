//! Cleanup of model output before it is parsed as JSON.
//!
//! Models asked for JSON still occasionally wrap it in Markdown fences:
//!
//! ````text
//! ```json
//! {"summary": "…"}
//! ```
//! ````
//!
//! [`strip_code_fences`] removes those markers, [`normalize`] additionally
//! trims, and [`parse_json`] turns the result into a typed value.

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors raised while turning model output into structured data.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// The cleaned text is not valid JSON for the requested type.
    #[error("model output is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Remove every ```` ```json ```` and ```` ``` ```` marker, each together with
/// one directly following newline.  Text without fences is returned as-is.
pub fn strip_code_fences(text: &str) -> String {
    if !text.contains("```") {
        return text.to_string();
    }
    text.replace("```json\n", "")
        .replace("```json", "")
        .replace("```\n", "")
        .replace("```", "")
}

/// [`strip_code_fences`] followed by a trim.
pub fn normalize(text: &str) -> String {
    strip_code_fences(text).trim().to_string()
}

/// Normalize `raw` and parse it as `T`.  Empty output parses as `{}`, so
/// types with `#[serde(default)]` come back as their defaults.
pub fn parse_json<T: DeserializeOwned>(raw: &str) -> Result<T, NormalizeError> {
    let cleaned = normalize(raw);
    let source = if cleaned.is_empty() { "{}" } else { cleaned.as_str() };
    Ok(serde_json::from_str(source)?)
}
