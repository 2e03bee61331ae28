//! Structured (JSON) generation shared by feedback, analysis and diary.

use serde::de::DeserializeOwned;

use crate::config::ModelConfig;
use crate::cost::{log_cost, CostEstimate};
use crate::llm::{parse_json, LlmError, TextGenerator};

use super::outcome::PipelineError;

/// Generate with `model`, normalize the output and parse it as `T`.
///
/// A response with no text is parsed as `{}`, so types with serde defaults
/// come back as their defaults.  The cost estimate is logged once the output
/// has parsed.
pub async fn generate_structured<T, G>(
    generator: &G,
    prompt: &str,
    model: &ModelConfig,
    label: &str,
) -> Result<T, PipelineError>
where
    T: DeserializeOwned,
    G: TextGenerator + ?Sized,
{
    let text = match generator.generate(prompt, model).await {
        Ok(text) => text,
        Err(LlmError::EmptyResponse) => {
            log::warn!("[{label}] empty model output");
            String::new()
        }
        Err(e) => return Err(e.into()),
    };

    let value = parse_json(&text)?;
    log_cost(label, &CostEstimate::for_texts(prompt, &text, false));
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeminiConfig;
    use crate::pipeline::testing::ScriptedGenerator;
    use serde_json::Value;

    #[tokio::test]
    async fn fenced_output_parses() {
        let generator = ScriptedGenerator::replying("```json\n{\"entry\":\"x\"}\n```");
        let value: Value =
            generate_structured(&generator, "p", &GeminiConfig::default().feedback, "t")
                .await
                .unwrap();
        assert_eq!(value["entry"], "x");
    }

    #[tokio::test]
    async fn empty_output_is_empty_object() {
        let generator = ScriptedGenerator::new(vec![Err(LlmError::EmptyResponse)]);
        let value: Value =
            generate_structured(&generator, "p", &GeminiConfig::default().feedback, "t")
                .await
                .unwrap();
        assert_eq!(value, serde_json::json!({}));
    }

    #[tokio::test]
    async fn prose_output_is_a_parse_error() {
        let generator = ScriptedGenerator::replying("I can't do JSON today.");
        let err = generate_structured::<Value, _>(
            &generator,
            "p",
            &GeminiConfig::default().feedback,
            "t",
        )
        .await
        .unwrap_err();
        assert!(matches!(err, PipelineError::Normalize(_)));
    }
}
