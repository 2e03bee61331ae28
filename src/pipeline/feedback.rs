//! Translation feedback for the full-practice flow.

use crate::config::ModelConfig;
use crate::conversation::{ConversationMessage, TranslationFeedback, TranslationPair};
use crate::llm::prompt::build_feedback_prompt;
use crate::llm::TextGenerator;

use super::outcome::{settle, Endpoint, Outcome, PipelineError};
use super::structured::generate_structured;

/// Feedback on the first two turns of `history` (Vietnamese, then English).
///
/// When neither turn has text the static "speak first" payload is returned
/// without calling the model.
pub async fn run_feedback<G: TextGenerator + ?Sized>(
    generator: &G,
    model: &ModelConfig,
    history: &[ConversationMessage],
) -> Result<Outcome<TranslationFeedback>, PipelineError> {
    log::info!("[Feedback] analyzing {} messages", history.len());

    let pair = TranslationPair::from_history(history);
    let Some((template, prompt)) = build_feedback_prompt(&pair) else {
        log::warn!("[Feedback] no content provided");
        return Ok(Outcome::success(TranslationFeedback::no_content()));
    };
    log::info!("[Feedback] analysis type: {}", template.name);

    let result = generate_structured::<TranslationFeedback, _>(
        generator,
        &prompt,
        model,
        Endpoint::Feedback.name(),
    )
    .await
    .map(|feedback| feedback.completed(template.name));

    settle(Endpoint::Feedback, result, || {
        Some(TranslationFeedback::fallback())
    })
}
