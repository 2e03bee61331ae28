//! Sentence-level analysis of a finished conversation.

use crate::config::ModelConfig;
use crate::conversation::{ConversationAnalysis, ConversationMessage};
use crate::llm::prompt::build_analysis_prompt;
use crate::llm::TextGenerator;

use super::outcome::{settle, Endpoint, Outcome, PipelineError};
use super::structured::generate_structured;

pub async fn run_analysis<G: TextGenerator + ?Sized>(
    generator: &G,
    model: &ModelConfig,
    history: &[ConversationMessage],
) -> Result<Outcome<ConversationAnalysis>, PipelineError> {
    log::info!("[Conversation Analysis] analyzing {} messages", history.len());

    let prompt = build_analysis_prompt(history);
    let result = generate_structured::<ConversationAnalysis, _>(
        generator,
        &prompt,
        model,
        Endpoint::ConversationAnalysis.name(),
    )
    .await
    .map(ConversationAnalysis::completed);

    settle(Endpoint::ConversationAnalysis, result, || {
        Some(ConversationAnalysis::fallback())
    })
}
