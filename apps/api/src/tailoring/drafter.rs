//! Draft Generator: one tailored resume from (resume, listing, notes).

use tracing::warn;

use crate::llm_client::prompts::TRUTHFULNESS_INSTRUCTION;
use crate::llm_client::{ChatMessage, LlmError, TextGenerator};
use crate::tailoring::prompts::{DRAFT_NOTES_PLACEHOLDER, DRAFT_PROMPT_TEMPLATE, DRAFT_SYSTEM};
use crate::tailoring::{TailoringInputs, TAILORING_OPTIONS};

/// Returned in place of a draft when the generator produced no text.
/// A degraded result, not a failure.
pub const DRAFT_FAILED_SENTINEL: &str = "Error generating resume";

/// Produces the first tailored draft. Only a failed generation call is an error.
pub async fn draft_resume(
    llm: &dyn TextGenerator,
    inputs: &TailoringInputs,
) -> Result<String, LlmError> {
    let messages = build_draft_messages(inputs);

    match llm.generate(&messages, &TAILORING_OPTIONS).await? {
        Some(draft) => Ok(draft),
        None => {
            warn!("Draft generation returned no text; sending sentinel");
            Ok(DRAFT_FAILED_SENTINEL.to_string())
        }
    }
}

fn build_draft_messages(inputs: &TailoringInputs) -> Vec<ChatMessage> {
    let prompt = DRAFT_PROMPT_TEMPLATE
        .replace("{job_listing}", &inputs.job_listing.prompt_text())
        .replace("{resume}", &inputs.resume)
        .replace(
            "{additional_info}",
            inputs.notes().unwrap_or(DRAFT_NOTES_PLACEHOLDER),
        );

    vec![
        ChatMessage::system(format!("{DRAFT_SYSTEM}\n- {TRUTHFULNESS_INSTRUCTION}")),
        ChatMessage::user(prompt),
    ]
}
