//! Refinement Generator: answers a follow-up or returns a revised resume.
//!
//! Whether a reply is a new draft is decided by the caller via
//! `document::is_full_document`, not here.

use tracing::warn;

use crate::llm_client::prompts::TRUTHFULNESS_INSTRUCTION;
use crate::llm_client::{ChatMessage, LlmError, TextGenerator};
use crate::session::state::Turn;
use crate::tailoring::prompts::{
    NO_DRAFT_PLACEHOLDER, REFINE_CONTEXT_TEMPLATE, REFINE_NOTES_PLACEHOLDER,
    REFINE_SYSTEM_TEMPLATE,
};
use crate::tailoring::{TailoringInputs, TAILORING_OPTIONS};

/// Returned in place of a reply when the generator produced no text.
pub const REFINE_FAILED_SENTINEL: &str = "Error generating response";

/// Produces the assistant's reply to the newest turn in `history`.
pub async fn refine_resume(
    llm: &dyn TextGenerator,
    history: &[Turn],
    inputs: &TailoringInputs,
    current_draft: Option<&str>,
) -> Result<String, LlmError> {
    let messages = build_refine_messages(history, inputs, current_draft);

    match llm.generate(&messages, &TAILORING_OPTIONS).await? {
        Some(reply) => Ok(reply),
        None => {
            warn!("Refinement returned no text; sending sentinel");
            Ok(REFINE_FAILED_SENTINEL.to_string())
        }
    }
}

/// System instruction, one synthesized context turn, then the history verbatim.
fn build_refine_messages(
    history: &[Turn],
    inputs: &TailoringInputs,
    current_draft: Option<&str>,
) -> Vec<ChatMessage> {
    let listing_state = if inputs.job_listing.is_parsed() {
        "Parsed"
    } else {
        "Available"
    };
    let system = REFINE_SYSTEM_TEMPLATE.replace("{listing_state}", listing_state);

    let context = REFINE_CONTEXT_TEMPLATE
        .replace("{resume}", &inputs.resume)
        .replace("{job_listing}", &inputs.job_listing.prompt_text())
        .replace(
            "{additional_info}",
            inputs.notes().unwrap_or(REFINE_NOTES_PLACEHOLDER),
        )
        .replace("{current_draft}", current_draft.unwrap_or(NO_DRAFT_PLACEHOLDER));

    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatMessage::system(format!(
        "{system}\n\n{TRUTHFULNESS_INSTRUCTION}"
    )));
    messages.push(ChatMessage::user(context));
    messages.extend(history.iter().map(ChatMessage::from));
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::JobListing;
    use crate::llm_client::Role;
    use crate::testing::StubGenerator;

    fn inputs() -> TailoringInputs {
        TailoringInputs {
            resume: "\\documentclass{article} original".to_string(),
            job_listing: JobListing::Text("Backend Engineer, Go, Kubernetes".to_string()),
            additional_info: None,
        }
    }

    fn history() -> Vec<Turn> {
        vec![
            Turn::assistant("\\documentclass{article} draft one"),
            Turn::user("Add a line about Kubernetes experience"),
        ]
    }

    #[test]
    fn test_refine_messages_layout() {
        let messages =
            build_refine_messages(&history(), &inputs(), Some("\\documentclass{article} draft one"));

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, Role::System);
        assert!(messages[0].content.contains("COMPLETE optimized LaTeX resume"));
        assert!(messages[0].content.contains("Job Listing: Available"));

        assert_eq!(messages[1].role, Role::User);
        assert!(messages[1].content.starts_with("Context for this conversation:"));
        assert!(messages[1].content.contains("original"));
        assert!(messages[1].content.contains("Backend Engineer, Go, Kubernetes"));
        assert!(messages[1]
            .content
            .contains(&format!("Additional Info:\n{REFINE_NOTES_PLACEHOLDER}")));
        assert!(messages[1].content.contains("draft one"));

        assert_eq!(messages[2].role, Role::Assistant);
        assert_eq!(messages[3].role, Role::User);
        assert_eq!(messages[3].content, "Add a line about Kubernetes experience");
    }

    #[test]
    fn test_parsed_listing_is_reported_in_system_prompt() {
        let mut inputs = inputs();
        inputs.job_listing = JobListing::Structured(Default::default());
        let messages = build_refine_messages(&history(), &inputs, None);
        assert!(messages[0].content.contains("Job Listing: Parsed"));
        assert!(messages[1].content.contains(NO_DRAFT_PLACEHOLDER));
    }

    #[tokio::test]
    async fn test_refine_sends_full_history() {
        let llm = StubGenerator::replying(&["Sure, done."]);
        let reply = refine_resume(&llm, &history(), &inputs(), None).await.unwrap();

        assert_eq!(reply, "Sure, done.");
        assert_eq!(llm.calls(), 1);
        assert_eq!(llm.last_messages().len(), 2 + history().len());
    }

    #[tokio::test]
    async fn test_refine_without_text_returns_sentinel() {
        let llm = StubGenerator::silent();
        let reply = refine_resume(&llm, &history(), &inputs(), None).await.unwrap();
        assert_eq!(reply, REFINE_FAILED_SENTINEL);
    }
}
