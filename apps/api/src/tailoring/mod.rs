// Resume tailoring: the initial draft and conversational refinement prompts.
// All LLM calls go through the TextGenerator trait; nothing here holds state.

pub mod document;
pub mod drafter;
pub mod prompts;
pub mod refiner;

use serde::{Deserialize, Serialize};

use crate::listing::JobListing;
use crate::llm_client::GenerationOptions;

/// Moderate creativity: rephrasing is wanted, invention is not.
pub const TAILORING_OPTIONS: GenerationOptions = GenerationOptions {
    max_tokens: 4096,
    temperature: 0.7,
};

/// The three inputs a session is initialized with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TailoringInputs {
    pub resume: String,
    pub job_listing: JobListing,
    pub additional_info: Option<String>,
}

impl TailoringInputs {
    /// Supplementary notes, or `None` when absent or blank.
    pub fn notes(&self) -> Option<&str> {
        self.additional_info
            .as_deref()
            .filter(|notes| !notes.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_notes_are_absent() {
        let mut inputs = TailoringInputs {
            resume: "\\documentclass{article}".to_string(),
            job_listing: JobListing::Text("Backend Engineer".to_string()),
            additional_info: Some("   ".to_string()),
        };
        assert_eq!(inputs.notes(), None);

        inputs.additional_info = Some("Led a Kubernetes migration".to_string());
        assert_eq!(inputs.notes(), Some("Led a Kubernetes migration"));
    }
}
