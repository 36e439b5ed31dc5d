//! Listing Parser: turns a raw job listing into `StructuredListing` fields.
//!
//! Decode failures never surface: a response that is not the expected JSON
//! shape comes back verbatim as `ParsedListing::Text`. Only a failed
//! generation call is an error.

use tracing::{debug, warn};

use crate::listing::extract::extract_text;
use crate::listing::prompts::{LISTING_PARSE_PROMPT_TEMPLATE, LISTING_PARSE_SYSTEM};
use crate::listing::{ParseOutcome, ParsedListing, StructuredListing};
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::{strip_json_fences, ChatMessage, GenerationOptions, LlmError, TextGenerator};

/// Low temperature: extraction should be repeatable.
pub const PARSE_OPTIONS: GenerationOptions = GenerationOptions {
    max_tokens: 2048,
    temperature: 0.3,
};

/// Parses a job listing, extracting plain text first when it is markup.
pub async fn parse_listing(
    raw: &str,
    is_markup: bool,
    llm: &dyn TextGenerator,
) -> Result<ParseOutcome, LlmError> {
    let original = if is_markup {
        extract_text(raw)
    } else {
        raw.to_string()
    };

    let messages = vec![
        ChatMessage::system(format!("{LISTING_PARSE_SYSTEM}\n\n{JSON_ONLY_INSTRUCTION}")),
        ChatMessage::user(LISTING_PARSE_PROMPT_TEMPLATE.replace("{listing_text}", &original)),
    ];

    let parsed = match llm.generate(&messages, &PARSE_OPTIONS).await? {
        Some(response) => decode_listing(&response),
        None => {
            debug!("Listing parser received no text; using empty listing");
            ParsedListing::Structured(StructuredListing::default())
        }
    };

    Ok(ParseOutcome { original, parsed })
}

/// Decodes model output into structured fields, or keeps the raw text.
pub fn decode_listing(response: &str) -> ParsedListing {
    match serde_json::from_str::<StructuredListing>(strip_json_fences(response)) {
        Ok(listing) => ParsedListing::Structured(listing),
        Err(e) => {
            warn!("Listing parser output was not structured JSON ({e}); keeping raw text");
            ParsedListing::Text(response.to_string())
        }
    }
}
