//! Markup-to-text extraction for job listings pasted or uploaded as HTML.

use once_cell::sync::Lazy;
use regex::Regex;

static SCRIPT_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").expect("valid regex"));
static STYLE_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").expect("valid regex"));
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));
static STRAY_DELIMITER: Lazy<Regex> = Lazy::new(|| Regex::new(r"[<>]").expect("valid regex"));
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Converts markup into a single line of plain text.
///
/// Script and style blocks are dropped with their content, remaining tags
/// become spaces, any unpaired `<` or `>` is removed, and whitespace runs
/// collapse to one space. Total and idempotent.
pub fn extract_text(markup: &str) -> String {
    let text = SCRIPT_BLOCK.replace_all(markup, "");
    let text = STYLE_BLOCK.replace_all(&text, "");
    let text = TAG.replace_all(&text, " ");
    let text = STRAY_DELIMITER.replace_all(&text, " ");
    WHITESPACE_RUN.replace_all(&text, " ").trim().to_string()
}
