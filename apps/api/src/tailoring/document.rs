//! Classification of assistant replies as complete resume documents.

/// Structural markers that open a LaTeX document.
pub const DOCUMENT_START_MARKERS: [&str; 2] = ["\\documentclass", "\\begin{document}"];

/// True when `text` carries a LaTeX document-start marker.
///
/// Known false positive: a conversational reply that quotes one of the
/// markers is classified as a document.
pub fn is_full_document(text: &str) -> bool {
    DOCUMENT_START_MARKERS
        .iter()
        .any(|marker| text.contains(marker))
}
