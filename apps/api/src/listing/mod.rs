// Job listing ingestion: markup extraction, LLM-backed structuring, and the
// listing shapes a session accepts on `init`.

pub mod extract;
pub mod handlers;
pub mod parser;
pub mod prompts;

use serde::{Deserialize, Deserializer, Serialize};

/// Structured fields pulled out of a job listing. Every field is optional or
/// empty by default so partially-filled model output still decodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuredListing {
    pub title: Option<String>,
    pub company: Option<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub requirements: Vec<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub skills: Vec<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub qualifications: Vec<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub responsibilities: Vec<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub keywords: Vec<String>,
}

/// Models write `null` for sections they found nothing for.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl StructuredListing {
    /// Plain-text rendering used inside prompts. Empty sections are omitted.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if let Some(title) = self.title.as_deref().filter(|t| !t.trim().is_empty()) {
            out.push_str(&format!("Title: {title}\n"));
        }
        if let Some(company) = self.company.as_deref().filter(|c| !c.trim().is_empty()) {
            out.push_str(&format!("Company: {company}\n"));
        }
        for (heading, items) in [
            ("Requirements", &self.requirements),
            ("Skills", &self.skills),
            ("Qualifications", &self.qualifications),
            ("Responsibilities", &self.responsibilities),
            ("Keywords", &self.keywords),
        ] {
            if items.is_empty() {
                continue;
            }
            out.push_str(heading);
            out.push_str(":\n");
            for item in items {
                out.push_str(&format!("- {item}\n"));
            }
        }
        out.trim_end().to_string()
    }
}

/// Result of structuring a listing: the model's output when it matched the
/// expected shape, otherwise its raw text. Callers branch on the variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParsedListing {
    Structured(StructuredListing),
    Text(String),
}

/// Wire shape returned by `POST /api/parse-job`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseOutcome {
    pub original: String,
    pub parsed: ParsedListing,
}

/// The listing a client supplies on `init`: raw text, a full parse result, or
/// a bare structured listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JobListing {
    Text(String),
    Parsed(ParseOutcome),
    Structured(StructuredListing),
}

impl JobListing {
    /// Prompt text for this listing, preferring the structured rendering.
    pub fn prompt_text(&self) -> String {
        match self {
            JobListing::Text(text) => text.clone(),
            JobListing::Structured(listing) => listing.render(),
            JobListing::Parsed(outcome) => match &outcome.parsed {
                ParsedListing::Structured(listing) => {
                    let rendered = listing.render();
                    if rendered.is_empty() {
                        outcome.original.clone()
                    } else {
                        rendered
                    }
                }
                ParsedListing::Text(text) if !text.trim().is_empty() => text.clone(),
                ParsedListing::Text(_) => outcome.original.clone(),
            },
        }
    }

    pub fn is_parsed(&self) -> bool {
        !matches!(self, JobListing::Text(_))
    }

    /// An object that matched none of the known shapes decodes as a
    /// structured listing with every field empty.
    pub fn is_unrecognized(&self) -> bool {
        matches!(self, JobListing::Structured(listing) if *listing == StructuredListing::default())
    }
}
