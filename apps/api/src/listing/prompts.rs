// All LLM prompt constants for listing parsing.

/// System prompt for listing parsing. The field list mirrors `StructuredListing`.
pub const LISTING_PARSE_SYSTEM: &str = "You are a job listing parser. \
Extract key information from job postings.

Extract and return a JSON object with:
- title: Job title
- company: Company name (if available)
- requirements: Array of key requirements
- skills: Array of required/preferred skills
- qualifications: Array of qualifications
- responsibilities: Array of main responsibilities
- keywords: Array of important keywords for ATS optimization";

/// Listing parse prompt template. Replace `{listing_text}` before sending.
pub const LISTING_PARSE_PROMPT_TEMPLATE: &str = "Parse this job listing:\n\n{listing_text}";
