// Shared prompt constants and prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_INSTRUCTION: &str = "Return ONLY valid JSON, no other text. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Fragment shared by every prompt that rewrites the user's resume.
pub const TRUTHFULNESS_INSTRUCTION: &str = "Keep content truthful and accurate. \
    Never invent employers, titles, dates, degrees, or metrics that are not \
    present in the resume or the additional information.";
