//! Axum route handlers for the Listing API.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::listing::parser::parse_listing;
use crate::listing::ParseOutcome;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ParseJobRequest {
    pub content: String,
    #[serde(rename = "isHtml", default)]
    pub is_html: bool,
}

/// POST /api/parse-job
///
/// Structures a raw or HTML job listing. Unstructured model output still
/// returns 200 with `parsed` as text; only a failed generation call errors.
pub async fn handle_parse_job(
    State(state): State<AppState>,
    Json(request): Json<ParseJobRequest>,
) -> Result<Json<ParseOutcome>, AppError> {
    let outcome = parse_listing(&request.content, request.is_html, state.llm.as_ref())
        .await
        .map_err(|e| AppError::ListingParse(e.to_string()))?;

    Ok(Json(outcome))
}
