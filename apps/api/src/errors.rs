use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Fallback `parsed` value sent when listing parsing fails upstream.
pub const LISTING_PARSE_FALLBACK: &str = "Error parsing job listing";

/// Application-level error type for the stateless HTTP routes.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Listing parse failed: {0}")]
    ListingParse(String),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::ListingParse(msg) => {
                tracing::error!("Listing parse error: {msg}");
                // The parse endpoint keeps its own body shape so clients can
                // render `parsed` unconditionally.
                let body = Json(json!({
                    "error": msg,
                    "original": "",
                    "parsed": LISTING_PARSE_FALLBACK,
                }));
                return (StatusCode::INTERNAL_SERVER_ERROR, body).into_response();
            }
            AppError::Redis(e) => {
                tracing::error!("Redis error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "PREFERENCE_STORE_ERROR",
                    "A preference storage error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
