use axum::{extract::State, http::HeaderMap, Json};
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::preferences::{load_preferences, save_preferences, DEFAULT_USER_ID, USER_ID_HEADER};
use crate::state::AppState;

fn user_id(headers: &HeaderMap) -> &str {
    headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .unwrap_or(DEFAULT_USER_ID)
}

/// GET /api/preferences
pub async fn handle_get_preferences(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    let preferences = load_preferences(&state.redis, user_id(&headers)).await?;
    Ok(Json(preferences))
}

/// POST /api/preferences
pub async fn handle_save_preferences(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(preferences): Json<Value>,
) -> Result<Json<Value>, AppError> {
    save_preferences(&state.redis, user_id(&headers), &preferences).await?;
    Ok(Json(json!({ "success": true })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_user_id_from_header() {
        let mut headers = HeaderMap::new();
        headers.insert("X-User-Id", HeaderValue::from_static("user-42"));
        assert_eq!(user_id(&headers), "user-42");
    }

    #[test]
    fn test_user_id_defaults_when_absent_or_blank() {
        assert_eq!(user_id(&HeaderMap::new()), DEFAULT_USER_ID);

        let mut headers = HeaderMap::new();
        headers.insert("X-User-Id", HeaderValue::from_static("  "));
        assert_eq!(user_id(&headers), DEFAULT_USER_ID);
    }
}
