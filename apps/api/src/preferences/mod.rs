//! User preferences: an opaque JSON blob per user id, kept in Redis.

pub mod handlers;

use anyhow::Context;
use redis::AsyncCommands;
use serde_json::Value;

use crate::errors::AppError;

/// Header carrying the caller's opaque user id.
pub const USER_ID_HEADER: &str = "x-user-id";
pub const DEFAULT_USER_ID: &str = "default";

fn preference_key(user_id: &str) -> String {
    format!("preferences:{user_id}")
}

/// Returns the stored blob, or an empty object when nothing is stored.
pub async fn load_preferences(redis: &redis::Client, user_id: &str) -> Result<Value, AppError> {
    let mut conn = redis.get_multiplexed_async_connection().await?;
    let stored: Option<String> = conn.get(preference_key(user_id)).await?;

    match stored {
        Some(raw) => Ok(serde_json::from_str(&raw)
            .with_context(|| format!("Stored preferences for '{user_id}' are not valid JSON"))?),
        None => Ok(Value::Object(Default::default())),
    }
}

/// Replaces the stored blob for `user_id`.
pub async fn save_preferences(
    redis: &redis::Client,
    user_id: &str,
    preferences: &Value,
) -> Result<(), AppError> {
    let mut conn = redis.get_multiplexed_async_connection().await?;
    conn.set::<_, _, ()>(preference_key(user_id), preferences.to_string())
        .await?;
    Ok(())
}
