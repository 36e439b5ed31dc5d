//! Durable conversation history, keyed by session id.
//!
//! The whole turn sequence is rewritten on every save. That is only sound
//! with one writer per session id, which the session router guarantees.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use thiserror::Error;
use tracing::debug;

use crate::models::history::SessionHistoryRow;
use crate::session::state::{PersistedSession, Turn};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("History store unavailable: {0}")]
    #[cfg_attr(not(test), allow(dead_code))]
    Unavailable(String),
}

#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Loads the durable tier; an unknown session yields empty history.
    async fn load(&self, session_id: &str) -> Result<PersistedSession, StoreError>;

    /// Replaces the stored history for `session_id` with `history`.
    async fn save(&self, session_id: &str, history: &[Turn]) -> Result<(), StoreError>;
}

/// PostgreSQL-backed history: one JSONB row per session.
#[derive(Clone)]
pub struct PgHistoryStore {
    pool: PgPool,
}

impl PgHistoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HistoryStore for PgHistoryStore {
    async fn load(&self, session_id: &str) -> Result<PersistedSession, StoreError> {
        let row = sqlx::query_as::<_, SessionHistoryRow>(
            "SELECT session_id, turns, updated_at FROM session_histories WHERE session_id = $1",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(match row {
            Some(row) => {
                debug!(
                    session_id = %row.session_id,
                    turns = row.turns.0.len(),
                    updated_at = %row.updated_at,
                    "Loaded session history"
                );
                PersistedSession {
                    history: row.turns.0,
                }
            }
            None => PersistedSession::default(),
        })
    }

    async fn save(&self, session_id: &str, history: &[Turn]) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO session_histories (session_id, turns, updated_at)
            VALUES ($1, $2, now())
            ON CONFLICT (session_id)
            DO UPDATE SET turns = EXCLUDED.turns, updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(session_id)
        .bind(Json(history))
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
