use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;

use crate::session::state::Turn;

#[derive(Debug, Clone, FromRow)]
pub struct SessionHistoryRow {
    pub session_id: String,
    pub turns: Json<Vec<Turn>>,
    pub updated_at: DateTime<Utc>,
}
