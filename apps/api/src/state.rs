use std::sync::Arc;

use redis::Client as RedisClient;

use crate::llm_client::TextGenerator;
use crate::session::router::SessionRouter;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Preference store.
    pub redis: RedisClient,
    /// Text-generation capability shared by the parser and every session actor.
    pub llm: Arc<dyn TextGenerator>,
    /// Session id → session actor addressing.
    pub sessions: SessionRouter,
}
