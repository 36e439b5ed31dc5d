pub mod health;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::listing::handlers::handle_parse_job;
use crate::preferences::handlers::{handle_get_preferences, handle_save_preferences};
use crate::session::handlers::handle_chat_upgrade;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health_handler))
        // Chat sessions (WebSocket)
        .route("/api/chat", get(handle_chat_upgrade))
        // Stateless helpers
        .route("/api/parse-job", post(handle_parse_job))
        .route(
            "/api/preferences",
            get(handle_get_preferences).post(handle_save_preferences),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
