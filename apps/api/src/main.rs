mod config;
mod db;
mod errors;
mod listing;
mod llm_client;
mod models;
mod preferences;
mod routes;
mod session;
mod state;
mod tailoring;
#[cfg(test)]
mod testing;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, ensure_schema};
use crate::llm_client::{LlmClient, TextGenerator};
use crate::routes::build_router;
use crate::session::router::SessionRouter;
use crate::session::store::{HistoryStore, PgHistoryStore};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Tailor API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (durable session history)
    let db = create_pool(&config.database_url).await?;
    ensure_schema(&db).await?;
    let history: Arc<dyn HistoryStore> = Arc::new(PgHistoryStore::new(db));

    // Initialize Redis (preferences)
    let redis = redis::Client::open(config.redis_url.clone())?;
    info!("Redis client initialized");

    // Initialize LLM client
    let llm: Arc<dyn TextGenerator> = Arc::new(LlmClient::new(config.anthropic_api_key.clone())?);
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let sessions = SessionRouter::new(llm.clone(), history, config.generation_timeout);
    info!(
        "Session router ready (generation timeout: {}s)",
        config.generation_timeout.as_secs()
    );

    let state = AppState {
        redis,
        llm,
        sessions,
    };

    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
