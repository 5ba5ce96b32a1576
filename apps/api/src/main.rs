mod biography;
mod config;
mod db;
mod documents;
mod editor;
mod errors;
mod generation;
mod llm_client;
mod mirror;
mod models;
mod prompts;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::editor::handlers::{new_session_store, spawn_session_sweeper, SESSION_IDLE_TIMEOUT};
use crate::llm_client::OpenAiClient;
use crate::mirror::FileMirror;
use crate::prompts::store::{missing_required_prompts, seed_default_prompts_if_empty};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Quill API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize SQLite
    let db = create_pool(&config.database_url).await?;
    if seed_default_prompts_if_empty(&db).await? {
        info!("Seeded default prompts");
    }
    for name in missing_required_prompts(&db).await? {
        warn!("Prompt '{name}' is missing; generation is unavailable until prompts are reset");
    }

    // Initialize file mirror
    let mirror = FileMirror::init(&config.documents_dir).await?;
    info!("Mirroring documents under {}", mirror.base_dir().display());

    // Initialize LLM client
    let llm = OpenAiClient::new(config.openai_api_key.clone(), config.openai_base_url.clone())?;
    info!("LLM client initialized ({})", config.openai_base_url);

    // Build app state
    let sessions = new_session_store();
    spawn_session_sweeper(sessions.clone(), SESSION_IDLE_TIMEOUT);
    let state = AppState {
        db,
        llm: Arc::new(llm),
        mirror,
        sessions,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
