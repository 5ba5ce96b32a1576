use std::sync::Arc;

use sqlx::SqlitePool;

use crate::editor::handlers::EditorSessions;
use crate::llm_client::LanguageModel;
use crate::mirror::FileMirror;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub llm: Arc<dyn LanguageModel>,
    pub mirror: FileMirror,
    /// Live editing sessions, keyed by session id. In-memory only; idle ones are swept.
    pub sessions: EditorSessions,
}
