//! Axum route handlers for interactive editing sessions.
//!
//! Sessions live in memory only. Each one sits behind its own mutex so a slow
//! model call blocks that session and nothing else. Sessions untouched for
//! `SESSION_IDLE_TIMEOUT` are dropped by a background sweep.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::info;
use uuid::Uuid;

use crate::documents::save_and_mirror;
use crate::documents::store::get_document;
use crate::editor::{CoverLetterEditor, EditorModel, EditorReply};
use crate::errors::AppError;
use crate::llm_client::Message;
use crate::models::document::{DocumentKind, DocumentMetadata};
use crate::state::AppState;

pub type EditorSessions = Arc<RwLock<HashMap<Uuid, Arc<Mutex<EditorSession>>>>>;

pub const SESSION_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

pub fn new_session_store() -> EditorSessions {
    Arc::new(RwLock::new(HashMap::new()))
}

pub struct EditorSession {
    pub editor: CoverLetterEditor,
    last_used: Instant,
}

impl EditorSession {
    fn new(editor: CoverLetterEditor) -> Self {
        Self {
            editor,
            last_used: Instant::now(),
        }
    }

    fn touch(&mut self) {
        self.last_used = Instant::now();
    }

    fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_used)
    }
}

async fn register_session(
    sessions: &EditorSessions,
    session_id: Uuid,
    editor: CoverLetterEditor,
) {
    sessions
        .write()
        .await
        .insert(session_id, Arc::new(Mutex::new(EditorSession::new(editor))));
}

/// Drops sessions idle for longer than `timeout` and returns how many went.
/// A session whose lock is held is mid-request and always survives.
pub async fn evict_idle_sessions(sessions: &EditorSessions, timeout: Duration) -> usize {
    let now = Instant::now();
    let mut map = sessions.write().await;
    let before = map.len();
    map.retain(|_, session| match session.try_lock() {
        Ok(session) => session.idle_for(now) <= timeout,
        Err(_) => true,
    });
    before - map.len()
}

/// Runs `evict_idle_sessions` once a minute for the life of the process.
pub fn spawn_session_sweeper(sessions: EditorSessions, timeout: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
        loop {
            ticker.tick().await;
            let evicted = evict_idle_sessions(&sessions, timeout).await;
            if evicted > 0 {
                info!("Evicted {evicted} idle editing sessions");
            }
        }
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Edit a stored cover letter by name, or paste one in directly.
#[derive(Debug, Deserialize)]
pub struct StartSessionRequest {
    pub cover_letter_name: Option<String>,
    pub letter: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct SaveDraftRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub active: bool,
    pub model: EditorModel,
    pub transcript: Vec<Message>,
    pub latest_draft: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SaveDraftResponse {
    pub name: String,
    pub path: String,
}

impl SessionView {
    fn of(session_id: Uuid, editor: &CoverLetterEditor) -> Self {
        Self {
            session_id,
            active: editor.is_active(),
            model: editor.model(),
            transcript: editor.transcript().to_vec(),
            latest_draft: editor.latest_draft().map(str::to_string),
        }
    }
}

/// Locks a session and marks it as used.
async fn lock_session(
    state: &AppState,
    id: Uuid,
) -> Result<OwnedMutexGuard<EditorSession>, AppError> {
    let session = state
        .sessions
        .read()
        .await
        .get(&id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Editing session {id} not found")))?;
    let mut session = session.lock_owned().await;
    session.touch();
    Ok(session)
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/editor/sessions
pub async fn handle_start_session(
    State(state): State<AppState>,
    Json(req): Json<StartSessionRequest>,
) -> Result<(StatusCode, Json<SessionView>), AppError> {
    let letter = match (req.cover_letter_name, req.letter) {
        (Some(name), None) => {
            get_document(&state.db, DocumentKind::CoverLetter, &name)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("cover letter '{name}' not found")))?
                .content
        }
        (None, Some(letter)) if !letter.trim().is_empty() => letter,
        _ => {
            return Err(AppError::Validation(
                "Provide exactly one of cover_letter_name or letter".to_string(),
            ))
        }
    };

    let mut editor = CoverLetterEditor::new(state.llm.clone());
    editor.start_session(letter);

    let session_id = Uuid::new_v4();
    let view = SessionView::of(session_id, &editor);
    register_session(&state.sessions, session_id, editor).await;

    info!("Started editing session {session_id}");
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /api/v1/editor/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = lock_session(&state, id).await?;
    Ok(Json(SessionView::of(id, &session.editor)))
}

/// POST /api/v1/editor/sessions/:id/messages
pub async fn handle_send_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SendMessageRequest>,
) -> Result<Json<EditorReply>, AppError> {
    let mut session = lock_session(&state, id).await?;
    let reply = session.editor.process_message(&req.message).await?;
    Ok(Json(reply))
}

/// POST /api/v1/editor/sessions/:id/save
///
/// Stores the latest assistant reply as a cover letter.
pub async fn handle_save_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SaveDraftRequest>,
) -> Result<(StatusCode, Json<SaveDraftResponse>), AppError> {
    let draft = {
        let session = lock_session(&state, id).await?;
        session
            .editor
            .latest_draft()
            .map(str::to_string)
            .ok_or_else(|| AppError::Validation("No edited draft to save yet".to_string()))?
    };

    let path = save_and_mirror(
        &state.db,
        &state.mirror,
        DocumentKind::CoverLetter,
        &req.name,
        &draft,
        &DocumentMetadata::default(),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(SaveDraftResponse {
            name: req.name,
            path: path.display().to_string(),
        }),
    ))
}

/// DELETE /api/v1/editor/sessions/:id
pub async fn handle_end_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let removed = state.sessions.write().await.remove(&id);
    match removed {
        Some(session) => {
            session.lock().await.editor.end_session();
            info!("Ended editing session {id}");
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(AppError::NotFound(format!("Editing session {id} not found"))),
    }
}
