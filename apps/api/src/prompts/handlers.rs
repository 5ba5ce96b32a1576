use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::prompt::PromptRow;
use crate::prompts::{delete_with_mirror, reset_and_mirror, save_and_mirror, store};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SavePromptRequest {
    pub content: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ResetPromptsResponse {
    pub reset: Vec<&'static str>,
}

/// GET /api/v1/prompts
pub async fn handle_list_prompts(
    State(state): State<AppState>,
) -> Result<Json<Vec<PromptRow>>, AppError> {
    Ok(Json(store::list_prompts(&state.db).await?))
}

/// GET /api/v1/prompts/:name
pub async fn handle_get_prompt(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<PromptRow>, AppError> {
    store::get_prompt(&state.db, &name)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Prompt '{name}' not found")))
}

/// POST /api/v1/prompts/:name
pub async fn handle_save_prompt(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(req): Json<SavePromptRequest>,
) -> Result<(StatusCode, Json<PromptRow>), AppError> {
    save_and_mirror(
        &state.db,
        &state.mirror,
        &name,
        &req.content,
        req.description.as_deref(),
    )
    .await?;

    let saved = store::get_prompt(&state.db, &name)
        .await?
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Prompt '{name}' vanished after save")))?;
    Ok((StatusCode::CREATED, Json(saved)))
}

/// DELETE /api/v1/prompts/:name
pub async fn handle_delete_prompt(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<StatusCode, AppError> {
    if delete_with_mirror(&state.db, &state.mirror, &name).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Prompt '{name}' not found")))
    }
}

/// POST /api/v1/prompts/reset
pub async fn handle_reset_prompts(
    State(state): State<AppState>,
) -> Result<Json<ResetPromptsResponse>, AppError> {
    let reset = reset_and_mirror(&state.db, &state.mirror).await?;
    Ok(Json(ResetPromptsResponse { reset }))
}
