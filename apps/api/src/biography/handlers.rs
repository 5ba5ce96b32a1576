//! Axum route handlers for the Biography API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::biography::{delete_with_mirror, revert_and_mirror, save_and_mirror, versioning};
use crate::errors::AppError;
use crate::generation::biography::MergeMode;
use crate::generation::pipeline::CoverLetterPipeline;
use crate::models::biography::BiographyVersionRow;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SaveBiographyRequest {
    pub content: String,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MergeBiographyRequest {
    pub content: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Serialize)]
pub struct SaveBiographyResponse {
    pub version: i64,
}

#[derive(Debug, Serialize)]
pub struct MergeBiographyResponse {
    pub version: i64,
    pub mode: MergeMode,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteBiographyResponse {
    pub deleted_versions: u64,
}

fn no_biography() -> AppError {
    AppError::NotFound("No biography found".to_string())
}

/// GET /api/v1/biography
pub async fn handle_get_biography(
    State(state): State<AppState>,
) -> Result<Json<BiographyVersionRow>, AppError> {
    versioning::get_biography(&state.db, None)
        .await?
        .map(Json)
        .ok_or_else(no_biography)
}

/// POST /api/v1/biography
pub async fn handle_save_biography(
    State(state): State<AppState>,
    Json(req): Json<SaveBiographyRequest>,
) -> Result<(StatusCode, Json<SaveBiographyResponse>), AppError> {
    let version =
        save_and_mirror(&state.db, &state.mirror, &req.content, req.notes.as_deref()).await?;
    Ok((StatusCode::CREATED, Json(SaveBiographyResponse { version })))
}

/// POST /api/v1/biography/merge
///
/// Runs the biography-merge stage against the current version, then stores the result.
pub async fn handle_merge_biography(
    State(state): State<AppState>,
    Json(req): Json<MergeBiographyRequest>,
) -> Result<(StatusCode, Json<MergeBiographyResponse>), AppError> {
    if req.content.trim().is_empty() {
        return Err(AppError::Validation("Empty content is not allowed".to_string()));
    }

    let current = versioning::get_biography(&state.db, None).await?;
    let pipeline = CoverLetterPipeline::from_store(&state.db, state.llm.clone()).await?;
    let mode = MergeMode::from_notes(&req.notes);
    info!("Updating biography ({mode:?})");

    let merged = pipeline
        .merge_biography(
            &req.content,
            current.as_ref().map(|c| c.content.as_str()),
            &req.notes,
        )
        .await?;

    let notes = (!req.notes.trim().is_empty()).then_some(req.notes.as_str());
    let version = save_and_mirror(&state.db, &state.mirror, &merged, notes).await?;

    Ok((
        StatusCode::CREATED,
        Json(MergeBiographyResponse {
            version,
            mode,
            content: merged,
        }),
    ))
}

/// GET /api/v1/biography/versions
pub async fn handle_list_versions(
    State(state): State<AppState>,
) -> Result<Json<Vec<BiographyVersionRow>>, AppError> {
    Ok(Json(versioning::list_biography_versions(&state.db).await?))
}

/// GET /api/v1/biography/:version
pub async fn handle_get_version(
    State(state): State<AppState>,
    Path(version): Path<i64>,
) -> Result<Json<BiographyVersionRow>, AppError> {
    versioning::get_biography(&state.db, Some(version))
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Biography version {version} not found")))
}

/// POST /api/v1/biography/:version/revert
pub async fn handle_revert(
    State(state): State<AppState>,
    Path(version): Path<i64>,
) -> Result<(StatusCode, Json<SaveBiographyResponse>), AppError> {
    revert_and_mirror(&state.db, &state.mirror, version)
        .await?
        .map(|version| (StatusCode::CREATED, Json(SaveBiographyResponse { version })))
        .ok_or_else(|| AppError::NotFound(format!("Biography version {version} not found")))
}

/// DELETE /api/v1/biography
pub async fn handle_delete_biography(
    State(state): State<AppState>,
) -> Result<Json<DeleteBiographyResponse>, AppError> {
    let deleted_versions = delete_with_mirror(&state.db, &state.mirror).await?;
    Ok(Json(DeleteBiographyResponse { deleted_versions }))
}
