//! Axum route handlers for the Document API.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::documents::import::extract_text;
use crate::documents::{delete_with_mirror, save_and_mirror, store};
use crate::errors::AppError;
use crate::models::document::{DocumentKind, DocumentMetadata, DocumentRow, DocumentSummary};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SaveDocumentRequest {
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub metadata: DocumentMetadata,
}

#[derive(Debug, Serialize)]
pub struct SaveDocumentResponse {
    pub name: String,
    pub path: String,
}

/// GET /api/v1/documents/:kind
pub async fn handle_list_documents(
    State(state): State<AppState>,
    Path(kind): Path<DocumentKind>,
) -> Result<Json<Vec<DocumentSummary>>, AppError> {
    Ok(Json(store::list_documents(&state.db, kind).await?))
}

/// GET /api/v1/documents/:kind/:name
pub async fn handle_get_document(
    State(state): State<AppState>,
    Path((kind, name)): Path<(DocumentKind, String)>,
) -> Result<Json<DocumentRow>, AppError> {
    store::get_document(&state.db, kind, &name)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("{} '{name}' not found", kind.label())))
}

/// POST /api/v1/documents/:kind
pub async fn handle_save_document(
    State(state): State<AppState>,
    Path(kind): Path<DocumentKind>,
    Json(req): Json<SaveDocumentRequest>,
) -> Result<(StatusCode, Json<SaveDocumentResponse>), AppError> {
    if req.name.trim().is_empty() || req.content.trim().is_empty() {
        return Err(AppError::Validation(
            "Name and content are required".to_string(),
        ));
    }

    let path = save_and_mirror(
        &state.db,
        &state.mirror,
        kind,
        &req.name,
        &req.content,
        &req.metadata,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(SaveDocumentResponse {
            name: req.name,
            path: path.display().to_string(),
        }),
    ))
}

/// DELETE /api/v1/documents/:kind/:name
pub async fn handle_delete_document(
    State(state): State<AppState>,
    Path((kind, name)): Path<(DocumentKind, String)>,
) -> Result<StatusCode, AppError> {
    if delete_with_mirror(&state.db, &state.mirror, kind, &name).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!(
            "{} '{name}' not found",
            kind.label()
        )))
    }
}

/// POST /api/v1/documents/:kind/import
///
/// Multipart fields: `name`, `file`, and for job descriptions optional `company` / `position`.
pub async fn handle_import_document(
    State(state): State<AppState>,
    Path(kind): Path<DocumentKind>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<SaveDocumentResponse>), AppError> {
    let mut name: Option<String> = None;
    let mut upload: Option<(String, Vec<u8>)> = None;
    let mut metadata = DocumentMetadata::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?
    {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?;
                upload = Some((filename, bytes.to_vec()));
            }
            "name" | "company" | "position" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?;
                match field_name.as_str() {
                    "name" => name = Some(value),
                    "company" => metadata.company = Some(value),
                    _ => metadata.position = Some(value),
                }
            }
            _ => {}
        }
    }

    let name = name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| AppError::Validation("name is required".to_string()))?;
    let (filename, bytes) =
        upload.ok_or_else(|| AppError::Validation("file is required".to_string()))?;

    let content = tokio::task::spawn_blocking(move || extract_text(&filename, &bytes))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Import task failed: {e}")))?
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let path = save_and_mirror(&state.db, &state.mirror, kind, &name, &content, &metadata).await?;

    Ok((
        StatusCode::CREATED,
        Json(SaveDocumentResponse {
            name,
            path: path.display().to_string(),
        }),
    ))
}
