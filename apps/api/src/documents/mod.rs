// Document Management: resumes, cover letters and job descriptions.
// Store writes are mirrored to disk; a failed mirror write undoes the store write.

pub mod handlers;
pub mod import;
pub mod store;

use std::path::PathBuf;

use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::mirror::{validate_name, FileMirror};
use crate::models::document::{DocumentKind, DocumentMetadata};

/// Saves a document and mirrors it to disk.
///
/// If the mirror write fails the store is compensated on a best-effort basis:
/// a previously existing document gets its old content back, a new one is deleted.
pub async fn save_and_mirror(
    pool: &SqlitePool,
    mirror: &FileMirror,
    kind: DocumentKind,
    name: &str,
    content: &str,
    metadata: &DocumentMetadata,
) -> Result<PathBuf, AppError> {
    validate_name(name).map_err(|e| AppError::Validation(e.to_string()))?;
    if content.trim().is_empty() {
        return Err(AppError::Validation("Empty content is not allowed".to_string()));
    }

    let previous = store::get_document(pool, kind, name).await?;
    store::save_document(pool, kind, name, content, metadata).await?;

    match mirror.write_document(kind, name, content).await {
        Ok(path) => {
            info!("Mirrored {} '{name}' to {}", kind.label(), path.display());
            Ok(path)
        }
        Err(mirror_err) => {
            warn!(
                "Mirror write failed for {} '{name}': {mirror_err}; rolling back store write",
                kind.label()
            );
            let rollback = match previous {
                Some(prev) => {
                    let prev_meta = DocumentMetadata {
                        company: prev.company,
                        position: prev.position,
                    };
                    store::save_document(pool, kind, name, &prev.content, &prev_meta).await
                }
                None => store::delete_document(pool, kind, name).await.map(|_| ()),
            };
            if let Err(e) = rollback {
                warn!("Rollback of {} '{name}' failed: {e}", kind.label());
            }
            Err(AppError::Storage(mirror_err.to_string()))
        }
    }
}

/// Deletes a document and its mirror file. Returns false when no row existed.
pub async fn delete_with_mirror(
    pool: &SqlitePool,
    mirror: &FileMirror,
    kind: DocumentKind,
    name: &str,
) -> Result<bool, AppError> {
    let deleted = store::delete_document(pool, kind, name).await?;
    if deleted {
        if let Err(e) = mirror.delete(kind.mirror_dir(), name).await {
            warn!("Could not remove mirror file for {} '{name}': {e}", kind.label());
        }
    }
    Ok(deleted)
}
