// Biography: an append-only, versioned free-text profile of the user.
// Each version is mirrored to `biography/version_{n}.txt`; mirror failures are only logged.

pub mod handlers;
pub mod versioning;

use sqlx::SqlitePool;
use tracing::warn;

use crate::errors::AppError;
use crate::mirror::{FileMirror, BIOGRAPHY_DIR};

fn version_file_name(version: i64) -> String {
    format!("version_{version}")
}

/// Appends a new version and mirrors it. Returns the new version number.
pub async fn save_and_mirror(
    pool: &SqlitePool,
    mirror: &FileMirror,
    content: &str,
    notes: Option<&str>,
) -> Result<i64, AppError> {
    if content.trim().is_empty() {
        return Err(AppError::Validation("Empty content is not allowed".to_string()));
    }

    let version = versioning::save_biography(pool, content, notes).await?;
    mirror_version(mirror, version, content).await;
    Ok(version)
}

/// Reverts to `version` and mirrors the copy. `None` when the version is unknown.
pub async fn revert_and_mirror(
    pool: &SqlitePool,
    mirror: &FileMirror,
    version: i64,
) -> Result<Option<i64>, AppError> {
    let Some(new_version) = versioning::revert_biography(pool, version).await? else {
        return Ok(None);
    };
    if let Some(row) = versioning::get_biography(pool, Some(new_version)).await? {
        mirror_version(mirror, new_version, &row.content).await;
    }
    Ok(Some(new_version))
}

/// Removes every version along with its mirror file.
pub async fn delete_with_mirror(pool: &SqlitePool, mirror: &FileMirror) -> Result<u64, AppError> {
    let versions = versioning::list_biography_versions(pool).await?;
    let deleted = versioning::delete_biography(pool).await?;
    for row in versions {
        if let Err(e) = mirror
            .delete(BIOGRAPHY_DIR, &version_file_name(row.version))
            .await
        {
            warn!("Could not remove biography version {} file: {e}", row.version);
        }
    }
    Ok(deleted)
}

async fn mirror_version(mirror: &FileMirror, version: i64, content: &str) {
    if let Err(e) = mirror
        .write(BIOGRAPHY_DIR, &version_file_name(version), content)
        .await
    {
        warn!("Mirror write failed for biography version {version}: {e}");
    }
}
