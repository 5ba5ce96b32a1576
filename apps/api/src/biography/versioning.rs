use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use crate::models::biography::BiographyVersionRow;

/// Appends a new biography version and returns its number.
/// CRITICAL: This is append-only. Never UPDATE existing rows.
///
/// The next number is computed inside the INSERT itself, so SQLite's write
/// lock covers both the read of MAX(version) and the append.
pub async fn save_biography(
    pool: &SqlitePool,
    content: &str,
    notes: Option<&str>,
) -> Result<i64, sqlx::Error> {
    let new_version: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO biography_versions (version, content, notes, created_at)
        SELECT COALESCE(MAX(version), 0) + 1, $1, $2, $3 FROM biography_versions
        RETURNING version
        "#,
    )
    .bind(content)
    .bind(notes)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    info!("Inserted biography version {new_version}");
    Ok(new_version)
}

/// Returns the given version, or the latest one when `version` is `None`.
pub async fn get_biography(
    pool: &SqlitePool,
    version: Option<i64>,
) -> Result<Option<BiographyVersionRow>, sqlx::Error> {
    match version {
        Some(v) => {
            sqlx::query_as::<_, BiographyVersionRow>(
                "SELECT * FROM biography_versions WHERE version = $1",
            )
            .bind(v)
            .fetch_optional(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, BiographyVersionRow>(
                "SELECT * FROM biography_versions ORDER BY version DESC LIMIT 1",
            )
            .fetch_optional(pool)
            .await
        }
    }
}

/// Returns all versions, newest first.
pub async fn list_biography_versions(
    pool: &SqlitePool,
) -> Result<Vec<BiographyVersionRow>, sqlx::Error> {
    sqlx::query_as::<_, BiographyVersionRow>(
        "SELECT * FROM biography_versions ORDER BY version DESC",
    )
    .fetch_all(pool)
    .await
}

/// Re-saves an old version's content as the newest version.
/// Returns `None` when `version` does not exist.
pub async fn revert_biography(pool: &SqlitePool, version: i64) -> Result<Option<i64>, sqlx::Error> {
    let Some(old) = get_biography(pool, Some(version)).await? else {
        return Ok(None);
    };
    let notes = format!("Reverted to version {version}");
    save_biography(pool, &old.content, Some(&notes)).await.map(Some)
}

/// Deletes every version. Returns the number of rows removed.
pub async fn delete_biography(pool: &SqlitePool) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM biography_versions")
        .execute(pool)
        .await?;
    info!("Deleted {} biography versions", result.rows_affected());
    Ok(result.rows_affected())
}
