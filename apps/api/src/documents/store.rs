use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use crate::models::document::{DocumentKind, DocumentMetadata, DocumentRow, DocumentSummary};

/// Inserts or replaces the document `(kind, name)`. `created_at` survives updates.
pub async fn save_document(
    pool: &SqlitePool,
    kind: DocumentKind,
    name: &str,
    content: &str,
    metadata: &DocumentMetadata,
) -> Result<(), sqlx::Error> {
    let (company, position) = match kind {
        DocumentKind::JobDescription => (
            metadata.company.as_deref().unwrap_or_default(),
            metadata.position.as_deref().unwrap_or_default(),
        ),
        _ => ("", ""),
    };
    let is_job = kind == DocumentKind::JobDescription;
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO documents (kind, name, content, company, position, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $6)
        ON CONFLICT (kind, name) DO UPDATE SET
            content = excluded.content,
            company = excluded.company,
            position = excluded.position,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(kind.as_str())
    .bind(name)
    .bind(content)
    .bind(is_job.then_some(company))
    .bind(is_job.then_some(position))
    .bind(now)
    .execute(pool)
    .await?;

    info!("Saved {} '{name}'", kind.label());
    Ok(())
}

pub async fn get_document(
    pool: &SqlitePool,
    kind: DocumentKind,
    name: &str,
) -> Result<Option<DocumentRow>, sqlx::Error> {
    sqlx::query_as::<_, DocumentRow>("SELECT * FROM documents WHERE kind = $1 AND name = $2")
        .bind(kind.as_str())
        .bind(name)
        .fetch_optional(pool)
        .await
}

pub async fn list_documents(
    pool: &SqlitePool,
    kind: DocumentKind,
) -> Result<Vec<DocumentSummary>, sqlx::Error> {
    sqlx::query_as::<_, DocumentSummary>(
        "SELECT name, company, position, created_at FROM documents WHERE kind = $1 ORDER BY name",
    )
    .bind(kind.as_str())
    .fetch_all(pool)
    .await
}

/// Returns true when a row was removed.
pub async fn delete_document(
    pool: &SqlitePool,
    kind: DocumentKind,
    name: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM documents WHERE kind = $1 AND name = $2")
        .bind(kind.as_str())
        .bind(name)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
