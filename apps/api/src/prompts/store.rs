use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use crate::llm_client::prompts::{DEFAULT_PROMPTS, REQUIRED_PROMPTS};
use crate::models::prompt::PromptRow;

pub async fn get_prompt(pool: &SqlitePool, name: &str) -> Result<Option<PromptRow>, sqlx::Error> {
    sqlx::query_as::<_, PromptRow>("SELECT * FROM prompts WHERE name = $1")
        .bind(name)
        .fetch_optional(pool)
        .await
}

pub async fn list_prompts(pool: &SqlitePool) -> Result<Vec<PromptRow>, sqlx::Error> {
    sqlx::query_as::<_, PromptRow>("SELECT * FROM prompts ORDER BY name")
        .fetch_all(pool)
        .await
}

/// Inserts or replaces a prompt. `created_at` survives updates.
pub async fn save_prompt(
    pool: &SqlitePool,
    name: &str,
    content: &str,
    description: Option<&str>,
) -> Result<(), sqlx::Error> {
    let now = Utc::now();
    sqlx::query(
        r#"
        INSERT INTO prompts (name, content, description, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $4)
        ON CONFLICT (name) DO UPDATE SET
            content = excluded.content,
            description = excluded.description,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(name)
    .bind(content)
    .bind(description)
    .bind(now)
    .execute(pool)
    .await?;

    info!("Saved prompt '{name}'");
    Ok(())
}

/// Returns true when a row was removed.
pub async fn delete_prompt(pool: &SqlitePool, name: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM prompts WHERE name = $1")
        .bind(name)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Writes every factory default, overwriting edits. Returns the names written.
pub async fn reset_default_prompts(pool: &SqlitePool) -> Result<Vec<&'static str>, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let now = Utc::now();
    for prompt in &DEFAULT_PROMPTS {
        sqlx::query(
            r#"
            INSERT INTO prompts (name, content, description, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            ON CONFLICT (name) DO UPDATE SET
                content = excluded.content,
                description = excluded.description,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(prompt.name)
        .bind(prompt.content)
        .bind(prompt.description)
        .bind(now)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    info!("Reset {} default prompts", DEFAULT_PROMPTS.len());
    Ok(DEFAULT_PROMPTS.iter().map(|p| p.name).collect())
}

/// Seeds the defaults on first start. Returns true when seeding happened.
pub async fn seed_default_prompts_if_empty(pool: &SqlitePool) -> Result<bool, sqlx::Error> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM prompts")
        .fetch_one(pool)
        .await?;
    if count > 0 {
        return Ok(false);
    }
    reset_default_prompts(pool).await?;
    Ok(true)
}

/// Names of required prompts absent from the store.
pub async fn missing_required_prompts(pool: &SqlitePool) -> Result<Vec<&'static str>, sqlx::Error> {
    let mut missing = Vec::new();
    for name in REQUIRED_PROMPTS {
        if get_prompt(pool, name).await?.is_none() {
            missing.push(name);
        }
    }
    Ok(missing)
}
