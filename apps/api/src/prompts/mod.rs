// Prompt Store: named system prompts used by the generation pipeline.
// Writes are mirrored to `prompts/`; a failed mirror write is only logged.

pub mod handlers;
pub mod store;

use sqlx::SqlitePool;
use tracing::warn;

use crate::errors::AppError;
use crate::llm_client::prompts::DEFAULT_PROMPTS;
use crate::mirror::{validate_name, FileMirror, PROMPTS_DIR};

/// Saves a prompt and mirrors it to disk.
pub async fn save_and_mirror(
    pool: &SqlitePool,
    mirror: &FileMirror,
    name: &str,
    content: &str,
    description: Option<&str>,
) -> Result<(), AppError> {
    validate_name(name).map_err(|e| AppError::Validation(e.to_string()))?;
    if content.trim().is_empty() {
        return Err(AppError::Validation("Empty content is not allowed".to_string()));
    }

    store::save_prompt(pool, name, content, description).await?;
    if let Err(e) = mirror.write(PROMPTS_DIR, name, content).await {
        warn!("Mirror write failed for prompt '{name}': {e}");
    }
    Ok(())
}

/// Restores every default prompt in the store and on disk.
pub async fn reset_and_mirror(
    pool: &SqlitePool,
    mirror: &FileMirror,
) -> Result<Vec<&'static str>, AppError> {
    let names = store::reset_default_prompts(pool).await?;
    for prompt in &DEFAULT_PROMPTS {
        if let Err(e) = mirror.write(PROMPTS_DIR, prompt.name, prompt.content).await {
            warn!("Mirror write failed for prompt '{}': {e}", prompt.name);
        }
    }
    Ok(names)
}

pub async fn delete_with_mirror(
    pool: &SqlitePool,
    mirror: &FileMirror,
    name: &str,
) -> Result<bool, AppError> {
    let deleted = store::delete_prompt(pool, name).await?;
    if deleted {
        if let Err(e) = mirror.delete(PROMPTS_DIR, name).await {
            warn!("Could not remove mirror file for prompt '{name}': {e}");
        }
    }
    Ok(deleted)
}
