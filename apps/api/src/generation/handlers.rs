//! Axum route handlers for the Generation API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::info;

use crate::biography::versioning::get_biography;
use crate::documents::save_and_mirror;
use crate::documents::store::get_document;
use crate::errors::AppError;
use crate::generation::pipeline::{
    preferences_with_biography, CoverLetterPipeline, GeneratedLetter, GenerationInput,
};
use crate::models::document::{DocumentKind, DocumentMetadata};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub resume_name: String,
    pub job_description_name: String,
    pub sample_letter_name: String,
    #[serde(default)]
    pub preferences: String,
    /// When set, the generated letter is stored as a cover letter under this name.
    pub save_as: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    #[serde(flatten)]
    pub letter: GeneratedLetter,
    pub saved_as: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/generate
///
/// Loads the named documents, runs all four stages and returns every stage output.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    let input = load_generation_input(&state.db, &req).await?;
    let pipeline = CoverLetterPipeline::from_store(&state.db, state.llm.clone()).await?;

    info!(
        "Generating cover letter for '{}' against '{}'",
        req.resume_name, req.job_description_name
    );
    let letter = pipeline.run(&input).await?;

    let saved_as = match req.save_as {
        Some(name) => {
            save_and_mirror(
                &state.db,
                &state.mirror,
                DocumentKind::CoverLetter,
                &name,
                &letter.cover_letter,
                &DocumentMetadata::default(),
            )
            .await?;
            Some(name)
        }
        None => None,
    };

    Ok(Json(GenerateResponse { letter, saved_as }))
}

/// Resolves the request's document names. The sample letter doubles as the
/// only prior letter shown to the profile stage.
async fn load_generation_input(
    pool: &SqlitePool,
    req: &GenerateRequest,
) -> Result<GenerationInput, AppError> {
    let resume = get_document(pool, DocumentKind::Resume, &req.resume_name).await?;
    let job = get_document(pool, DocumentKind::JobDescription, &req.job_description_name).await?;
    let sample = get_document(pool, DocumentKind::CoverLetter, &req.sample_letter_name).await?;

    let (Some(resume), Some(job), Some(sample)) = (resume, job, sample) else {
        return Err(AppError::Validation("Missing required documents".to_string()));
    };

    let biography = get_biography(pool, None).await?;
    let preferences = preferences_with_biography(
        &req.preferences,
        biography.as_ref().map(|b| b.content.as_str()),
    );

    Ok(GenerationInput {
        resume: resume.content,
        prior_letters: vec![sample.content.clone()],
        preferences: Some(preferences),
        job_description: job.content,
        sample_letter: sample.content,
    })
}
