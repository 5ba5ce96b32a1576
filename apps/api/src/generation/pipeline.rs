//! Cover Letter Generation: orchestrates the four-stage pipeline.
//!
//! Flow: extract_profile → analyze_job → align → draft_letter.
//!
//! Each stage is one validated completion. Stages hand each other raw markdown:
//! the previous stage's output is pasted verbatim into the next stage's prompt.
//! A failed stage short-circuits the run and later stages never execute.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::info;

use crate::errors::AppError;
use crate::generation::prompts::{
    fill_template, ALIGNMENT_REQUEST_TEMPLATE, ALIGNMENT_SHAPE, DRAFT_REQUEST_TEMPLATE,
    DRAFT_SHAPE, JOB_ANALYSIS_REQUEST_TEMPLATE, JOB_ANALYSIS_SHAPE, PROFILE_REQUEST_TEMPLATE,
    PROFILE_SHAPE,
};
use crate::generation::retry::{CompletionError, ValidatedRequester};
use crate::generation::validator::ResponseValidator;
use crate::llm_client::prompts::{
    ALIGNMENT_PROMPT, JOB_ANALYSIS_PROMPT, PROFILE_PROMPT, VALIDATOR_PROMPT,
};
use crate::llm_client::{LanguageModel, Message, DEFAULT_MODEL, DRAFTING_MODEL};
use crate::prompts::store::get_prompt;

// ────────────────────────────────────────────────────────────────────────────
// Stage identity and failure
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    ProfileExtraction,
    JobAnalysis,
    Alignment,
    Drafting,
    BiographyMerge,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::ProfileExtraction => "processing user information",
            Stage::JobAnalysis => "analyzing job",
            Stage::Alignment => "in alignment",
            Stage::Drafting => "generating cover letter",
            Stage::BiographyMerge => "processing biography update",
        };
        f.write_str(name)
    }
}

/// A stage that could not produce a validated response.
/// Renders as `Error <stage>: <diagnostic>`.
#[derive(Debug, Error)]
#[error("Error {stage}: {source}")]
pub struct StageError {
    pub stage: Stage,
    #[source]
    pub source: CompletionError,
}

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// System prompts consumed by the pipeline, resolved once at construction time.
#[derive(Debug, Clone)]
pub struct StagePrompts {
    pub profile: String,
    pub job_analysis: String,
    pub alignment: String,
    pub validator: String,
}

impl StagePrompts {
    /// Loads the four required prompts. A missing prompt is a configuration
    /// error: the pipeline cannot be built without it.
    pub async fn load(pool: &SqlitePool) -> Result<Self, AppError> {
        Ok(Self {
            profile: require_prompt(pool, PROFILE_PROMPT).await?,
            job_analysis: require_prompt(pool, JOB_ANALYSIS_PROMPT).await?,
            alignment: require_prompt(pool, ALIGNMENT_PROMPT).await?,
            validator: require_prompt(pool, VALIDATOR_PROMPT).await?,
        })
    }
}

async fn require_prompt(pool: &SqlitePool, name: &str) -> Result<String, AppError> {
    get_prompt(pool, name)
        .await?
        .map(|p| p.content)
        .ok_or_else(|| {
            AppError::Config(format!(
                "Prompt '{name}' not found in database. Please initialize prompts first."
            ))
        })
}

/// Everything a full run needs, as plain text.
#[derive(Debug, Clone, Default)]
pub struct GenerationInput {
    pub resume: String,
    pub prior_letters: Vec<String>,
    pub preferences: Option<String>,
    pub job_description: String,
    pub sample_letter: String,
}

/// Output of every stage of a successful run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedLetter {
    pub user_profile: String,
    pub job_analysis: String,
    pub alignment: String,
    pub cover_letter: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct CoverLetterPipeline {
    requester: ValidatedRequester,
    prompts: StagePrompts,
}

impl CoverLetterPipeline {
    pub fn new(llm: Arc<dyn LanguageModel>, prompts: StagePrompts) -> Self {
        let validator = ResponseValidator::new(llm.clone(), prompts.validator.clone());
        Self {
            requester: ValidatedRequester::new(llm, validator),
            prompts,
        }
    }

    /// Builds a pipeline with prompts read from the store.
    pub async fn from_store(
        pool: &SqlitePool,
        llm: Arc<dyn LanguageModel>,
    ) -> Result<Self, AppError> {
        let prompts = StagePrompts::load(pool).await?;
        Ok(Self::new(llm, prompts))
    }

    /// Runs all four stages in order.
    pub async fn run(&self, input: &GenerationInput) -> Result<GeneratedLetter, StageError> {
        info!("Processing candidate information");
        let user_profile = self
            .extract_profile(
                &input.resume,
                &input.prior_letters,
                input.preferences.as_deref(),
            )
            .await?;

        info!("Analyzing job description");
        let job_analysis = self.analyze_job(&input.job_description).await?;

        info!("Matching profile with job requirements");
        let alignment = self.align(&user_profile, &job_analysis).await?;

        info!("Drafting cover letter");
        let cover_letter = self.draft_letter(&alignment, &input.sample_letter).await?;

        Ok(GeneratedLetter {
            user_profile,
            job_analysis,
            alignment,
            cover_letter,
        })
    }

    /// Stage 1: organize resume, prior letters and preferences into a candidate profile.
    pub async fn extract_profile(
        &self,
        resume: &str,
        prior_letters: &[String],
        preferences: Option<&str>,
    ) -> Result<String, StageError> {
        let content = build_profile_request(resume, prior_letters, preferences);
        let messages = [
            Message::system(self.prompts.profile.as_str()),
            Message::user(content),
        ];
        self.run_stage(
            Stage::ProfileExtraction,
            &messages,
            DEFAULT_MODEL,
            PROFILE_SHAPE,
        )
        .await
    }

    /// Stage 2: break the job description into requirements and responsibilities.
    pub async fn analyze_job(&self, job_description: &str) -> Result<String, StageError> {
        let content = fill_template(
            JOB_ANALYSIS_REQUEST_TEMPLATE,
            &[("job_description", job_description)],
        );
        let messages = [
            Message::system(self.prompts.job_analysis.as_str()),
            Message::user(content),
        ];
        self.run_stage(
            Stage::JobAnalysis,
            &messages,
            DEFAULT_MODEL,
            JOB_ANALYSIS_SHAPE,
        )
        .await
    }

    /// Stage 3: match the profile against the job analysis.
    pub async fn align(&self, profile: &str, job_analysis: &str) -> Result<String, StageError> {
        let content = fill_template(
            ALIGNMENT_REQUEST_TEMPLATE,
            &[("profile", profile), ("job_analysis", job_analysis)],
        );
        let messages = [
            Message::system(self.prompts.alignment.as_str()),
            Message::user(content),
        ];
        self.run_stage(Stage::Alignment, &messages, DEFAULT_MODEL, ALIGNMENT_SHAPE)
            .await
    }

    /// Stage 4: write the letter in the sample's style. Single user turn, drafting model.
    pub async fn draft_letter(
        &self,
        alignment: &str,
        sample_letter: &str,
    ) -> Result<String, StageError> {
        let content = fill_template(
            DRAFT_REQUEST_TEMPLATE,
            &[("alignment", alignment), ("sample_letter", sample_letter)],
        );
        let messages = [Message::user(content)];
        self.run_stage(Stage::Drafting, &messages, DRAFTING_MODEL, DRAFT_SHAPE)
            .await
    }

    pub(crate) async fn run_stage(
        &self,
        stage: Stage,
        messages: &[Message],
        model: &str,
        expected_shape: &str,
    ) -> Result<String, StageError> {
        self.requester
            .request(messages, model, expected_shape)
            .await
            .map_err(|source| StageError { stage, source })
    }
}

fn build_profile_request(
    resume: &str,
    prior_letters: &[String],
    preferences: Option<&str>,
) -> String {
    let letters = prior_letters.join("\n---\n");
    let preferences = preferences
        .filter(|p| !p.trim().is_empty())
        .map(|p| format!("\nPreferences:\n{p}"))
        .unwrap_or_default();

    fill_template(
        PROFILE_REQUEST_TEMPLATE,
        &[
            ("resume", resume),
            ("letters", &letters),
            ("preferences", &preferences),
        ],
    )
}

/// Folds the stored biography into the free-text preferences, the way the
/// profile stage expects to see it.
pub fn preferences_with_biography(preferences: &str, biography: Option<&str>) -> String {
    match biography {
        Some(bio) => format!("{preferences}\n\nBiography:\n{bio}"),
        None => preferences.to_string(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
