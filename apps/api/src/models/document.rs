use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The three stored document kinds. Each is keyed by a unique name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Resume,
    CoverLetter,
    JobDescription,
}

impl DocumentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentKind::Resume => "resume",
            DocumentKind::CoverLetter => "cover_letter",
            DocumentKind::JobDescription => "job_description",
        }
    }

    /// Directory under the mirror root holding this kind's text files.
    pub fn mirror_dir(self) -> &'static str {
        match self {
            DocumentKind::Resume => "resumes",
            DocumentKind::CoverLetter => "cover_letters",
            DocumentKind::JobDescription => "job_descriptions",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DocumentKind::Resume => "resume",
            DocumentKind::CoverLetter => "cover letter",
            DocumentKind::JobDescription => "job description",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DocumentRow {
    pub id: i64,
    pub kind: String,
    pub name: String,
    pub content: String,
    pub company: Option<String>,
    pub position: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing view: everything but the content.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DocumentSummary {
    pub name: String,
    pub company: Option<String>,
    pub position: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Job-description metadata. Ignored for other kinds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub company: Option<String>,
    pub position: Option<String>,
}
