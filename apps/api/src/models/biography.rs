use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One immutable biography version. Versions start at 1 and only ever grow.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BiographyVersionRow {
    pub id: i64,
    pub version: i64,
    pub content: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}
