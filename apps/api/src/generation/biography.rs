//! Biography merge: a single validated stage that folds new biographical text
//! into the stored biography, or replaces it outright.

use serde::Serialize;

use crate::generation::pipeline::{CoverLetterPipeline, Stage, StageError};
use crate::generation::prompts::{
    fill_template, BIOGRAPHY_MERGE_INSTRUCTION, BIOGRAPHY_NO_CURRENT,
    BIOGRAPHY_REPLACE_INSTRUCTION, BIOGRAPHY_REQUEST_TEMPLATE, BIOGRAPHY_SHAPE,
};
use crate::llm_client::{Message, DEFAULT_MODEL};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeMode {
    Merge,
    Replace,
}

impl MergeMode {
    /// Replace when the notes mention "remove" or "replace" in any case; merge otherwise.
    pub fn from_notes(notes: &str) -> Self {
        let notes = notes.to_lowercase();
        if notes.contains("remove") || notes.contains("replace") {
            MergeMode::Replace
        } else {
            MergeMode::Merge
        }
    }

    fn instruction(self) -> &'static str {
        match self {
            MergeMode::Merge => BIOGRAPHY_MERGE_INSTRUCTION,
            MergeMode::Replace => BIOGRAPHY_REPLACE_INSTRUCTION,
        }
    }
}

impl CoverLetterPipeline {
    /// Produces the next biography text from `new_content`, the current biography and the user's notes.
    pub async fn merge_biography(
        &self,
        new_content: &str,
        current_content: Option<&str>,
        notes: &str,
    ) -> Result<String, StageError> {
        let content = build_biography_request(new_content, current_content, notes);
        let messages = [Message::user(content)];
        self.run_stage(
            Stage::BiographyMerge,
            &messages,
            DEFAULT_MODEL,
            BIOGRAPHY_SHAPE,
        )
        .await
    }
}

fn build_biography_request(new_content: &str, current_content: Option<&str>, notes: &str) -> String {
    let mode = MergeMode::from_notes(notes);
    fill_template(
        BIOGRAPHY_REQUEST_TEMPLATE,
        &[
            ("new_content", new_content),
            ("current_content", current_content.unwrap_or(BIOGRAPHY_NO_CURRENT)),
            ("notes", notes),
            ("instruction", mode.instruction()),
        ],
    )
}
