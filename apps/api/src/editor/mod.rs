//! Interactive cover letter editor.
//!
//! A session is a running transcript seeded with a system prompt and a scripted
//! greeting. The letter being edited is injected into the first real user turn
//! only. Input is parsed into an `EditorInput` before anything touches the
//! transcript, so model-switch commands never reach the model as text.

pub mod handlers;
pub mod prompts;

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::editor::prompts::{letter_context, EDITOR_GREETING, EDITOR_SYSTEM};
use crate::llm_client::{LanguageModel, LlmError, Message, Role, DEFAULT_MODEL, DRAFTING_MODEL};

/// Messages in a freshly seeded transcript: system prompt + greeting.
const SEED_LEN: usize = 2;

// ────────────────────────────────────────────────────────────────────────────
// Input parsing
// ────────────────────────────────────────────────────────────────────────────

/// Model selectable from inside an editing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorModel {
    Standard,
    Reasoning,
}

impl EditorModel {
    pub fn as_str(self) -> &'static str {
        match self {
            EditorModel::Standard => DEFAULT_MODEL,
            EditorModel::Reasoning => DRAFTING_MODEL,
        }
    }

    fn from_command(token: &str) -> Option<Self> {
        match token {
            "\\4o" => Some(EditorModel::Standard),
            "\\o1" => Some(EditorModel::Reasoning),
            _ => None,
        }
    }
}

/// One line of user input, split into an optional model switch and optional text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorInput {
    pub switch_to: Option<EditorModel>,
    pub text: Option<String>,
}

impl EditorInput {
    pub fn parse(raw: &str) -> Self {
        let command = raw.get(..3).and_then(EditorModel::from_command);
        let rest = match command {
            Some(_) => raw[3..].trim(),
            None => raw,
        };

        Self {
            switch_to: command,
            text: (!rest.trim().is_empty()).then(|| rest.to_string()),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Session
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("No active editing session")]
    Inactive,

    #[error("{0}")]
    Llm(#[from] LlmError),
}

/// Outcome of a processed message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EditorReply {
    /// Only a model switch was requested; nothing was sent.
    ModelSwitched { model: EditorModel },
    Reply { content: String },
}

#[derive(Debug, Clone)]
struct ActiveSession {
    transcript: Vec<Message>,
    letter: String,
}

#[derive(Debug, Clone)]
enum SessionState {
    Idle,
    Active(ActiveSession),
}

pub struct CoverLetterEditor {
    llm: Arc<dyn LanguageModel>,
    model: EditorModel,
    state: SessionState,
}

impl CoverLetterEditor {
    pub fn new(llm: Arc<dyn LanguageModel>) -> Self {
        Self {
            llm,
            model: EditorModel::Standard,
            state: SessionState::Idle,
        }
    }

    /// Starts (or restarts) a session for `letter`.
    pub fn start_session(&mut self, letter: impl Into<String>) {
        self.state = SessionState::Active(ActiveSession {
            transcript: vec![
                Message::system(EDITOR_SYSTEM),
                Message::assistant(EDITOR_GREETING),
            ],
            letter: letter.into(),
        });
    }

    pub fn end_session(&mut self) {
        self.state = SessionState::Idle;
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, SessionState::Active(_))
    }

    pub fn model(&self) -> EditorModel {
        self.model
    }

    pub fn transcript(&self) -> &[Message] {
        match &self.state {
            SessionState::Active(session) => &session.transcript,
            SessionState::Idle => &[],
        }
    }

    /// The most recent assistant reply after the scripted greeting.
    pub fn latest_draft(&self) -> Option<&str> {
        self.transcript()
            .iter()
            .skip(SEED_LEN)
            .rev()
            .find(|m| m.role == Role::Assistant)
            .map(|m| m.content.as_str())
    }

    /// Applies one line of user input to the session.
    ///
    /// On a failed model call the user turn is removed again, so the transcript
    /// never ends with an unanswered user message.
    pub async fn process_message(&mut self, raw: &str) -> Result<EditorReply, EditorError> {
        let SessionState::Active(session) = &mut self.state else {
            return Err(EditorError::Inactive);
        };

        let input = EditorInput::parse(raw);
        if let Some(model) = input.switch_to {
            self.model = model;
            info!("Editor switched to {} model", model.as_str());
        }
        let Some(text) = input.text else {
            return Ok(EditorReply::ModelSwitched { model: self.model });
        };

        let content = if session.transcript.len() == SEED_LEN {
            letter_context(&session.letter, &text)
        } else {
            text
        };
        session.transcript.push(Message::user(content));

        match self
            .llm
            .complete(self.model.as_str(), &session.transcript)
            .await
        {
            Ok(reply) => {
                session.transcript.push(Message::assistant(reply.clone()));
                Ok(EditorReply::Reply { content: reply })
            }
            Err(e) => {
                warn!("Editor call failed, rolling back user turn: {e}");
                session.transcript.pop();
                Err(e.into())
            }
        }
    }
}
