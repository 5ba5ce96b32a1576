//! Retrying Completion Requester: one completion call wrapped in a bounded,
//! validated retry loop.
//!
//! Transport errors and validator rejections draw from the same attempt budget.
//! There is no backoff: a failed attempt re-issues the identical request.

use std::sync::Arc;

use thiserror::Error;
use tracing::warn;

use crate::generation::validator::ResponseValidator;
use crate::llm_client::{LanguageModel, LlmError, Message};

/// Attempts per stage, shared between transport errors and validation rejections.
pub const MAX_ATTEMPTS: u32 = 3;

#[derive(Debug, Error)]
pub enum CompletionError {
    /// The final attempt failed at the transport / service level.
    #[error("{0}")]
    Transport(#[from] LlmError),

    /// Every attempt either failed validation or (before the last) failed in transport.
    #[error("Failed to generate a valid response after multiple attempts")]
    Exhausted { attempts: u32 },
}

#[derive(Clone)]
pub struct ValidatedRequester {
    llm: Arc<dyn LanguageModel>,
    validator: ResponseValidator,
    max_attempts: u32,
}

impl ValidatedRequester {
    pub fn new(llm: Arc<dyn LanguageModel>, validator: ResponseValidator) -> Self {
        Self {
            llm,
            validator,
            max_attempts: MAX_ATTEMPTS,
        }
    }

    /// Requests a completion and returns the first attempt the validator accepts.
    pub async fn request(
        &self,
        messages: &[Message],
        model: &str,
        expected_shape: &str,
    ) -> Result<String, CompletionError> {
        for attempt in 1..=self.max_attempts {
            let text = match self.llm.complete(model, messages).await {
                Ok(text) => text,
                Err(e) if attempt == self.max_attempts => return Err(e.into()),
                Err(e) => {
                    warn!(
                        "Attempt {attempt}/{}: completion failed ({e}), retrying",
                        self.max_attempts
                    );
                    continue;
                }
            };

            if self.validator.validate(&text, expected_shape).await {
                return Ok(text);
            }

            warn!(
                "Attempt {attempt}/{}: invalid response detected, retrying",
                self.max_attempts
            );
        }

        Err(CompletionError::Exhausted {
            attempts: self.max_attempts,
        })
    }
}
