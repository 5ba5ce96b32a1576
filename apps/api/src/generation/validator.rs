//! Response Validator: a second model call that judges whether a completion
//! is a usable answer or a refusal / off-format reply.

use std::sync::Arc;

use tracing::warn;

use crate::generation::prompts::{fill_template, VALIDATION_REQUEST_TEMPLATE};
use crate::llm_client::{LanguageModel, Message, DEFAULT_MODEL};

/// The only reply accepted as a pass. Compared after trimming, case-sensitive.
pub const VALID_TOKEN: &str = "VALID";

#[derive(Clone)]
pub struct ResponseValidator {
    llm: Arc<dyn LanguageModel>,
    system_prompt: String,
}

impl ResponseValidator {
    pub fn new(llm: Arc<dyn LanguageModel>, system_prompt: impl Into<String>) -> Self {
        Self {
            llm,
            system_prompt: system_prompt.into(),
        }
    }

    /// Returns true iff the validator model answers exactly `VALID`.
    /// A failed validation call counts as a rejection.
    pub async fn validate(&self, response: &str, expected_shape: &str) -> bool {
        let messages = [
            Message::system(self.system_prompt.as_str()),
            Message::user(build_validation_request(response, expected_shape)),
        ];

        match self.llm.complete(DEFAULT_MODEL, &messages).await {
            Ok(verdict) => is_valid_verdict(&verdict),
            Err(e) => {
                warn!("Validation call failed, treating response as invalid: {e}");
                false
            }
        }
    }
}

fn build_validation_request(response: &str, expected_shape: &str) -> String {
    fill_template(
        VALIDATION_REQUEST_TEMPLATE,
        &[("response", response), ("expected_shape", expected_shape)],
    )
}

pub fn is_valid_verdict(verdict: &str) -> bool {
    verdict.trim() == VALID_TOKEN
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedModel;
    use crate::llm_client::Role;

    const SYSTEM: &str = "You are a response validator.";

    #[test]
    fn test_verdict_exact_match_only() {
        assert!(is_valid_verdict("VALID"));
        assert!(is_valid_verdict("  VALID\n"));
        assert!(!is_valid_verdict("valid"));
        assert!(!is_valid_verdict("VALID."));
        assert!(!is_valid_verdict("INVALID"));
        assert!(!is_valid_verdict("The response is VALID"));
        assert!(!is_valid_verdict(""));
    }

    #[tokio::test]
    async fn test_validate_accepts_valid_reply() {
        let llm = Arc::new(ScriptedModel::new().reply("VALID\n"));
        let validator = ResponseValidator::new(llm.clone(), SYSTEM);
        assert!(validator.validate("# Core Requirements", "# Core Requirements").await);
    }

    #[tokio::test]
    async fn test_validate_rejects_near_misses() {
        for reply in ["valid", "VALID.", "INVALID", "Valid"] {
            let llm = Arc::new(ScriptedModel::new().reply(reply));
            let validator = ResponseValidator::new(llm, SYSTEM);
            assert!(
                !validator.validate("text", "").await,
                "reply {reply:?} must not validate"
            );
        }
    }

    #[tokio::test]
    async fn test_validate_fails_closed_on_transport_error() {
        let llm = Arc::new(ScriptedModel::new().fail(503));
        let validator = ResponseValidator::new(llm, SYSTEM);
        assert!(!validator.validate("text", "").await);
    }

    #[tokio::test]
    async fn test_validation_request_shape() {
        let llm = Arc::new(ScriptedModel::new().reply("VALID"));
        let validator = ResponseValidator::new(llm.clone(), SYSTEM);
        validator
            .validate("candidate text", "# Key Matches\n* [Matches]")
            .await;

        let calls = llm.calls();
        assert_eq!(calls.len(), 1);
        let call = &calls[0];
        assert_eq!(call.model, DEFAULT_MODEL);
        assert_eq!(call.messages.len(), 2);
        assert_eq!(call.messages[0].role, Role::System);
        assert_eq!(call.messages[0].content, SYSTEM);
        assert_eq!(call.messages[1].role, Role::User);
        let user = &call.messages[1].content;
        assert!(user.contains("candidate text"));
        assert!(user.contains("# Key Matches"));
        assert!(user.trim_end().ends_with("Reply with exactly VALID or INVALID."));
    }

    #[tokio::test]
    async fn test_validation_request_keeps_placeholder_text_in_response() {
        let llm = Arc::new(ScriptedModel::new().reply("VALID"));
        let validator = ResponseValidator::new(llm.clone(), SYSTEM);
        validator
            .validate("Use {expected_shape} here", "# Shape")
            .await;

        let user = &llm.calls()[0].messages[1].content;
        assert!(user.contains("Response to validate:\nUse {expected_shape} here"));
        assert!(user.contains("Expected format (if any):\n# Shape"));
    }
}
