// Cover Letter Generation
// Implements: response validation, bounded retry, the four-stage pipeline and biography merge.
// All model calls go through llm_client::LanguageModel.

pub mod biography;
pub mod handlers;
pub mod pipeline;
pub mod prompts;
pub mod retry;
pub mod validator;
