pub mod biography;
pub mod document;
pub mod prompt;
