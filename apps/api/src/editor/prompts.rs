// Editor prompt constants.

pub const EDITOR_SYSTEM: &str = "You are an expert cover letter editor. \
Help the user improve their cover letter through a natural conversation.
Your goal is to make the cover letter more compelling, clear, and tailored to the job while maintaining the user's voice.
You can suggest improvements to:
- Structure and flow
- Language and tone
- Content and emphasis
- Specific phrases or sentences
Be constructive and explain your suggestions clearly.";

pub const EDITOR_GREETING: &str =
    "I'm here to help you edit your cover letter. What would you like me to help you with?";

/// First user turn of a session: the letter under edit followed by the request.
pub fn letter_context(letter: &str, message: &str) -> String {
    format!("Here's my cover letter:\n\n{letter}\n\n{message}")
}
