// Prompt fragments owned by the LLM client itself.
// Cover letter prompt templates live in generation::prompts.

/// Fixed system turn sent with every chat-style request.
pub const COVER_LETTER_SYSTEM: &str =
    "You are an AI that generates professional and compelling cover letters.";
