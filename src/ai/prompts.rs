//! Prompt construction for email generation

/// System prompt framing the assistant's role for all generation requests
pub const EMAIL_ASSISTANT_SYSTEM: &str =
    "You are an AI assistant for corporate and personal email.";

/// Instruction for condensing an email into action items and a short summary
pub fn condense_prompt(tone: &str, email: &str) -> String {
    format!(
        "Condense the following email into a short bullet list of action items \
         and a 1-2 sentence summary. Tone: {}.\n\nEmail:\n{}",
        tone, email
    )
}

/// Instruction for drafting a reply at the given tone
pub fn reply_prompt(tone: &str, email: &str) -> String {
    format!(
        "Write a {} reply to the following email. Keep it clear and professional. \
         Include a short subject suggestion in square brackets at the top.\n\nEmail:\n{}",
        tone, email
    )
}
