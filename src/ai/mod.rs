//! AI provider integration for email condensation and reply drafting
//!
//! This module talks to the OpenRouter chat completions API:
//! - Condensing an email into action items and a short summary
//! - Drafting a reply at a requested tone

mod client;
mod prompts;

pub use client::OpenRouterClient;
pub use prompts::{EMAIL_ASSISTANT_SYSTEM, condense_prompt, reply_prompt};
