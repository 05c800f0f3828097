//! Completion backends.
//!
//! Both speak a chat protocol with a single user message carrying the
//! prompt, and both return the assistant's text unmodified.

pub mod ollama;
pub mod openai;

pub use ollama::OllamaClient;
pub use openai::OpenAIClient;

use serde::{Deserialize, Serialize};

/// One chat message, shared by both wire formats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}
