//! Text-completion service trait.
//!
//! The pipeline treats the language model as a black box: a prompt and a
//! model identifier go in, free-form text comes out. Nothing about the
//! returned string is trusted; see [`crate::pipeline::parse`].

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::CompletionResult;

/// A backend that completes prompts.
///
/// Implementations wrap a specific provider (Ollama, OpenAI-compatible
/// endpoints) and only handle transport; prompting and parsing live in the
/// pipeline stages.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Complete a single-turn prompt with the given model.
    async fn complete(&self, prompt: &str, model: &str) -> CompletionResult<String>;
}

#[async_trait]
impl<T: CompletionService + ?Sized> CompletionService for Arc<T> {
    async fn complete(&self, prompt: &str, model: &str) -> CompletionResult<String> {
        (**self).complete(prompt, model).await
    }
}

#[async_trait]
impl<T: CompletionService + ?Sized> CompletionService for Box<T> {
    async fn complete(&self, prompt: &str, model: &str) -> CompletionResult<String> {
        (**self).complete(prompt, model).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_service_is_object_safe() {
        fn _assert_service<T: CompletionService>() {}

        _assert_service::<Arc<dyn CompletionService>>();
        _assert_service::<Box<dyn CompletionService>>();
    }
}
