//! OpenAI-compatible chat completions backend.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{CompletionError, CompletionResult};
use crate::traits::completion::CompletionService;

use super::ChatMessage;

pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1";

/// Client for `/chat/completions` on OpenAI or any compatible server.
#[derive(Debug, Clone)]
pub struct OpenAIClient {
    http_client: Client,
    api_key: SecretString,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

impl OpenAIClient {
    pub fn new(api_key: impl Into<SecretString>, timeout: Duration) -> CompletionResult<Self> {
        let api_key = api_key.into();
        if api_key.expose_secret().is_empty() {
            return Err(CompletionError::Config("OpenAI API key is empty".into()));
        }

        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CompletionError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_key,
            base_url: DEFAULT_OPENAI_URL.to_string(),
        })
    }

    /// Set a custom base URL (Azure, proxies, local compatible servers).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl CompletionService for OpenAIClient {
    async fn complete(&self, prompt: &str, model: &str) -> CompletionResult<String> {
        let start = std::time::Instant::now();
        let request = ChatRequest {
            model,
            messages: vec![ChatMessage::user(prompt)],
        };

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "OpenAI request failed");
                CompletionError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "OpenAI API error");
            return Err(CompletionError::Api(format!("OpenAI API error: {}", error_text)));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::Parse(e.to_string()))?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| CompletionError::Api("No response from OpenAI".into()))?;

        debug!(
            model,
            duration_ms = start.elapsed().as_millis(),
            "OpenAI chat completion"
        );

        Ok(content)
    }
}
