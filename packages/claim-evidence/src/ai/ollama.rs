//! Ollama chat backend (local models).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{CompletionError, CompletionResult};
use crate::traits::completion::CompletionService;

use super::ChatMessage;

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Client for a local or remote Ollama server's `/api/chat` endpoint.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    http_client: Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatMessage,
}

impl OllamaClient {
    pub fn new(timeout: Duration) -> CompletionResult<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CompletionError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: DEFAULT_OLLAMA_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl CompletionService for OllamaClient {
    async fn complete(&self, prompt: &str, model: &str) -> CompletionResult<String> {
        let start = std::time::Instant::now();
        let request = ChatRequest {
            model,
            messages: vec![ChatMessage::user(prompt)],
            stream: false,
        };

        let response = self
            .http_client
            .post(format!("{}/api/chat", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Ollama request failed");
                CompletionError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %body, "Ollama API error");
            return Err(CompletionError::Api(format!("Ollama returned {}: {}", status, body)));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::Parse(e.to_string()))?;

        debug!(
            model,
            duration_ms = start.elapsed().as_millis(),
            "Ollama chat completion"
        );

        Ok(chat.message.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let request = ChatRequest {
            model: "llama3:8b",
            messages: vec![ChatMessage::user("hello")],
            stream: false,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({
                "model": "llama3:8b",
                "messages": [{"role": "user", "content": "hello"}],
                "stream": false
            })
        );
    }

    #[test]
    fn test_response_decoding() {
        let raw = r#"{"model":"llama3:8b","created_at":"2024-05-01T00:00:00Z",
                      "message":{"role":"assistant","content":"[]"},"done":true}"#;
        let response: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.message.content, "[]");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let client = OllamaClient::new(Duration::from_millis(500))
            .unwrap()
            .with_base_url("http://127.0.0.1:1/");

        assert_eq!(client.base_url(), "http://127.0.0.1:1");
        match client.complete("hi", "llama3:8b").await {
            Err(CompletionError::Network(_)) => {}
            other => panic!("expected network error, got {:?}", other),
        }
    }
}
