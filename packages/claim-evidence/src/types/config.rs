//! Configuration types for the pipeline and the search client.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default completion model (a local Ollama tag).
pub const DEFAULT_MODEL: &str = "llama3:8b";

/// Configuration for a pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Model identifier passed through to the completion service.
    ///
    /// Opaque to the pipeline. Default: `llama3:8b`.
    pub model: String,

    /// Maximum references fetched per claim. Default: 5.
    pub max_references: usize,

    /// Character budget for normalized item text.
    ///
    /// Text beyond this prefix is dropped before prompting. Default: 2000.
    pub text_budget: usize,

    /// Number of items processed concurrently.
    ///
    /// Default: 1 (strictly sequential). Search requests stay globally
    /// paced regardless of this value.
    pub concurrency: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_references: 5,
            text_budget: 2000,
            concurrency: 1,
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_references(mut self, max: usize) -> Self {
        self.max_references = max;
        self
    }

    pub fn with_text_budget(mut self, budget: usize) -> Self {
        self.text_budget = budget;
        self
    }

    /// Set item concurrency (clamped to at least 1).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }
}

/// Configuration for talking to the literature search backend.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Minimum spacing between consecutive backend requests.
    ///
    /// The backend publishes a limit of 3 requests/second; 350ms keeps
    /// every request pair under it. Default: 350ms.
    pub min_request_interval: Duration,

    /// Transport timeout per request. Default: 10s.
    pub request_timeout: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_request_interval: Duration::from_millis(350),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl SearchConfig {
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.model, "llama3:8b");
        assert_eq!(config.max_references, 5);
        assert_eq!(config.text_budget, 2000);
        assert_eq!(config.concurrency, 1);

        let search = SearchConfig::default();
        assert_eq!(search.min_request_interval, Duration::from_millis(350));
    }

    #[test]
    fn test_concurrency_is_clamped() {
        let config = PipelineConfig::new().with_concurrency(0);
        assert_eq!(config.concurrency, 1);
    }
}
