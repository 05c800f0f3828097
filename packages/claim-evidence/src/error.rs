//! Typed errors for the evidence pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`). Only [`PipelineError`]
//! ever reaches the caller of a batch run; everything below it degrades to an
//! empty or `error`-tagged result inside the pipeline.

use thiserror::Error;

/// Errors from a whole pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The input batch was empty; nothing to process.
    #[error("no input items to process")]
    NoInput,

    /// Completion service failed for a stage that cannot degrade on its own
    #[error("completion service error: {0}")]
    Completion(#[from] CompletionError),

    /// Persisting the accumulated table failed
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

/// Title and body normalised to nothing.
///
/// Not a failure: the item legitimately yields zero claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("item has no analyzable text")]
pub struct EmptyInput;

/// Errors from a text-completion backend.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Configuration error (missing API key, invalid settings)
    #[error("configuration error: {0}")]
    Config(String),

    /// Network error (connection failed, timeout)
    #[error("network error: {0}")]
    Network(String),

    /// API error (non-2xx response)
    #[error("API error: {0}")]
    Api(String),

    /// Response body did not have the expected envelope
    #[error("parse error: {0}")]
    Parse(String),
}

/// Errors from the literature search backend.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Transport failure or timeout
    #[error("search request failed: {0}")]
    Network(#[source] reqwest::Error),

    /// Non-2xx response from the backend
    #[error("search backend returned {status}")]
    Api { status: u16 },

    /// Response body could not be decoded
    #[error("could not decode search response: {0}")]
    Decode(String),
}

/// Errors while persisting results.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Result type alias for completion operations.
pub type CompletionResult<T> = std::result::Result<T, CompletionError>;

/// Result type alias for search operations.
pub type SearchResult<T> = std::result::Result<T, SearchError>;

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
