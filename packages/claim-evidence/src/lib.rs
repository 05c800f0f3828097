//! Claim Evidence Verification Pipeline
//!
//! Turns informal community posts into structured longevity claims, looks up
//! biomedical literature for each claim, and records an evidence verdict
//! with the citations it was based on.
//!
//! # Design
//!
//! - The model is a black-box text-completion service; its output is parsed
//!   leniently and never trusted to be well-formed.
//! - Search requests are paced through one shared rate limiter, because the
//!   literature backend publishes a hard limit of 3 requests/second.
//! - No single item or claim can abort a batch. Failures become `error`
//!   verdicts or item outcomes, and the table is always persisted.
//!
//! # Usage
//!
//! ```rust,ignore
//! use claim_evidence::{
//!     LiteratureSearchClient, OllamaClient, Pipeline, PipelineConfig, PubMedBackend,
//!     RequestPacer, ResultTable, CsvStore,
//! };
//!
//! let search = LiteratureSearchClient::new(PubMedBackend::new()?, RequestPacer::default());
//! let pipeline = Pipeline::new(OllamaClient::new(timeout)?, search, PipelineConfig::default());
//!
//! let store = CsvStore::new("data/processed/claims_evidence.csv");
//! let (table, report) = pipeline.run(&items, ResultTable::new(), &store).await?;
//! println!("{} claims, {} errored", table.len(), report.summary.error_count());
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Collaborator traits (CompletionService, SearchBackend, ResultStore)
//! - [`types`] - Items, claims, references, verdicts, records
//! - [`pipeline`] - Stages and the orchestrator
//! - [`search`] - PubMed backend, request pacing, search client
//! - [`ai`] - Ollama and OpenAI completion backends
//! - [`stores`] - CSV, JSONL and in-memory result stores
//! - [`security`] - Credential handling
//! - [`testing`] - Mock collaborators for testing

pub mod ai;
pub mod error;
pub mod pipeline;
pub mod search;
pub mod security;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{
    CompletionError, CompletionResult, EmptyInput, PipelineError, Result, SearchError,
    SearchResult, StoreError, StoreResult,
};
pub use traits::{completion::CompletionService, search::SearchBackend, store::ResultStore};
pub use types::{
    claim::{Claim, ClaimKind, Direction, Target},
    config::{PipelineConfig, SearchConfig, DEFAULT_MODEL},
    item::RawItem,
    outcome::{ClaimOutcome, ClaimStage, ItemOutcome, RunReport},
    record::{ResultRecord, ResultRow, ResultTable, RESULT_COLUMNS},
    reference::{format_references, Reference, NO_RESULTS},
    summary::EvidenceSummary,
    verdict::{EvidenceLevel, Verdict, UNPARSEABLE_EXPLANATION},
};

// Re-export pipeline components
pub use pipeline::{
    build_query, claims_from_completion, extract_claims, normalize, parse_completion,
    synthesize_verdict, verdict_from_completion, ClaimEvaluation, ItemAnalysis, NormalizedText,
    ParsedCompletion, Pipeline, Shape,
};

pub use ai::{OllamaClient, OpenAIClient};
pub use search::{LiteratureSearchClient, PubMedBackend, RequestPacer};
pub use security::{EutilsCredentials, SecretString};
pub use stores::{CsvStore, JsonlStore, MemoryStore, WriteMode};

// Re-export testing utilities
pub use testing::{MockCompletion, MockSearchBackend};
