//! Pipeline stages and the orchestrator that sequences them.
//!
//! Leaf-first:
//! - Text normalization (title + body, bounded prefix)
//! - Lenient parsing of model completions
//! - Claim extraction
//! - Query construction
//! - Evidence synthesis
//! - Orchestration with per-claim failure isolation

pub mod extract;
pub mod normalize;
pub mod orchestrator;
pub mod parse;
pub mod prompts;
pub mod query;
pub mod synthesize;

pub use extract::{claims_from_completion, extract_claims, extract_claims_from_text};
pub use normalize::{normalize, NormalizedText};
pub use orchestrator::{ClaimEvaluation, ItemAnalysis, Pipeline};
pub use parse::{parse_completion, ParsedCompletion, Shape};
pub use prompts::{
    format_evaluate_prompt, format_extract_prompt, EVALUATE_CLAIM_PROMPT, EXTRACT_CLAIMS_PROMPT,
};
pub use query::{build_query, DOMAIN_ANCHOR_TERMS, QUALITY_FILTERS};
pub use synthesize::{synthesize_verdict, verdict_from_completion};
