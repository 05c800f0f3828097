//! Claim extraction: item text in, zero or more structured claims out.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::CompletionResult;
use crate::traits::completion::CompletionService;
use crate::types::claim::{Claim, ClaimKind, Direction, Target};

use super::normalize::{normalize, NormalizedText};
use super::parse::{parse_completion, Shape};
use super::prompts::format_extract_prompt;

/// One claim entry as the model writes it (before transformation).
#[derive(Debug, Clone, Deserialize)]
struct AIClaim {
    claim: Option<String>,
    topic: Option<String>,
    #[serde(rename = "type", alias = "kind")]
    kind: Option<String>,
    direction: Option<String>,
    target: Option<String>,
}

impl AIClaim {
    fn into_claim(self) -> Option<Claim> {
        let text = self.claim?.trim().to_string();
        if text.is_empty() {
            return None;
        }

        Some(Claim {
            text,
            topic: self.topic.unwrap_or_default().trim().to_string(),
            kind: ClaimKind::from_label(self.kind.as_deref().unwrap_or_default()),
            direction: Direction::from_label(self.direction.as_deref().unwrap_or_default()),
            target: Target::from_label(self.target.as_deref().unwrap_or_default()),
        })
    }
}

/// Extract claims from an item's title and body.
///
/// Empty text short-circuits to no claims without calling the service.
pub async fn extract_claims(
    service: &dyn CompletionService,
    title: &str,
    body: &str,
    model: &str,
    text_budget: usize,
) -> CompletionResult<Vec<Claim>> {
    match normalize(title, body, text_budget) {
        Ok(text) => extract_claims_from_text(service, &text, model).await,
        Err(_) => Ok(Vec::new()),
    }
}

/// Extract claims from text that has already been normalized.
pub async fn extract_claims_from_text(
    service: &dyn CompletionService,
    text: &NormalizedText,
    model: &str,
) -> CompletionResult<Vec<Claim>> {
    let prompt = format_extract_prompt(text.as_str());
    let completion = service.complete(&prompt, model).await?;
    let claims = claims_from_completion(&completion);

    debug!(
        chars = text.char_count(),
        claims = claims.len(),
        "extracted claims"
    );

    Ok(claims)
}

/// Turn a raw extraction completion into claims.
///
/// Anything that is not a list yields no claims. List entries that are not
/// objects, or that lack a non-empty `claim`, are dropped individually.
pub fn claims_from_completion(completion: &str) -> Vec<Claim> {
    let entries = match parse_completion(completion).or_empty(Shape::List) {
        Value::Array(entries) => entries,
        _ => return Vec::new(),
    };

    entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value::<AIClaim>(entry).ok())
        .filter_map(AIClaim::into_claim)
        .collect()
}
