//! Evidence synthesis: claim + references in, verdict out.

use serde_json::Value;
use tracing::debug;

use crate::error::CompletionResult;
use crate::traits::completion::CompletionService;
use crate::types::{
    reference::{format_references, Reference},
    verdict::{EvidenceLevel, Verdict},
};

use super::parse::{parse_completion, Shape};
use super::prompts::format_evaluate_prompt;

/// Ask the completion service to rate a claim against `references`.
///
/// Only transport failures are errors; an unusable response degrades to
/// [`Verdict::unparseable`].
pub async fn synthesize_verdict(
    service: &dyn CompletionService,
    model: &str,
    claim: &str,
    topic: &str,
    references: &[Reference],
) -> CompletionResult<Verdict> {
    let prompt = format_evaluate_prompt(claim, topic, &format_references(references));
    let completion = service.complete(&prompt, model).await?;
    let verdict = verdict_from_completion(&completion);

    debug!(
        evidence_level = %verdict.evidence_level,
        references = references.len(),
        "synthesized verdict"
    );

    Ok(verdict)
}

/// Turn a raw evaluation completion into a verdict.
///
/// Requires an object with string `evidence_level` and `explanation`.
/// A level outside the rubric becomes `unknown` but keeps the explanation.
pub fn verdict_from_completion(completion: &str) -> Verdict {
    let object = match parse_completion(completion).or_empty(Shape::Object) {
        Value::Object(object) => object,
        _ => return Verdict::unparseable(),
    };

    let level = object.get("evidence_level").and_then(Value::as_str);
    let explanation = object.get("explanation").and_then(Value::as_str);

    match (level, explanation) {
        (Some(level), Some(explanation)) => Verdict::new(
            EvidenceLevel::from_label(level).unwrap_or(EvidenceLevel::Unknown),
            explanation.trim(),
        ),
        _ => Verdict::unparseable(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockCompletion;

    const NOTHING_FOUND: &str =
        r#"{"evidence_level": "no_clear_support", "explanation": "Nothing found."}"#;

    #[test]
    fn test_well_formed_response() {
        let verdict = verdict_from_completion(
            r#"{"evidence_level": "moderate_support", "explanation": "Two small human trials."}"#,
        );
        assert_eq!(
            verdict,
            Verdict::new(EvidenceLevel::ModerateSupport, "Two small human trials.")
        );
    }

    #[test]
    fn test_prose_wrapped_response() {
        let verdict = verdict_from_completion(
            r#"Here it is: {"evidence_level": "weak_support", "explanation": "Mice only."}"#,
        );
        assert_eq!(verdict.evidence_level, EvidenceLevel::WeakSupport);
    }

    #[test]
    fn test_missing_field_is_unparseable() {
        assert_eq!(
            verdict_from_completion(r#"{"evidence_level": "mixed"}"#),
            Verdict::unparseable()
        );
        assert_eq!(
            verdict_from_completion(r#"{"explanation": "something"}"#),
            Verdict::unparseable()
        );
    }

    #[test]
    fn test_non_object_is_unparseable() {
        for raw in ["", "strong support!", r#"["strong_support"]"#, "17"] {
            assert_eq!(
                verdict_from_completion(raw),
                Verdict::unparseable(),
                "input: {raw:?}"
            );
        }
    }

    #[test]
    fn test_off_rubric_level_becomes_unknown() {
        let verdict = verdict_from_completion(
            r#"{"evidence_level": "very strong", "explanation": "Trust me."}"#,
        );
        assert_eq!(verdict.evidence_level, EvidenceLevel::Unknown);
        assert_eq!(verdict.explanation, "Trust me.");
    }

    #[test]
    fn test_model_cannot_claim_error_level() {
        let verdict =
            verdict_from_completion(r#"{"evidence_level": "error", "explanation": "Reserved."}"#);
        assert_eq!(verdict.evidence_level, EvidenceLevel::Unknown);
    }

    #[tokio::test]
    async fn test_empty_references_use_placeholder() {
        let service = MockCompletion::new().with_default_response(NOTHING_FOUND);

        let verdict = synthesize_verdict(&service, "m", "claim", "topic", &[])
            .await
            .unwrap();

        assert_eq!(verdict.evidence_level, EvidenceLevel::NoClearSupport);
        assert!(service.calls()[0].prompt.contains("No results found."));
    }

    #[tokio::test]
    async fn test_references_are_formatted_into_prompt() {
        let service = MockCompletion::new().with_default_response("{}");
        let refs = vec![Reference::new("123", "Rapamycin in mice", "Nature", "2009")];

        let verdict = synthesize_verdict(&service, "m", "claim", "rapamycin", &refs)
            .await
            .unwrap();

        let citation = "- Rapamycin in mice (Nature, 2009) [PMID: 123]";
        assert_eq!(verdict, Verdict::unparseable());
        assert!(service.calls()[0].prompt.contains(citation));
    }
}
