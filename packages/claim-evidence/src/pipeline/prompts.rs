//! LLM prompts for claim extraction and evidence evaluation.

/// Prompt for extracting falsifiable longevity claims from a post.
pub const EXTRACT_CLAIMS_PROMPT: &str = r#"You are an evidence-focused medical research assistant.

From the text below, extract SPECIFIC, falsifiable longevity-related claims.

Return JSON ONLY in this format (no other text):
[
  {
    "claim": "specific claim statement",
    "topic": "main topic (e.g., rapamycin, NAD+, metformin, GLP-1, fasting, exercise, etc.)",
    "type": "supplement/drug/lifestyle/device/other",
    "direction": "benefit/harm/neutral",
    "target": "lifespan/healthspan/disease/performance/other"
  }
]

If no clear longevity claims are present, return: []

TEXT:
{text}
"#;

/// Prompt for rating a claim against retrieved references.
pub const EVALUATE_CLAIM_PROMPT: &str = r#"You are a critical longevity researcher.

CLAIM:
"{claim}"

TOPIC: {topic}

RELATED SCIENTIFIC PAPERS:
{references}

Based ONLY on this information, evaluate the claim. Do not use outside knowledge.

1. Rate the strength of evidence:
   - "strong_support" (multiple RCTs, meta-analyses)
   - "moderate_support" (some studies, limited human data)
   - "weak_support" (animal models only, small studies)
   - "mixed" (conflicting evidence)
   - "no_clear_support" (no relevant evidence found)

2. Explain in 3-5 sentences.

Return JSON ONLY (no other text):
{
  "evidence_level": "...",
  "explanation": "..."
}
"#;

/// Build the claim-extraction prompt for already-normalized text.
pub fn format_extract_prompt(text: &str) -> String {
    fill(EXTRACT_CLAIMS_PROMPT, &[("text", text)])
}

/// Build the evaluation prompt; `references` is a pre-formatted citation block.
pub fn format_evaluate_prompt(claim: &str, topic: &str, references: &str) -> String {
    fill(
        EVALUATE_CLAIM_PROMPT,
        &[
            ("claim", claim),
            ("topic", topic),
            ("references", references),
        ],
    )
}

/// Substitute `{name}` placeholders in one pass over the template.
///
/// Inserted values are never rescanned, so user text containing `{claim}`
/// or JSON braces passes through verbatim. A chain of `str::replace` calls
/// would substitute into values inserted by earlier calls. Unknown
/// placeholders and the literal JSON braces in the templates are left alone.
fn fill(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open + 1..];

        let matched = vars.iter().find(|(name, _)| opens_placeholder(tail, name));

        match matched {
            Some((name, value)) => {
                out.push_str(value);
                rest = &tail[name.len() + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Whether `tail` (the text after a `{`) starts with `name}`.
fn opens_placeholder(tail: &str, name: &str) -> bool {
    tail.strip_prefix(name)
        .is_some_and(|after| after.starts_with('}'))
}
