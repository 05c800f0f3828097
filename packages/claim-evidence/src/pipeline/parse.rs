//! Lenient parsing of structured data out of model completions.
//!
//! Models are asked for bare JSON but regularly wrap it in prose or code
//! fences. Parsing runs in stages, each more permissive than the last:
//!
//! 1. the whole completion
//! 2. first `[` through last `]`
//! 3. first `{` through last `}`
//!
//! Arrays are tried before objects because a claim list is an array of
//! objects; trying objects first would cut out just one element.

use serde_json::{Map, Value};

/// Result of parsing a completion.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedCompletion {
    Parsed(Value),
    Unparseable,
}

/// Container shape a caller expects back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    List,
    Object,
}

impl Shape {
    fn empty(self) -> Value {
        match self {
            Self::List => Value::Array(Vec::new()),
            Self::Object => Value::Object(Map::new()),
        }
    }
}

impl ParsedCompletion {
    /// The parsed value, or an empty container of `shape` if nothing parsed.
    ///
    /// A parsed value of a different shape is returned as-is; shape checks
    /// belong to the caller.
    pub fn or_empty(self, shape: Shape) -> Value {
        match self {
            Self::Parsed(value) => value,
            Self::Unparseable => shape.empty(),
        }
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, Self::Parsed(_))
    }
}

/// Parse a completion through the staged fallback. Never fails.
pub fn parse_completion(raw: &str) -> ParsedCompletion {
    if let Ok(value) = serde_json::from_str::<Value>(raw) {
        return ParsedCompletion::Parsed(value);
    }

    if let Some(value) = parse_delimited(raw, '[', ']') {
        return ParsedCompletion::Parsed(value);
    }

    if let Some(value) = parse_delimited(raw, '{', '}') {
        return ParsedCompletion::Parsed(value);
    }

    ParsedCompletion::Unparseable
}

/// Parse the span from the first `open` to the last `close`, inclusive.
fn parse_delimited(raw: &str, open: char, close: char) -> Option<Value> {
    let start = raw.find(open)?;
    let end = raw.rfind(close)?;
    if end < start {
        return None;
    }
    serde_json::from_str(&raw[start..=end]).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_list_is_unchanged() {
        let raw = r#"[{"claim":"x","topic":"rapamycin"}]"#;
        assert_eq!(
            parse_completion(raw),
            ParsedCompletion::Parsed(json!([{"claim": "x", "topic": "rapamycin"}]))
        );
    }

    #[test]
    fn test_prose_wrapped_list_matches_bare_list() {
        let bare = r#"[{"claim":"x","topic":"rapamycin","type":"drug"}]"#;
        let wrapped = format!("here you go: {bare}\nLet me know if you need more.");
        assert_eq!(parse_completion(&wrapped), parse_completion(bare));
    }

    #[test]
    fn test_code_fenced_object() {
        let raw = "```json\n{\"evidence_level\": \"mixed\", \"explanation\": \"conflicting\"}\n```";
        let expected = json!({"evidence_level": "mixed", "explanation": "conflicting"});
        assert_eq!(parse_completion(raw), ParsedCompletion::Parsed(expected));
    }

    #[test]
    fn test_array_stage_runs_before_object_stage() {
        // Object wrapped in prose that itself contains an array: stage 2
        // succeeds on the inner array first.
        let raw = r#"Result: {"ids": [1, 2]} done"#;
        assert_eq!(
            parse_completion(raw),
            ParsedCompletion::Parsed(json!([1, 2]))
        );
    }

    #[test]
    fn test_whole_string_scalar_is_parsed() {
        assert_eq!(parse_completion("42"), ParsedCompletion::Parsed(json!(42)));
    }

    #[test]
    fn test_unrecoverable_yields_empty_container() {
        for raw in ["", "no json here", "] backwards [", "{ not: valid", "[1, 2"] {
            let parsed = parse_completion(raw);
            assert_eq!(parsed, ParsedCompletion::Unparseable, "input: {raw:?}");
            assert_eq!(parsed.clone().or_empty(Shape::List), json!([]));
            assert_eq!(parsed.or_empty(Shape::Object), json!({}));
        }
    }

    #[test]
    fn test_or_empty_keeps_mismatched_shape() {
        let parsed = parse_completion(r#"{"a": 1}"#);
        assert_eq!(parsed.or_empty(Shape::List), json!({"a": 1}));
    }
}
