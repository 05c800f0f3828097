//! Text normalization: title + body into one bounded unit.

use crate::error::EmptyInput;

/// Item text ready to be embedded in an extraction prompt.
///
/// Never empty, never longer than the budget it was built with (in chars).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText(String);

impl NormalizedText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }
}

impl AsRef<str> for NormalizedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Merge title and body, trim, and keep at most `budget` characters.
///
/// Truncation is a plain prefix cut on a char boundary.
pub fn normalize(title: &str, body: &str, budget: usize) -> Result<NormalizedText, EmptyInput> {
    let merged = format!("{}\n\n{}", title, body);
    let trimmed = merged.trim();

    let text = match trimmed.char_indices().nth(budget) {
        Some((cut, _)) => &trimmed[..cut],
        None => trimmed,
    };

    if text.is_empty() {
        return Err(EmptyInput);
    }

    Ok(NormalizedText(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merges_with_blank_line() {
        let text = normalize("Title", "Body text", 2000).unwrap();
        assert_eq!(text.as_str(), "Title\n\nBody text");
    }

    #[test]
    fn test_trims_when_one_side_empty() {
        assert_eq!(normalize("", "  body ", 2000).unwrap().as_str(), "body");
        assert_eq!(normalize("title", "", 2000).unwrap().as_str(), "title");
    }

    #[test]
    fn test_empty_and_whitespace_are_rejected() {
        assert_eq!(normalize("", "", 2000), Err(EmptyInput));
        assert_eq!(normalize("  \n", "\t ", 2000), Err(EmptyInput));
    }

    #[test]
    fn test_truncates_to_budget_in_chars() {
        let body = "é".repeat(3000);
        let text = normalize("", &body, 2000).unwrap();
        assert_eq!(text.char_count(), 2000);
        assert!(body.starts_with(text.as_str()));
    }

    #[test]
    fn test_truncation_is_deterministic() {
        let body = "word ".repeat(1000);
        assert_eq!(normalize("t", &body, 50), normalize("t", &body, 50));
    }

    #[test]
    fn test_zero_budget_is_empty() {
        assert_eq!(normalize("title", "body", 0), Err(EmptyInput));
    }
}
