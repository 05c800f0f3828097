//! Structured claims extracted from free text.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A discrete, falsifiable assertion about a longevity intervention.
///
/// Claims are value objects: they have no identity beyond the item they came
/// from and their position in that item's extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    /// The claim statement (never empty)
    #[serde(rename = "claim")]
    pub text: String,

    /// Main subject, e.g. "rapamycin", "fasting"
    pub topic: String,

    pub kind: ClaimKind,
    pub direction: Direction,
    pub target: Target,
}

impl Claim {
    /// Create a claim with `other`/`neutral`/`other` classification.
    pub fn new(text: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            topic: topic.into(),
            kind: ClaimKind::Other,
            direction: Direction::Neutral,
            target: Target::Other,
        }
    }

    pub fn with_kind(mut self, kind: ClaimKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }
}

/// Kind of intervention the claim is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimKind {
    Supplement,
    Drug,
    Lifestyle,
    Device,
    Other,
}

impl ClaimKind {
    /// Lenient label match; anything unrecognised is `Other`.
    pub fn from_label(label: &str) -> Self {
        match normalize_label(label).as_str() {
            "supplement" => Self::Supplement,
            "drug" => Self::Drug,
            "lifestyle" => Self::Lifestyle,
            "device" => Self::Device,
            _ => Self::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Supplement => "supplement",
            Self::Drug => "drug",
            Self::Lifestyle => "lifestyle",
            Self::Device => "device",
            Self::Other => "other",
        }
    }
}

/// Claimed direction of the effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Benefit,
    Harm,
    Neutral,
}

impl Direction {
    /// Lenient label match; anything unrecognised is `Neutral`.
    pub fn from_label(label: &str) -> Self {
        match normalize_label(label).as_str() {
            "benefit" => Self::Benefit,
            "harm" => Self::Harm,
            _ => Self::Neutral,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Benefit => "benefit",
            Self::Harm => "harm",
            Self::Neutral => "neutral",
        }
    }
}

/// Outcome the claim is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    Lifespan,
    Healthspan,
    Disease,
    Performance,
    Other,
}

impl Target {
    /// Lenient label match; anything unrecognised is `Other`.
    pub fn from_label(label: &str) -> Self {
        match normalize_label(label).as_str() {
            "lifespan" => Self::Lifespan,
            "healthspan" => Self::Healthspan,
            "disease" => Self::Disease,
            "performance" => Self::Performance,
            _ => Self::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lifespan => "lifespan",
            Self::Healthspan => "healthspan",
            Self::Disease => "disease",
            Self::Performance => "performance",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ClaimKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lower-case, trim, and map spaces/hyphens to underscores.
pub(crate) fn normalize_label(label: &str) -> String {
    label
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_case_insensitive() {
        assert_eq!(ClaimKind::from_label(" Drug "), ClaimKind::Drug);
        assert_eq!(Direction::from_label("HARM"), Direction::Harm);
        assert_eq!(Target::from_label("Healthspan"), Target::Healthspan);
    }

    #[test]
    fn test_unrecognised_labels_fall_back() {
        // Models sometimes echo the whole option list back
        assert_eq!(
            ClaimKind::from_label("supplement/drug/lifestyle"),
            ClaimKind::Other
        );
        assert_eq!(Direction::from_label("positive"), Direction::Neutral);
        assert_eq!(Target::from_label(""), Target::Other);
    }

    #[test]
    fn test_claim_serializes_with_claim_key() {
        let claim = Claim::new("NMN raises NAD+", "NMN").with_kind(ClaimKind::Supplement);
        let value = serde_json::to_value(&claim).unwrap();
        assert_eq!(value["claim"], "NMN raises NAD+");
        assert_eq!(value["kind"], "supplement");
    }
}
