//! Evidence verdicts.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::claim::normalize_label;

/// Explanation recorded when the synthesizer output could not be parsed.
pub const UNPARSEABLE_EXPLANATION: &str = "could not parse evaluation";

/// Categorical strength of literature support for a claim.
///
/// The first five are genuine verdicts from the synthesizer. `Unknown`
/// marks an unusable synthesis response and `Error` marks a claim whose
/// processing failed outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceLevel {
    StrongSupport,
    ModerateSupport,
    WeakSupport,
    Mixed,
    NoClearSupport,
    Unknown,
    Error,
}

impl EvidenceLevel {
    /// Levels a synthesis response may legitimately assign.
    pub const GENUINE: [EvidenceLevel; 5] = [
        Self::StrongSupport,
        Self::ModerateSupport,
        Self::WeakSupport,
        Self::Mixed,
        Self::NoClearSupport,
    ];

    pub const ALL: [EvidenceLevel; 7] = [
        Self::StrongSupport,
        Self::ModerateSupport,
        Self::WeakSupport,
        Self::Mixed,
        Self::NoClearSupport,
        Self::Unknown,
        Self::Error,
    ];

    /// Match a model-produced label against the genuine levels.
    ///
    /// `error` is never accepted from a model; it is reserved for the
    /// orchestrator.
    pub fn from_label(label: &str) -> Option<Self> {
        match normalize_label(label).as_str() {
            "strong_support" => Some(Self::StrongSupport),
            "moderate_support" => Some(Self::ModerateSupport),
            "weak_support" => Some(Self::WeakSupport),
            "mixed" => Some(Self::Mixed),
            "no_clear_support" => Some(Self::NoClearSupport),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StrongSupport => "strong_support",
            Self::ModerateSupport => "moderate_support",
            Self::WeakSupport => "weak_support",
            Self::Mixed => "mixed",
            Self::NoClearSupport => "no_clear_support",
            Self::Unknown => "unknown",
            Self::Error => "error",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }
}

impl fmt::Display for EvidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Evidence level plus a short human-readable justification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub evidence_level: EvidenceLevel,
    pub explanation: String,
}

impl Verdict {
    pub fn new(evidence_level: EvidenceLevel, explanation: impl Into<String>) -> Self {
        Self {
            evidence_level,
            explanation: explanation.into(),
        }
    }

    /// Verdict for a synthesis response that could not be parsed.
    pub fn unparseable() -> Self {
        Self::new(EvidenceLevel::Unknown, UNPARSEABLE_EXPLANATION)
    }

    /// Verdict for a claim whose processing failed.
    pub fn error(cause: impl fmt::Display) -> Self {
        Self::new(EvidenceLevel::Error, cause.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_label_accepts_spacing_variants() {
        assert_eq!(
            EvidenceLevel::from_label("Moderate Support"),
            Some(EvidenceLevel::ModerateSupport)
        );
        assert_eq!(
            EvidenceLevel::from_label("no-clear-support"),
            Some(EvidenceLevel::NoClearSupport)
        );
    }

    #[test]
    fn test_error_label_is_reserved() {
        assert_eq!(EvidenceLevel::from_label("error"), None);
        assert_eq!(EvidenceLevel::from_label("definitely true"), None);
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&EvidenceLevel::NoClearSupport).unwrap();
        assert_eq!(json, "\"no_clear_support\"");
    }

    #[test]
    fn test_unparseable_verdict() {
        let v = Verdict::unparseable();
        assert_eq!(v.evidence_level, EvidenceLevel::Unknown);
        assert_eq!(v.explanation, "could not parse evaluation");
    }
}
