//! Literature query construction.

use tracing::trace;

/// Terms anchoring every query to the longevity literature.
pub const DOMAIN_ANCHOR_TERMS: &str = "longevity lifespan healthspan aging";

/// Study-quality filters, OR-ed together.
pub const QUALITY_FILTERS: [&str; 4] = [
    "randomized trial",
    "clinical trial",
    "meta-analysis",
    "systematic review",
];

/// Build the boolean search query for a claim.
///
/// Only the topic shapes the query; the claim text is logged for tracing
/// and otherwise ignored, since full sentences make poor search terms.
pub fn build_query(claim: &str, topic: &str) -> String {
    trace!(claim, topic, "building literature query");
    format!(
        "({} {}) AND ({})",
        topic,
        DOMAIN_ANCHOR_TERMS,
        QUALITY_FILTERS.join(" OR ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rapamycin_query() {
        assert_eq!(
            build_query("6mg weekly improved my skin", "rapamycin"),
            "(rapamycin longevity lifespan healthspan aging) AND \
             (randomized trial OR clinical trial OR meta-analysis OR systematic review)"
        );
    }

    #[test]
    fn test_claim_text_does_not_affect_query() {
        assert_eq!(build_query("a", "NAD+"), build_query("b", "NAD+"));
    }

    #[test]
    fn test_deterministic() {
        let first = build_query("x", "metformin");
        for _ in 0..10 {
            assert_eq!(build_query("x", "metformin"), first);
        }
    }
}
