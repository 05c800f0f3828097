//! Literature references returned by the search backend.

use serde::{Deserialize, Serialize};

/// Placeholder handed to the synthesizer when a query found nothing.
pub const NO_RESULTS: &str = "No results found.";

/// A citation record from the literature database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// Literature-database identifier (a PMID for PubMed)
    pub id: String,
    pub title: String,
    /// Journal or other venue name
    pub venue: String,
    pub publication_date: String,
}

impl Reference {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        venue: impl Into<String>,
        publication_date: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            venue: venue.into(),
            publication_date: publication_date.into(),
        }
    }

    /// Reference known only by id (no summary metadata available).
    pub fn bare(id: impl Into<String>) -> Self {
        Self::new(id, "", "", "")
    }
}

/// Render references as the citation block used in evaluation prompts.
///
/// One line per reference, in the order given.
pub fn format_references(references: &[Reference]) -> String {
    if references.is_empty() {
        return NO_RESULTS.to_string();
    }

    references
        .iter()
        .map(|r| {
            format!(
                "- {} ({}, {}) [PMID: {}]",
                r.title, r.venue, r.publication_date, r.id
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
