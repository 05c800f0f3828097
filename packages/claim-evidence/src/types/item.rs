//! Raw community text items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single post as collected from a community feed.
///
/// Immutable once collected. The field aliases accept the column names
/// used by the feed exporter (`selftext`, `score`, `num_comments`,
/// `created_utc`), so exported files load without a mapping step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawItem {
    /// Externally assigned, unique identifier
    pub id: String,

    #[serde(default)]
    pub title: String,

    #[serde(default, alias = "selftext")]
    pub body: String,

    /// Community score (upvotes) at collection time
    #[serde(default, alias = "score")]
    pub source_score: u64,

    #[serde(default, alias = "num_comments")]
    pub comment_count: u64,

    #[serde(alias = "created_utc")]
    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub author: String,
}

impl RawItem {
    /// Create an item with zero score and comments.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            body: body.into(),
            source_score: 0,
            comment_count: 0,
            created_at,
            author: String::new(),
        }
    }

    pub fn with_score(mut self, score: u64) -> Self {
        self.source_score = score;
        self
    }

    pub fn with_comments(mut self, count: u64) -> Self {
        self.comment_count = count;
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }
}
