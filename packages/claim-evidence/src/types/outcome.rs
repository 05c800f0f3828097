//! Per-item and per-claim outcomes of a pipeline run.
//!
//! The pipeline never aborts on a single item or claim. These types keep
//! each failure visible as a value instead.

use serde::Serialize;
use std::fmt;

use super::summary::EvidenceSummary;

/// Stage a claim had completed when processing stopped.
///
/// Only the search and synthesis calls can fail, so an errored claim always
/// stopped after building its query or after searching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStage {
    QueryBuilt,
    Searched,
}

impl fmt::Display for ClaimStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::QueryBuilt => "query_built",
            Self::Searched => "searched",
        };
        f.write_str(name)
    }
}

/// Terminal state of one claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ClaimOutcome {
    Completed,
    Errored {
        /// Last stage the claim completed before failing
        stage: ClaimStage,
        cause: String,
    },
}

impl ClaimOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }

    pub fn failed_stage(&self) -> Option<ClaimStage> {
        match self {
            Self::Completed => None,
            Self::Errored { stage, .. } => Some(*stage),
        }
    }
}

/// What happened to one input item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ItemOutcome {
    /// Title and body were empty; extraction was not attempted.
    Skipped { item_id: String },

    /// Claims were extracted (possibly zero) and each reached a terminal state.
    Processed {
        item_id: String,
        claims: Vec<ClaimOutcome>,
    },

    /// The extraction call itself failed; the item contributed no records.
    Failed { item_id: String, cause: String },
}

impl ItemOutcome {
    pub fn item_id(&self) -> &str {
        match self {
            Self::Skipped { item_id }
            | Self::Processed { item_id, .. }
            | Self::Failed { item_id, .. } => item_id,
        }
    }
}

/// Everything a run reports back besides the records themselves.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub items: Vec<ItemOutcome>,
    pub summary: EvidenceSummary,
}

impl RunReport {
    pub fn items_total(&self) -> usize {
        self.items.len()
    }

    pub fn items_skipped(&self) -> usize {
        self.items
            .iter()
            .filter(|o| matches!(o, ItemOutcome::Skipped { .. }))
            .count()
    }

    pub fn failed_items(&self) -> impl Iterator<Item = (&str, &str)> {
        self.items.iter().filter_map(|o| match o {
            ItemOutcome::Failed { item_id, cause } => Some((item_id.as_str(), cause.as_str())),
            _ => None,
        })
    }

    pub fn claims_errored(&self) -> usize {
        self.items
            .iter()
            .filter_map(|o| match o {
                ItemOutcome::Processed { claims, .. } => Some(claims),
                _ => None,
            })
            .flatten()
            .filter(|c| !c.is_completed())
            .count()
    }
}
