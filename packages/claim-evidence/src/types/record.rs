//! Result records and the accumulated result table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    claim::{Claim, ClaimKind, Direction, Target},
    item::RawItem,
    reference::Reference,
    summary::EvidenceSummary,
    verdict::{EvidenceLevel, Verdict},
};

/// One claim joined with its item metadata, verdict, and consulted references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRecord {
    pub item_id: String,
    pub created_at: DateTime<Utc>,
    pub item_score: u64,
    pub comment_count: u64,
    pub claim: Claim,
    pub verdict: Verdict,
    /// Ids of the references returned for this claim's query, in backend order
    pub reference_ids: Vec<String>,
}

impl ResultRecord {
    pub fn new(item: &RawItem, claim: Claim, verdict: Verdict, references: &[Reference]) -> Self {
        Self {
            item_id: item.id.clone(),
            created_at: item.created_at,
            item_score: item.source_score,
            comment_count: item.comment_count,
            claim,
            verdict,
            reference_ids: references.iter().map(|r| r.id.clone()).collect(),
        }
    }

    /// Record for a claim whose processing failed: `error` verdict, no references.
    pub fn errored(item: &RawItem, claim: Claim, cause: impl std::fmt::Display) -> Self {
        Self::new(item, claim, Verdict::error(cause), &[])
    }

    pub fn evidence_level(&self) -> EvidenceLevel {
        self.verdict.evidence_level
    }

    /// Flatten into the exported column set.
    pub fn to_row(&self) -> ResultRow {
        ResultRow {
            item_id: self.item_id.clone(),
            created_at: self.created_at,
            item_score: self.item_score,
            comment_count: self.comment_count,
            claim: self.claim.text.clone(),
            topic: self.claim.topic.clone(),
            kind: self.claim.kind,
            direction: self.claim.direction,
            target: self.claim.target,
            evidence_level: self.verdict.evidence_level,
            explanation: self.verdict.explanation.clone(),
            num_references: self.reference_ids.len(),
            reference_ids: self.reference_ids.join(","),
        }
    }
}

/// Flat, export-ready form of a [`ResultRecord`].
///
/// The column set is stable across runs; downstream consumers rely on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRow {
    pub item_id: String,
    pub created_at: DateTime<Utc>,
    pub item_score: u64,
    pub comment_count: u64,
    pub claim: String,
    pub topic: String,
    pub kind: ClaimKind,
    pub direction: Direction,
    pub target: Target,
    pub evidence_level: EvidenceLevel,
    pub explanation: String,
    pub num_references: usize,
    /// Comma-joined reference ids, order preserved
    pub reference_ids: String,
}

/// Column names of the exported table, in order.
pub const RESULT_COLUMNS: [&str; 13] = [
    "item_id",
    "created_at",
    "item_score",
    "comment_count",
    "claim",
    "topic",
    "kind",
    "direction",
    "target",
    "evidence_level",
    "explanation",
    "num_references",
    "reference_ids",
];

/// Append-only accumulator of result records for one run.
///
/// Passed into the orchestrator and handed back when the run finishes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultTable {
    records: Vec<ResultRecord>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: ResultRecord) {
        self.records.push(record);
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = ResultRecord>) {
        self.records.extend(records);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ResultRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ResultRecord> {
        self.records
    }

    pub fn rows(&self) -> Vec<ResultRow> {
        self.records.iter().map(ResultRecord::to_row).collect()
    }

    pub fn summary(&self) -> EvidenceSummary {
        EvidenceSummary::from_records(&self.records)
    }
}
