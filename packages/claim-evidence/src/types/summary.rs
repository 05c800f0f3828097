//! Summary statistics over accumulated results.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use super::{record::ResultRecord, verdict::EvidenceLevel};

/// Counts per evidence level and per topic.
///
/// `error` is counted like any other level but reported on its own so a
/// reviewer can read the partial-failure rate directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EvidenceSummary {
    pub total: usize,
    pub by_level: BTreeMap<EvidenceLevel, usize>,
    /// Topics ordered by descending frequency, ties broken alphabetically
    pub topics: Vec<(String, usize)>,
}

impl EvidenceSummary {
    pub fn from_records(records: &[ResultRecord]) -> Self {
        let mut by_level = BTreeMap::new();
        let mut topic_counts: HashMap<&str, usize> = HashMap::new();

        for record in records {
            *by_level.entry(record.evidence_level()).or_insert(0) += 1;
            *topic_counts.entry(record.claim.topic.as_str()).or_insert(0) += 1;
        }

        let mut topics: Vec<(String, usize)> = topic_counts
            .into_iter()
            .map(|(topic, count)| (topic.to_string(), count))
            .collect();
        topics.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        Self {
            total: records.len(),
            by_level,
            topics,
        }
    }

    pub fn count(&self, level: EvidenceLevel) -> usize {
        self.by_level.get(&level).copied().unwrap_or(0)
    }

    pub fn error_count(&self) -> usize {
        self.count(EvidenceLevel::Error)
    }

    /// Records with a genuine verdict (not `unknown`, not `error`).
    pub fn genuine_count(&self) -> usize {
        EvidenceLevel::GENUINE.iter().map(|l| self.count(*l)).sum()
    }

    /// Fraction of records tagged `error` (0.0 for an empty table).
    pub fn failure_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.error_count() as f64 / self.total as f64
        }
    }

    pub fn top_topics(&self, n: usize) -> &[(String, usize)] {
        &self.topics[..n.min(self.topics.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{claim::Claim, item::RawItem, verdict::Verdict};
    use chrono::Utc;

    fn record(topic: &str, level: EvidenceLevel) -> ResultRecord {
        let item = RawItem::new("p", "t", "b", Utc::now());
        ResultRecord::new(&item, Claim::new("c", topic), Verdict::new(level, ""), &[])
    }

    #[test]
    fn test_counts_errors_separately() {
        let records = vec![
            record("rapamycin", EvidenceLevel::ModerateSupport),
            record("rapamycin", EvidenceLevel::Error),
            record("nmn", EvidenceLevel::WeakSupport),
            record("nmn", EvidenceLevel::Unknown),
        ];
        let summary = EvidenceSummary::from_records(&records);

        assert_eq!(summary.total, 4);
        assert_eq!(summary.error_count(), 1);
        assert_eq!(summary.genuine_count(), 2);
        assert!((summary.failure_rate() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_topics_sorted_by_frequency_then_name() {
        let records = vec![
            record("nmn", EvidenceLevel::Mixed),
            record("fasting", EvidenceLevel::Mixed),
            record("rapamycin", EvidenceLevel::Mixed),
            record("rapamycin", EvidenceLevel::Mixed),
        ];
        let summary = EvidenceSummary::from_records(&records);
        assert_eq!(summary.topics[0], ("rapamycin".to_string(), 2));
        assert_eq!(summary.topics[1].0, "fasting");
        assert_eq!(summary.top_topics(10).len(), 3);
    }

    #[test]
    fn test_empty_summary() {
        let summary = EvidenceSummary::from_records(&[]);
        assert_eq!(summary.failure_rate(), 0.0);
        assert!(summary.top_topics(10).is_empty());
    }
}
