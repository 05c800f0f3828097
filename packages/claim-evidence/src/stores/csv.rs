//! CSV result store.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::StoreResult;
use crate::traits::store::ResultStore;
use crate::types::record::{ResultTable, RESULT_COLUMNS};

use super::{blocking, ensure_parent_dir};

/// Writes the table to a CSV file, replacing any previous contents.
///
/// An empty table still produces a header row, so downstream readers always
/// see the full column set.
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ResultStore for CsvStore {
    async fn persist(&self, table: &ResultTable) -> StoreResult<()> {
        let path = self.path.clone();
        let rows = table.rows();
        let count = rows.len();

        blocking(move || {
            ensure_parent_dir(&path)?;
            let mut writer = csv::Writer::from_path(&path)?;

            if rows.is_empty() {
                writer.write_record(RESULT_COLUMNS)?;
            }
            for row in &rows {
                writer.serialize(row)?;
            }
            writer.flush()?;
            Ok(())
        })
        .await?;

        debug!(path = %self.path.display(), rows = count, "wrote CSV results");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        claim::Claim,
        item::RawItem,
        record::{ResultRecord, ResultRow},
        reference::Reference,
        verdict::{EvidenceLevel, Verdict},
    };
    use chrono::{TimeZone, Utc};

    fn table() -> ResultTable {
        let posted_at = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        let item = RawItem::new("p1", "t", "b", posted_at).with_score(100);
        let mut table = ResultTable::new();
        table.push(ResultRecord::new(
            &item,
            Claim::new("Rapamycin, weekly, improved skin", "rapamycin"),
            Verdict::new(
                EvidenceLevel::ModerateSupport,
                "Some \"human\" data,\nlimited.",
            ),
            &[Reference::bare("1"), Reference::bare("2")],
        ));
        table
    }

    #[tokio::test]
    async fn test_writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("processed").join("claims.csv");
        let table = table();

        CsvStore::new(&path).persist(&table).await.unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<&str> = reader.headers().unwrap().iter().collect();
        assert_eq!(headers, RESULT_COLUMNS);

        let rows: Vec<ResultRow> = reader.deserialize().collect::<Result<_, _>>().unwrap();
        assert_eq!(rows, table.rows());
        assert_eq!(rows[0].reference_ids, "1,2");
    }

    #[tokio::test]
    async fn test_empty_table_writes_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");

        let empty = ResultTable::new();
        CsvStore::new(&path).persist(&empty).await.unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.trim_end(), RESULT_COLUMNS.join(","));
    }

    #[tokio::test]
    async fn test_persist_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("claims.csv");
        let store = CsvStore::new(&path);

        store.persist(&table()).await.unwrap();
        store.persist(&table()).await.unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        assert_eq!(reader.records().count(), 1);
    }
}
