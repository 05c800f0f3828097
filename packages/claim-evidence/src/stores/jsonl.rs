//! JSON Lines result store.

use async_trait::async_trait;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::StoreResult;
use crate::traits::store::ResultStore;
use crate::types::record::ResultTable;

use super::{blocking, ensure_parent_dir};

/// Whether `persist` replaces the file or adds to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Replace the file with this run's table
    Truncate,
    /// Append rows to an existing history file
    Append,
}

/// Writes one flat JSON object per result row.
#[derive(Debug, Clone)]
pub struct JsonlStore {
    path: PathBuf,
    mode: WriteMode,
}

impl JsonlStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            mode: WriteMode::Truncate,
        }
    }

    /// Store that appends to a long-lived history file.
    pub fn appending(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            mode: WriteMode::Append,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ResultStore for JsonlStore {
    async fn persist(&self, table: &ResultTable) -> StoreResult<()> {
        let path = self.path.clone();
        let mode = self.mode;
        let rows = table.rows();
        let count = rows.len();

        blocking(move || {
            ensure_parent_dir(&path)?;
            let file = match mode {
                WriteMode::Truncate => OpenOptions::new()
                    .write(true)
                    .create(true)
                    .truncate(true)
                    .open(&path)?,
                WriteMode::Append => OpenOptions::new().append(true).create(true).open(&path)?,
            };

            let mut writer = BufWriter::new(file);
            for row in &rows {
                serde_json::to_writer(&mut writer, row)?;
                writer.write_all(b"\n")?;
            }
            writer.flush()?;
            Ok(())
        })
        .await?;

        debug!(path = %self.path.display(), rows = count, ?mode, "wrote JSONL results");
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
        verdict::Verdict,
    };
    use chrono::Utc;

    fn table(item_id: &str) -> ResultTable {
        let item = RawItem::new(item_id, "t", "b", Utc::now());
        let mut table = ResultTable::new();
        let claim = Claim::new("c", "metformin");
        table.push(ResultRecord::new(&item, claim, Verdict::unparseable(), &[]));
        table
    }

    fn read_rows(path: &Path) -> Vec<ResultRow> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_truncate_mode_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("claims.jsonl");
        let store = JsonlStore::new(&path);

        store.persist(&table("a")).await.unwrap();
        store.persist(&table("b")).await.unwrap();

        let rows = read_rows(&path);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].item_id, "b");
    }

    #[tokio::test]
    async fn test_append_mode_accumulates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("manual_analyses.jsonl");
        let store = JsonlStore::appending(&path);

        store.persist(&table("a")).await.unwrap();
        store.persist(&table("b")).await.unwrap();

        let ids: Vec<_> = read_rows(&path).into_iter().map(|r| r.item_id).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_rows_match_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("claims.jsonl");
        let table = table("a");

        JsonlStore::new(&path).persist(&table).await.unwrap();

        assert_eq!(read_rows(&path), table.rows());
    }
}
