//! In-memory result store for testing and single-post analysis.

use async_trait::async_trait;
use std::sync::RwLock;

use crate::error::StoreResult;
use crate::traits::store::ResultStore;
use crate::types::record::ResultTable;

/// Keeps a snapshot of every table it is asked to persist.
///
/// Data is lost when the store is dropped.
#[derive(Default)]
pub struct MemoryStore {
    snapshots: RwLock<Vec<ResultTable>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times `persist` was called.
    pub fn persist_count(&self) -> usize {
        self.snapshots.read().unwrap().len()
    }

    /// The most recently persisted table.
    pub fn last(&self) -> Option<ResultTable> {
        self.snapshots.read().unwrap().last().cloned()
    }

    pub fn clear(&self) {
        self.snapshots.write().unwrap().clear();
    }
}

#[async_trait]
impl ResultStore for MemoryStore {
    async fn persist(&self, table: &ResultTable) -> StoreResult<()> {
        self.snapshots.write().unwrap().push(table.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_keeps_snapshots() {
        let store = MemoryStore::new();
        assert!(store.last().is_none());

        store.persist(&ResultTable::new()).await.unwrap();
        store.persist(&ResultTable::new()).await.unwrap();

        assert_eq!(store.persist_count(), 2);
        assert_eq!(store.last(), Some(ResultTable::new()));

        store.clear();
        assert_eq!(store.persist_count(), 0);
    }
}
