//! Result persistence trait.

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::types::record::ResultTable;

/// Durable destination for an accumulated result table.
///
/// Called once per run, after every item has been processed.
#[async_trait]
pub trait ResultStore: Send + Sync {
    async fn persist(&self, table: &ResultTable) -> StoreResult<()>;
}

#[async_trait]
impl<T: ResultStore + ?Sized> ResultStore for std::sync::Arc<T> {
    async fn persist(&self, table: &ResultTable) -> StoreResult<()> {
        (**self).persist(table).await
    }
}
