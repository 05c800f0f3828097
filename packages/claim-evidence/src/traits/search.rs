//! Literature search backend trait.
//!
//! The backend speaks a two-step protocol: a query resolves to an ordered
//! list of record ids, then one batched call fetches summary metadata for
//! exactly those ids. Pacing and failure degradation are not the backend's
//! concern; [`crate::search::LiteratureSearchClient`] owns both.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::SearchResult;
use crate::types::reference::Reference;

#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Resolve a query to at most `max` record ids, in relevance order.
    async fn resolve_ids(&self, query: &str, max: usize) -> SearchResult<Vec<String>>;

    /// Fetch summary metadata for `ids` in a single request.
    ///
    /// The returned references follow the order of `ids`.
    async fn fetch_summaries(&self, ids: &[String]) -> SearchResult<Vec<Reference>>;
}

#[async_trait]
impl<T: SearchBackend + ?Sized> SearchBackend for Arc<T> {
    async fn resolve_ids(&self, query: &str, max: usize) -> SearchResult<Vec<String>> {
        (**self).resolve_ids(query, max).await
    }

    async fn fetch_summaries(&self, ids: &[String]) -> SearchResult<Vec<Reference>> {
        (**self).fetch_summaries(ids).await
    }
}
