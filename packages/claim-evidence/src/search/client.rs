//! Paced, failure-tolerant literature search.

use tracing::{debug, warn};

use crate::traits::search::SearchBackend;
use crate::types::reference::Reference;

use super::pacer::RequestPacer;

/// Wraps a [`SearchBackend`] with request pacing and failure degradation.
///
/// `search` never fails: any backend error is logged and the claim proceeds
/// with an empty reference list.
pub struct LiteratureSearchClient<B: SearchBackend> {
    backend: B,
    pacer: RequestPacer,
}

impl<B: SearchBackend> LiteratureSearchClient<B> {
    pub fn new(backend: B, pacer: RequestPacer) -> Self {
        Self { backend, pacer }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn pacer(&self) -> &RequestPacer {
        &self.pacer
    }

    /// Find up to `max` references for `query`, in relevance order.
    pub async fn search(&self, query: &str, max: usize) -> Vec<Reference> {
        if max == 0 {
            return Vec::new();
        }

        self.pacer.wait().await;
        let mut ids = match self.backend.resolve_ids(query, max).await {
            Ok(ids) => ids,
            Err(e) => {
                warn!(error = %e, query, "literature id lookup failed");
                return Vec::new();
            }
        };

        if ids.is_empty() {
            debug!(query, "no literature matches");
            return Vec::new();
        }
        ids.truncate(max);

        self.pacer.wait().await;
        match self.backend.fetch_summaries(&ids).await {
            Ok(references) => {
                debug!(
                    query,
                    found = references.len(),
                    "literature search complete"
                );
                references
            }
            Err(e) => {
                warn!(error = %e, query, ids = ids.len(), "literature summary fetch failed");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockSearchBackend, SearchCallKind};
    use std::sync::Arc;
    use std::time::Duration;

    fn client<B: SearchBackend>(backend: B) -> LiteratureSearchClient<B> {
        LiteratureSearchClient::new(backend, RequestPacer::new(Duration::from_millis(10)))
    }

    #[tokio::test]
    async fn test_search_returns_references_in_id_order() {
        let backend = MockSearchBackend::new()
            .with_ids("rapamycin", &["2", "1"])
            .with_reference(Reference::new("1", "First", "Nature", "2020"))
            .with_reference(Reference::new("2", "Second", "Cell", "2021"));

        let refs = client(Arc::new(backend.clone()))
            .search("(rapamycin ...)", 5)
            .await;

        let ids: Vec<_> = refs.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
        assert_eq!(backend.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_id_list_skips_summary_call() {
        let backend = MockSearchBackend::new();

        let refs = client(backend.clone()).search("anything", 5).await;

        assert!(refs.is_empty());
        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].kind, SearchCallKind::ResolveIds);
    }

    #[tokio::test]
    async fn test_ids_truncated_to_max() {
        let backend = MockSearchBackend::new().with_ids("q", &["1", "2", "3", "4"]);

        let refs = client(backend.clone()).search("q", 2).await;

        assert_eq!(refs.len(), 2);
        let fetches = backend.calls_of(SearchCallKind::FetchSummaries);
        assert_eq!(fetches[0].argument, "1,2");
    }

    #[tokio::test]
    async fn test_zero_max_makes_no_calls() {
        let backend = MockSearchBackend::new().with_ids("q", &["1"]);

        assert!(client(backend.clone()).search("q", 0).await.is_empty());
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_resolve_failure_degrades_to_empty() {
        let backend = MockSearchBackend::new()
            .with_ids("q", &["1"])
            .failing_resolve();

        assert!(client(backend.clone()).search("q", 5).await.is_empty());
        assert_eq!(backend.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_summary_failure_degrades_to_empty() {
        let backend = MockSearchBackend::new()
            .with_ids("q", &["1"])
            .failing_fetch();

        assert!(client(backend.clone()).search("q", 5).await.is_empty());
        assert_eq!(backend.calls().len(), 2);
    }
}
