//! Testing utilities including mock implementations.
//!
//! These let the pipeline run end to end without a model server or network
//! access. Both mocks record every call for assertions.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Instant;

use crate::error::{CompletionError, CompletionResult, SearchError, SearchResult};
use crate::traits::{completion::CompletionService, search::SearchBackend};
use crate::types::reference::Reference;

/// Marker present only in claim-extraction prompts.
const EXTRACT_MARKER: &str = "TEXT:";

/// Marker present only in evaluation prompts.
const EVALUATE_MARKER: &str = "RELATED SCIENTIFIC PAPERS:";

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Fail(String),
    Panic(String),
}

/// A mock completion service.
///
/// Prompts are routed by substring: the first registered route whose
/// substring appears in the prompt decides the reply. Unmatched prompts get
/// the default response (`[]` unless overridden).
#[derive(Clone)]
pub struct MockCompletion {
    routes: Arc<RwLock<Vec<(String, MockReply)>>>,
    default_response: Arc<RwLock<String>>,
    calls: Arc<RwLock<Vec<MockCompletionCall>>>,
}

/// Record of a call made to the mock completion service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCompletionCall {
    pub prompt: String,
    pub model: String,
}

impl Default for MockCompletion {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCompletion {
    pub fn new() -> Self {
        Self {
            routes: Arc::new(RwLock::new(Vec::new())),
            default_response: Arc::new(RwLock::new("[]".to_string())),
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Reply for prompts matching no route.
    pub fn with_default_response(self, response: impl Into<String>) -> Self {
        *self.default_response.write().unwrap() = response.into();
        self
    }

    /// Reply with `response` to prompts containing `substring`.
    pub fn with_response(self, substring: impl Into<String>, response: impl Into<String>) -> Self {
        self.route(substring, MockReply::Text(response.into()))
    }

    /// Reply to every claim-extraction prompt not matched by an earlier route.
    pub fn with_extraction_response(self, response: impl Into<String>) -> Self {
        self.with_response(EXTRACT_MARKER, response)
    }

    /// Reply to every evaluation prompt not matched by an earlier route.
    pub fn with_evaluation_response(self, response: impl Into<String>) -> Self {
        self.with_response(EVALUATE_MARKER, response)
    }

    /// Fail prompts containing `substring` with a network error.
    pub fn failing_on(self, substring: impl Into<String>, message: impl Into<String>) -> Self {
        self.route(substring, MockReply::Fail(message.into()))
    }

    /// Panic on prompts containing `substring`.
    pub fn panicking_on(self, substring: impl Into<String>, message: impl Into<String>) -> Self {
        self.route(substring, MockReply::Panic(message.into()))
    }

    fn route(self, substring: impl Into<String>, reply: MockReply) -> Self {
        self.routes.write().unwrap().push((substring.into(), reply));
        self
    }

    /// Get all calls made to this mock.
    pub fn calls(&self) -> Vec<MockCompletionCall> {
        self.calls.read().unwrap().clone()
    }

    /// Calls whose prompt was a claim-extraction prompt.
    pub fn extraction_calls(&self) -> Vec<MockCompletionCall> {
        self.calls_with(EXTRACT_MARKER)
    }

    /// Calls whose prompt was an evaluation prompt.
    pub fn evaluation_calls(&self) -> Vec<MockCompletionCall> {
        self.calls_with(EVALUATE_MARKER)
    }

    fn calls_with(&self, marker: &str) -> Vec<MockCompletionCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.prompt.contains(marker))
            .collect()
    }

    /// Forget recorded calls, keeping routes.
    pub fn clear_calls(&self) {
        self.calls.write().unwrap().clear();
    }

    fn reply_for(&self, prompt: &str) -> MockReply {
        self.routes
            .read()
            .unwrap()
            .iter()
            .find(|(substring, _)| prompt.contains(substring.as_str()))
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| MockReply::Text(self.default_response.read().unwrap().clone()))
    }
}

#[async_trait]
impl CompletionService for MockCompletion {
    async fn complete(&self, prompt: &str, model: &str) -> CompletionResult<String> {
        self.calls.write().unwrap().push(MockCompletionCall {
            prompt: prompt.to_string(),
            model: model.to_string(),
        });

        match self.reply_for(prompt) {
            MockReply::Text(text) => Ok(text),
            MockReply::Fail(message) => Err(CompletionError::Network(message)),
            MockReply::Panic(message) => panic!("{}", message),
        }
    }
}

/// Which backend operation a [`SearchCall`] was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchCallKind {
    ResolveIds,
    FetchSummaries,
}

/// Record of a call made to the mock search backend.
#[derive(Debug, Clone)]
pub struct SearchCall {
    pub kind: SearchCallKind,
    /// The query for `ResolveIds`, the comma-joined ids for `FetchSummaries`
    pub argument: String,
    pub at: Instant,
}

/// A mock literature backend.
///
/// Queries resolve to the ids of the first registered substring they
/// contain, or to the default ids (none unless set). Summaries come from
/// registered references; unknown ids come back as bare references.
#[derive(Clone, Default)]
pub struct MockSearchBackend {
    ids: Arc<RwLock<Vec<(String, Vec<String>)>>>,
    default_ids: Arc<RwLock<Vec<String>>>,
    references: Arc<RwLock<HashMap<String, Reference>>>,
    failing_queries: Arc<RwLock<Vec<String>>>,
    panicking_queries: Arc<RwLock<Vec<(String, String)>>>,
    fail_resolve: Arc<RwLock<bool>>,
    fail_fetch: Arc<RwLock<bool>>,
    calls: Arc<RwLock<Vec<SearchCall>>>,
}

impl MockSearchBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve queries containing `substring` to `ids`.
    pub fn with_ids(self, substring: impl Into<String>, ids: &[&str]) -> Self {
        let ids: Vec<String> = ids.iter().map(|s| s.to_string()).collect();
        self.ids.write().unwrap().push((substring.into(), ids));
        self
    }

    /// Resolve queries matching no registered substring to `ids`.
    pub fn with_default_ids(self, ids: &[&str]) -> Self {
        *self.default_ids.write().unwrap() = ids.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_reference(self, reference: Reference) -> Self {
        self.references
            .write()
            .unwrap()
            .insert(reference.id.clone(), reference);
        self
    }

    /// Fail every id lookup.
    pub fn failing_resolve(self) -> Self {
        *self.fail_resolve.write().unwrap() = true;
        self
    }

    /// Fail id lookups for queries containing `substring`.
    pub fn failing_resolve_on(self, substring: impl Into<String>) -> Self {
        self.failing_queries.write().unwrap().push(substring.into());
        self
    }

    /// Panic with `message` on id lookups for queries containing `substring`.
    pub fn panicking_resolve_on(
        self,
        substring: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.panicking_queries
            .write()
            .unwrap()
            .push((substring.into(), message.into()));
        self
    }

    /// Fail every summary fetch.
    pub fn failing_fetch(self) -> Self {
        *self.fail_fetch.write().unwrap() = true;
        self
    }

    pub fn calls(&self) -> Vec<SearchCall> {
        self.calls.read().unwrap().clone()
    }

    pub fn calls_of(&self, kind: SearchCallKind) -> Vec<SearchCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.kind == kind)
            .collect()
    }

    fn record(&self, kind: SearchCallKind, argument: String) {
        self.calls.write().unwrap().push(SearchCall {
            kind,
            argument,
            at: Instant::now(),
        });
    }
}

#[async_trait]
impl SearchBackend for MockSearchBackend {
    // Ignores `max` so tests can check that the client truncates on its own.
    async fn resolve_ids(&self, query: &str, _max: usize) -> SearchResult<Vec<String>> {
        self.record(SearchCallKind::ResolveIds, query.to_string());

        let panic_message = self
            .panicking_queries
            .read()
            .unwrap()
            .iter()
            .find(|(substring, _)| query.contains(substring.as_str()))
            .map(|(_, message)| message.clone());
        if let Some(message) = panic_message {
            panic!("{}", message);
        }

        let failing = *self.fail_resolve.read().unwrap()
            || self
                .failing_queries
                .read()
                .unwrap()
                .iter()
                .any(|s| query.contains(s.as_str()));
        if failing {
            return Err(SearchError::Api { status: 503 });
        }

        let ids = self
            .ids
            .read()
            .unwrap()
            .iter()
            .find(|(substring, _)| query.contains(substring.as_str()))
            .map(|(_, ids)| ids.clone())
            .unwrap_or_else(|| self.default_ids.read().unwrap().clone());

        Ok(ids)
    }

    async fn fetch_summaries(&self, ids: &[String]) -> SearchResult<Vec<Reference>> {
        self.record(SearchCallKind::FetchSummaries, ids.join(","));

        if *self.fail_fetch.read().unwrap() {
            return Err(SearchError::Decode("mock summary failure".into()));
        }

        let references = self.references.read().unwrap();
        Ok(ids
            .iter()
            .map(|id| {
                references
                    .get(id)
                    .cloned()
                    .unwrap_or_else(|| Reference::bare(id.clone()))
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_routes_checked_in_order() {
        let mock = MockCompletion::new()
            .with_response("special", "A")
            .with_extraction_response("B")
            .with_default_response("C");

        assert_eq!(mock.complete("TEXT: special", "m").await.unwrap(), "A");
        assert_eq!(mock.complete("TEXT: plain", "m").await.unwrap(), "B");
        assert_eq!(mock.complete("other", "m").await.unwrap(), "C");
        assert_eq!(mock.calls().len(), 3);
        assert_eq!(mock.extraction_calls().len(), 2);
    }

    #[tokio::test]
    async fn test_failure_route() {
        let mock = MockCompletion::new().failing_on("boom", "refused");
        assert!(matches!(
            mock.complete("boom", "m").await,
            Err(CompletionError::Network(msg)) if msg == "refused"
        ));
    }

    #[tokio::test]
    async fn test_search_mock_records_calls() {
        let mock = MockSearchBackend::new().with_default_ids(&["9"]);

        let ids = mock.resolve_ids("q", 5).await.unwrap();
        let refs = mock.fetch_summaries(&ids).await.unwrap();

        assert_eq!(refs, vec![Reference::bare("9")]);
        assert_eq!(mock.calls_of(SearchCallKind::ResolveIds).len(), 1);
        assert_eq!(
            mock.calls_of(SearchCallKind::FetchSummaries)[0].argument,
            "9"
        );
    }

    #[tokio::test]
    async fn test_clear_calls_keeps_routes() {
        let mock = MockCompletion::new().with_response("hello", "world");
        mock.complete("hello", "m").await.unwrap();

        mock.clear_calls();

        assert!(mock.calls().is_empty());
        assert_eq!(mock.complete("hello", "m").await.unwrap(), "world");
    }

    #[tokio::test]
    async fn test_search_failure_routes() {
        let mock = MockSearchBackend::new()
            .with_default_ids(&["1"])
            .failing_resolve_on("metformin");

        assert!(matches!(
            mock.resolve_ids("metformin aging", 5).await,
            Err(SearchError::Api { status: 503 })
        ));
        assert_eq!(mock.resolve_ids("NAD+", 5).await.unwrap(), vec!["1"]);
    }

    #[tokio::test]
    #[should_panic(expected = "index offline")]
    async fn test_search_panic_route() {
        let mock = MockSearchBackend::new().panicking_resolve_on("rapamycin", "index offline");
        let _ = mock.resolve_ids("rapamycin longevity", 5).await;
    }
}
