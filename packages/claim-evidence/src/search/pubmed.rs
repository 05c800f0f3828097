//! PubMed backend over the NCBI E-utilities JSON API.
//!
//! Two endpoints are used: `esearch` resolves a query to PMIDs and
//! `esummary` returns title, journal and publication date for a batch of
//! PMIDs. Request pacing lives in the search client, not here.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::error::{SearchError, SearchResult};
use crate::security::EutilsCredentials;
use crate::traits::search::SearchBackend;
use crate::types::{config::SearchConfig, reference::Reference};

pub const DEFAULT_EUTILS_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

const DATABASE: &str = "pubmed";

/// NCBI E-utilities client for the PubMed database.
#[derive(Debug, Clone)]
pub struct PubMedBackend {
    client: Client,
    base_url: String,
    credentials: EutilsCredentials,
}

impl PubMedBackend {
    /// Backend with the default 10s request timeout.
    pub fn new() -> SearchResult<Self> {
        Self::from_config(&SearchConfig::default())
    }

    pub fn from_config(config: &SearchConfig) -> SearchResult<Self> {
        Self::with_timeout(config.request_timeout)
    }

    pub fn with_timeout(timeout: Duration) -> SearchResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(SearchError::Network)?;

        Ok(Self {
            client,
            base_url: DEFAULT_EUTILS_URL.to_string(),
            credentials: EutilsCredentials::default(),
        })
    }

    /// Point at a different E-utilities host (mirrors, local fakes).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_credentials(mut self, credentials: EutilsCredentials) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> SearchResult<T> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let response = self
            .client
            .get(&url)
            .query(&[("db", DATABASE), ("retmode", "json")])
            .query(params)
            .query(&self.credentials.query_params())
            .send()
            .await
            .map_err(SearchError::Network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Api {
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(SearchError::Network)?;
        serde_json::from_str(&body).map_err(|e| SearchError::Decode(e.to_string()))
    }
}

#[async_trait]
impl SearchBackend for PubMedBackend {
    async fn resolve_ids(&self, query: &str, max: usize) -> SearchResult<Vec<String>> {
        let body: Value = self
            .get_json(
                "esearch.fcgi",
                &[("term", query.to_string()), ("retmax", max.to_string())],
            )
            .await?;

        let ids = decode_id_list(&body)?;
        debug!(query, ids = ids.len(), "esearch complete");
        Ok(ids)
    }

    async fn fetch_summaries(&self, ids: &[String]) -> SearchResult<Vec<Reference>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let body: Value = self
            .get_json("esummary.fcgi", &[("id", ids.join(","))])
            .await?;

        Ok(references_from_summary(ids, &body))
    }
}

/// Pull the ordered PMID list out of an `esearch` response.
///
/// A response without `esearchresult` is an error (NCBI reports failures
/// that way with a 200 status). A missing `idlist` means no matches.
pub fn decode_id_list(body: &Value) -> SearchResult<Vec<String>> {
    let result = body.get("esearchresult").ok_or_else(|| {
        let reason = body
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("missing esearchresult");
        SearchError::Decode(reason.to_string())
    })?;

    let ids = result
        .get("idlist")
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .filter_map(|id| match id {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(ids)
}

/// Build references for `ids` from an `esummary` response, in `ids` order.
///
/// An id the summary does not cover still yields a reference, with empty
/// metadata.
pub fn references_from_summary(ids: &[String], body: &Value) -> Vec<Reference> {
    let result = body.get("result");

    ids.iter()
        .map(|id| {
            let entry = result.and_then(|r| r.get(id.as_str()));
            let field = |name: &str| {
                entry
                    .and_then(|e| e.get(name))
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string()
            };

            Reference {
                id: id.clone(),
                title: field("title"),
                venue: field("fulljournalname"),
                publication_date: field("pubdate"),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_id_list() {
        let body = json!({
            "header": {"type": "esearch"},
            "esearchresult": {"count": "2", "retmax": "2", "idlist": ["31234567", "29876543"]}
        });
        assert_eq!(decode_id_list(&body).unwrap(), vec!["31234567", "29876543"]);
    }

    #[test]
    fn test_decode_empty_id_list() {
        let body = json!({"esearchresult": {"count": "0", "idlist": []}});
        assert!(decode_id_list(&body).unwrap().is_empty());

        let body = json!({"esearchresult": {"count": "0"}});
        assert!(decode_id_list(&body).unwrap().is_empty());
    }

    #[test]
    fn test_decode_error_body() {
        let body = json!({"error": "API rate limit exceeded"});
        match decode_id_list(&body) {
            Err(SearchError::Decode(reason)) => assert_eq!(reason, "API rate limit exceeded"),
            other => panic!("expected decode error, got {:?}", other),
        }
    }

    #[test]
    fn test_references_follow_id_order() {
        let body = json!({
            "result": {
                "uids": ["1", "2"],
                "1": {
                    "title": "Rapamycin extends lifespan",
                    "fulljournalname": "Nature",
                    "pubdate": "2009 Jul 16"
                },
                "2": {"title": "mTOR and aging", "fulljournalname": "Cell", "pubdate": "2013"}
            }
        });
        let ids = vec!["2".to_string(), "1".to_string()];

        let refs = references_from_summary(&ids, &body);

        assert_eq!(
            refs,
            vec![
                Reference::new("2", "mTOR and aging", "Cell", "2013"),
                Reference::new("1", "Rapamycin extends lifespan", "Nature", "2009 Jul 16"),
            ]
        );
    }

    #[test]
    fn test_missing_summary_entry_yields_empty_fields() {
        let body = json!({"result": {"uids": ["1"], "1": {"title": "Only title"}}});
        let ids = vec!["1".to_string(), "404".to_string()];

        let refs = references_from_summary(&ids, &body);

        assert_eq!(refs[0], Reference::new("1", "Only title", "", ""));
        assert_eq!(refs[1], Reference::bare("404"));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let backend = PubMedBackend::new()
            .unwrap()
            .with_base_url("http://localhost:9999/eutils/");
        assert_eq!(backend.base_url(), "http://localhost:9999/eutils");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let backend = PubMedBackend::with_timeout(Duration::from_millis(500))
            .unwrap()
            .with_base_url("http://127.0.0.1:1");

        match backend.resolve_ids("rapamycin", 5).await {
            Err(SearchError::Network(_)) => {}
            other => panic!("expected network error, got {:?}", other),
        }
    }
}
