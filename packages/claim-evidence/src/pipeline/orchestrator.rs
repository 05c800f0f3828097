//! The pipeline orchestrator.
//!
//! Per item: normalize, extract claims, then for each claim build a query,
//! search, and synthesize a verdict. Failures are isolated per claim (and
//! per item for extraction) and surface as values in [`RunReport`], never
//! as an aborted batch. The accumulated [`ResultTable`] is passed in and
//! handed back; persistence happens once, after every item is processed.

use futures::{stream, FutureExt, StreamExt};
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::error::{PipelineError, Result};
use crate::search::LiteratureSearchClient;
use crate::traits::{completion::CompletionService, search::SearchBackend, store::ResultStore};
use crate::types::{
    claim::Claim,
    config::PipelineConfig,
    item::RawItem,
    outcome::{ClaimOutcome, ClaimStage, ItemOutcome, RunReport},
    record::{ResultRecord, ResultTable},
    reference::Reference,
};

use super::extract::extract_claims_from_text;
use super::normalize::normalize;
use super::query::build_query;
use super::synthesize::synthesize_verdict;

/// Everything produced for one claim.
#[derive(Debug, Clone)]
pub struct ClaimEvaluation {
    pub record: ResultRecord,
    pub outcome: ClaimOutcome,
    /// References the verdict was based on (empty for errored claims)
    pub references: Vec<Reference>,
}

/// Everything produced for one item.
#[derive(Debug, Clone)]
pub struct ItemAnalysis {
    pub outcome: ItemOutcome,
    pub claims: Vec<ClaimEvaluation>,
}

impl ItemAnalysis {
    pub fn records(&self) -> impl Iterator<Item = &ResultRecord> {
        self.claims.iter().map(|c| &c.record)
    }

    pub fn into_records(self) -> impl Iterator<Item = ResultRecord> {
        self.claims.into_iter().map(|c| c.record)
    }
}

/// The claim evidence verification pipeline.
///
/// # Example
///
/// ```rust,ignore
/// let search = LiteratureSearchClient::new(PubMedBackend::new()?, RequestPacer::default());
/// let pipeline = Pipeline::new(OllamaClient::new(timeout)?, search, PipelineConfig::default());
///
/// let (table, report) = pipeline.run(&items, ResultTable::new(), &store).await?;
/// ```
pub struct Pipeline<C: CompletionService, B: SearchBackend> {
    completion: C,
    search: LiteratureSearchClient<B>,
    config: PipelineConfig,
}

impl<C: CompletionService, B: SearchBackend> Pipeline<C, B> {
    pub fn new(completion: C, search: LiteratureSearchClient<B>, config: PipelineConfig) -> Self {
        Self {
            completion,
            search,
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn completion(&self) -> &C {
        &self.completion
    }

    pub fn search(&self) -> &LiteratureSearchClient<B> {
        &self.search
    }

    /// Process a batch, then persist the resulting table to `store`.
    ///
    /// The table is persisted even when every claim errored. Only an empty
    /// batch or a persistence failure is returned as an error.
    pub async fn run<S: ResultStore + ?Sized>(
        &self,
        items: &[RawItem],
        table: ResultTable,
        store: &S,
    ) -> Result<(ResultTable, RunReport)> {
        let (table, report) = self.process(items, table).await?;

        store.persist(&table).await?;
        info!(records = table.len(), "results persisted");

        Ok((table, report))
    }

    /// Process a batch, appending records to `table` in input order.
    pub async fn process(
        &self,
        items: &[RawItem],
        mut table: ResultTable,
    ) -> Result<(ResultTable, RunReport)> {
        if items.is_empty() {
            return Err(PipelineError::NoInput);
        }

        let run_id = Uuid::now_v7();
        let span = info_span!("pipeline_run", %run_id, items = items.len());

        async {
            let total = items.len();
            let mut outcomes = Vec::with_capacity(total);
            let mut analyses = stream::iter(items)
                .map(|item| self.analyze_item(item))
                .buffered(self.config.concurrency.max(1));

            let mut processed = 0;
            while let Some(analysis) = analyses.next().await {
                processed += 1;
                info!(
                    item_id = %analysis.outcome.item_id(),
                    processed,
                    total,
                    "item processed"
                );
                outcomes.push(analysis.outcome.clone());
                table.extend(analysis.into_records());
            }

            let report = RunReport {
                items: outcomes,
                summary: table.summary(),
            };

            info!(
                records = table.len(),
                skipped = report.items_skipped(),
                claims_errored = report.claims_errored(),
                "pipeline run complete"
            );

            Ok((table, report))
        }
        .instrument(span)
        .await
    }

    /// Run one item through every stage. Never fails; see [`ItemOutcome`].
    pub async fn analyze_item(&self, item: &RawItem) -> ItemAnalysis {
        let text = match normalize(&item.title, &item.body, self.config.text_budget) {
            Ok(text) => text,
            Err(_) => {
                debug!(item_id = %item.id, "item has no text, skipping");
                return ItemAnalysis {
                    outcome: ItemOutcome::Skipped {
                        item_id: item.id.clone(),
                    },
                    claims: Vec::new(),
                };
            }
        };

        let extraction = extract_claims_from_text(&self.completion, &text, &self.config.model);
        let extracted = catch_panic(extraction).await;

        let claims = match extracted {
            Ok(Ok(claims)) => claims,
            Ok(Err(e)) => {
                warn!(item_id = %item.id, error = %e, "claim extraction failed");
                return failed(item, e.to_string());
            }
            Err(panic_msg) => {
                error!(item_id = %item.id, panic = %panic_msg, "claim extraction panicked");
                return failed(item, panic_msg);
            }
        };

        debug!(item_id = %item.id, claims = claims.len(), "claims extracted");

        let mut evaluations = Vec::with_capacity(claims.len());
        for (claim_index, claim) in claims.into_iter().enumerate() {
            evaluations.push(self.evaluate_claim(item, claim_index, claim).await);
        }

        ItemAnalysis {
            outcome: ItemOutcome::Processed {
                item_id: item.id.clone(),
                claims: evaluations.iter().map(|e| e.outcome.clone()).collect(),
            },
            claims: evaluations,
        }
    }

    /// Query, search, and synthesize for one extracted claim.
    async fn evaluate_claim(
        &self,
        item: &RawItem,
        claim_index: usize,
        claim: Claim,
    ) -> ClaimEvaluation {
        let query = build_query(&claim.text, &claim.topic);

        let search = self.search.search(&query, self.config.max_references);
        let references = match catch_panic(search).await {
            Ok(references) => references,
            Err(cause) => {
                return errored(item, claim_index, claim, ClaimStage::QueryBuilt, cause);
            }
        };

        debug!(
            item_id = %item.id,
            claim_index,
            query = %query,
            reference_count = references.len(),
            "references retrieved"
        );

        let synthesized = catch_panic(synthesize_verdict(
            &self.completion,
            &self.config.model,
            &claim.text,
            &claim.topic,
            &references,
        ))
        .await;

        let cause = match synthesized {
            Ok(Ok(verdict)) => {
                return ClaimEvaluation {
                    record: ResultRecord::new(item, claim, verdict, &references),
                    outcome: ClaimOutcome::Completed,
                    references,
                };
            }
            Ok(Err(e)) => e.to_string(),
            Err(panic_msg) => panic_msg,
        };

        errored(item, claim_index, claim, ClaimStage::Searched, cause)
    }
}

fn failed(item: &RawItem, cause: String) -> ItemAnalysis {
    ItemAnalysis {
        outcome: ItemOutcome::Failed {
            item_id: item.id.clone(),
            cause,
        },
        claims: Vec::new(),
    }
}

fn errored(
    item: &RawItem,
    claim_index: usize,
    claim: Claim,
    stage: ClaimStage,
    cause: String,
) -> ClaimEvaluation {
    warn!(item_id = %item.id, claim_index, %stage, error = %cause, "claim evaluation failed");

    ClaimEvaluation {
        record: ResultRecord::errored(item, claim, &cause),
        outcome: ClaimOutcome::Errored { stage, cause },
        references: Vec::new(),
    }
}

/// Await `fut`, turning a panic into its message.
async fn catch_panic<F: Future>(fut: F) -> std::result::Result<F::Output, String> {
    AssertUnwindSafe(fut)
        .catch_unwind()
        .await
        .map_err(|panic_info| extract_panic_message(&panic_info))
}

fn extract_panic_message(panic_info: &Box<dyn Any + Send>) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
