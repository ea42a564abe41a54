//! The ingestion run: collect from every source, validate, then upsert.

pub mod aggregate;
pub mod normalize;
pub mod persist;

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::Instrument;
use uuid::Uuid;

use crate::error::PipelineError;

pub use aggregate::{AggregationResult, Aggregator};
pub use persist::{PersistenceGateway, UpsertReport};

pub struct Pipeline {
    aggregator: Aggregator,
    gateway: PersistenceGateway,
}

/// Outcome of one ingestion run.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub run_id: Uuid,
    /// Listings persisted by this run.
    pub count: usize,
    pub inserted: usize,
    pub updated: usize,
    /// Valid listings that failed to persist.
    pub skipped: usize,
    pub rejected: usize,
    pub duplicates: usize,
    pub source_errors: BTreeMap<String, String>,
}

impl Pipeline {
    pub fn new(aggregator: Aggregator, gateway: PersistenceGateway) -> Self {
        Self {
            aggregator,
            gateway,
        }
    }

    pub fn gateway(&self) -> &PersistenceGateway {
        &self.gateway
    }

    /// Run one ingestion pass. Only an unreachable store fails the run;
    /// source and listing failures are reported in the summary.
    pub async fn run(&self) -> Result<RunSummary, PipelineError> {
        let run_id = Uuid::new_v4();
        async move {
            self.gateway
                .store()
                .ping()
                .await
                .map_err(|e| PipelineError::StoreUnavailable(e.to_string()))?;

            tracing::info!(sources = ?self.aggregator.sources(), "Starting scrape run");
            let aggregated = self.aggregator.run().await;
            let report = self.gateway.upsert(&aggregated.listings).await;

            let summary = RunSummary {
                run_id,
                count: report.persisted(),
                inserted: report.inserted,
                updated: report.updated,
                skipped: report.failures.len(),
                rejected: aggregated.rejected,
                duplicates: report.duplicates,
                source_errors: aggregated.source_errors,
            };
            tracing::info!(
                count = summary.count,
                failed_sources = summary.source_errors.len(),
                "Scrape run complete"
            );
            Ok(summary)
        }
        .instrument(tracing::info_span!("scrape_run", %run_id))
        .await
    }
}
