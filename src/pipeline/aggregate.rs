use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinSet;
use tracing::Instrument;

use crate::collectors::JobCollector;
use crate::error::AdapterError;
use crate::models::listing::{Listing, RawListing, SourceName};
use crate::pipeline::normalize::normalize;

/// Fans out to every collector, fans the survivors back in.
pub struct Aggregator {
    collectors: Vec<Arc<dyn JobCollector>>,
    fetch_timeout: Duration,
}

#[derive(Debug, Default)]
pub struct AggregationResult {
    /// Valid listings in collector completion order. The same url may appear
    /// more than once; the persistence gateway collapses repeats.
    pub listings: Vec<Listing>,
    /// Source name -> why that collector produced nothing.
    pub source_errors: BTreeMap<String, String>,
    /// Raw listings dropped by validation.
    pub rejected: usize,
}

impl Aggregator {
    pub fn new(collectors: Vec<Arc<dyn JobCollector>>, fetch_timeout: Duration) -> Self {
        Self {
            collectors,
            fetch_timeout,
        }
    }

    pub fn sources(&self) -> Vec<SourceName> {
        self.collectors.iter().map(|c| c.source()).collect()
    }

    /// Run every collector concurrently. Never fails: a collector that errors,
    /// panics or misses its deadline contributes nothing and is recorded in
    /// `source_errors`, while the others run to completion.
    pub async fn run(&self) -> AggregationResult {
        let mut tasks = JoinSet::new();
        let mut task_sources = HashMap::new();

        for collector in &self.collectors {
            let collector = Arc::clone(collector);
            let source = collector.source();
            let deadline = self.fetch_timeout;
            let handle = tasks.spawn(
                async move { fetch_with_deadline(collector.as_ref(), deadline).await }
                    .instrument(tracing::info_span!("collector", %source)),
            );
            task_sources.insert(handle.id(), source);
        }

        let now = Utc::now();
        let mut result = AggregationResult::default();

        while let Some(joined) = tasks.join_next_with_id().await {
            let (id, fetched) = match joined {
                Ok((id, fetched)) => (id, fetched),
                Err(e) => (e.id(), Err(AdapterError::Task(e.to_string()))),
            };
            let Some(source) = task_sources.remove(&id) else {
                tracing::error!("Finished collector task {id} has no source");
                continue;
            };

            let raw = match fetched {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::warn!(%source, "Collector failed: {e}");
                    result.source_errors.insert(source.to_string(), e.to_string());
                    continue;
                }
            };

            let found = raw.len();
            let mut kept = 0;
            for listing in raw {
                let Some(listing) = normalize(listing, now) else {
                    tracing::debug!(%source, "Dropping incomplete listing");
                    result.rejected += 1;
                    continue;
                };
                kept += 1;
                result.listings.push(listing);
            }
            tracing::info!(%source, found, kept, "Collector finished");
        }

        result
    }
}

async fn fetch_with_deadline(
    collector: &dyn JobCollector,
    deadline: Duration,
) -> Result<Vec<RawListing>, AdapterError> {
    match tokio::time::timeout(deadline, collector.collect()).await {
        Ok(fetched) => fetched,
        Err(_) => Err(AdapterError::Timeout(deadline)),
    }
}
