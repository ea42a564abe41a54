#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use jobharvest::collectors::JobCollector;
use jobharvest::error::AdapterError;
use jobharvest::models::listing::{RawListing, SourceName};
use jobharvest::pipeline::{Aggregator, PersistenceGateway, Pipeline};
use jobharvest::store::MemoryStore;

/// Collector returning a fixed batch.
pub struct FakeCollector {
    pub source: SourceName,
    pub listings: Vec<RawListing>,
}

#[async_trait]
impl JobCollector for FakeCollector {
    fn source(&self) -> SourceName {
        self.source
    }

    async fn collect(&self) -> Result<Vec<RawListing>, AdapterError> {
        Ok(self.listings.clone())
    }
}

/// Collector that answers only after `delay`, to fix completion order.
pub struct SlowCollector {
    pub inner: FakeCollector,
    pub delay: Duration,
}

#[async_trait]
impl JobCollector for SlowCollector {
    fn source(&self) -> SourceName {
        self.inner.source
    }

    async fn collect(&self) -> Result<Vec<RawListing>, AdapterError> {
        tokio::time::sleep(self.delay).await;
        self.inner.collect().await
    }
}

/// Collector whose provider is down.
pub struct DownCollector(pub SourceName);

#[async_trait]
impl JobCollector for DownCollector {
    fn source(&self) -> SourceName {
        self.0
    }

    async fn collect(&self) -> Result<Vec<RawListing>, AdapterError> {
        Err(AdapterError::Status(502))
    }
}

pub fn raw(source: SourceName, title: &str, url: &str) -> RawListing {
    RawListing::new(source, title, "Acme", url)
}

pub fn pipeline(store: &Arc<MemoryStore>, collectors: Vec<Arc<dyn JobCollector>>) -> Pipeline {
    Pipeline::new(
        Aggregator::new(collectors, Duration::from_secs(2)),
        PersistenceGateway::new(store.clone()),
    )
}

/// LinkedIn: 2, Naukri: 3 (one sharing a url with LinkedIn), Indeed: down.
pub fn three_sources() -> Vec<Arc<dyn JobCollector>> {
    three_sources_with_linkedin_delay(Duration::ZERO)
}

/// As [`three_sources`], with LinkedIn answering after `delay`.
pub fn three_sources_with_linkedin_delay(delay: Duration) -> Vec<Arc<dyn JobCollector>> {
    vec![
        Arc::new(SlowCollector {
            inner: FakeCollector {
                source: SourceName::LinkedIn,
                listings: vec![
                    raw(SourceName::LinkedIn, "Rust Engineer", "https://jobs.test/rust-engineer"),
                    raw(SourceName::LinkedIn, "SRE", "https://jobs.test/sre"),
                ],
            },
            delay,
        }),
        Arc::new(FakeCollector {
            source: SourceName::Naukri,
            listings: vec![
                raw(SourceName::Naukri, "Rust Engineer", "https://jobs.test/rust-engineer"),
                raw(SourceName::Naukri, "Data Engineer", "https://jobs.test/data-engineer"),
                raw(SourceName::Naukri, "QA Lead", "https://jobs.test/qa-lead"),
            ],
        }),
        Arc::new(DownCollector(SourceName::Indeed)),
    ]
}
