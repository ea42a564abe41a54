use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::PersistenceError;
use crate::models::job::{NewJob, UpsertOutcome};
use crate::models::listing::{Listing, SourceName};
use crate::store::ListingStore;

/// Writes listings to a [`ListingStore`], one at a time, isolating failures
/// to the listing that caused them. The first copy of a url that persists
/// wins; later copies in the same batch are counted as duplicates.
pub struct PersistenceGateway {
    store: Arc<dyn ListingStore>,
}

#[derive(Debug, Default, Serialize)]
pub struct UpsertReport {
    pub inserted: usize,
    pub updated: usize,
    /// Listings skipped because an earlier copy of the url was persisted.
    pub duplicates: usize,
    pub failures: Vec<ListingFailure>,
}

#[derive(Debug, Serialize)]
pub struct ListingFailure {
    pub url: String,
    pub error: String,
}

impl UpsertReport {
    /// Listings that reached the store, new or updated.
    pub fn persisted(&self) -> usize {
        self.inserted + self.updated
    }
}

impl PersistenceGateway {
    pub fn new(store: Arc<dyn ListingStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn ListingStore> {
        &self.store
    }

    pub async fn upsert(&self, listings: &[Listing]) -> UpsertReport {
        self.upsert_at(listings, Utc::now()).await
    }

    /// Upsert with `scraped_at` stamped as every row's `last_scraped`.
    pub async fn upsert_at(&self, listings: &[Listing], scraped_at: DateTime<Utc>) -> UpsertReport {
        let mut report = UpsertReport::default();
        let mut source_ids: HashMap<SourceName, Option<i32>> = HashMap::new();
        let mut persisted_urls = HashSet::new();

        for listing in listings {
            if persisted_urls.contains(&listing.url) {
                report.duplicates += 1;
                continue;
            }
            let outcome = self.upsert_one(listing, scraped_at, &mut source_ids).await;
            if outcome.is_ok() {
                persisted_urls.insert(listing.url.clone());
            }
            match outcome {
                Ok(UpsertOutcome::Inserted) => report.inserted += 1,
                Ok(UpsertOutcome::Updated) => report.updated += 1,
                Err(e) => {
                    tracing::warn!(url = %listing.url, "Failed to persist listing: {e}");
                    report.failures.push(ListingFailure {
                        url: listing.url.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            inserted = report.inserted,
            updated = report.updated,
            duplicates = report.duplicates,
            failed = report.failures.len(),
            "Persisted listings"
        );
        report
    }

    async fn upsert_one(
        &self,
        listing: &Listing,
        scraped_at: DateTime<Utc>,
        source_ids: &mut HashMap<SourceName, Option<i32>>,
    ) -> Result<UpsertOutcome, PersistenceError> {
        let source_id = match source_ids.get(&listing.source) {
            Some(cached) => *cached,
            None => {
                let resolved = self.store.resolve_source(listing.source.as_str()).await?;
                source_ids.insert(listing.source, resolved);
                resolved
            }
        };
        let source_id =
            source_id.ok_or_else(|| PersistenceError::UnknownSource(listing.source.to_string()))?;

        let job = NewJob {
            title: listing.title.clone(),
            company: listing.company.clone(),
            location: listing.location.clone(),
            description: listing.description.clone(),
            url: listing.url.clone(),
            source_id,
            external_id: listing.external_id.clone(),
            salary: listing.salary.clone(),
            requirements: listing.requirements.clone(),
            posted_date: listing.posted_date,
            replace_posted_date: listing.posted_date_explicit,
            last_scraped: scraped_at,
        };
        self.store.upsert_job(&job).await
    }
}
