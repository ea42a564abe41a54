//! Persistence backends for scraped listings.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::error::PersistenceError;
use crate::models::job::{Job, JobFilters, NewJob, UpsertOutcome};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Storage operations the persistence gateway and read API depend on.
#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Cheap reachability check.
    async fn ping(&self) -> Result<(), PersistenceError>;

    /// Look up the persisted identifier of a job source by name.
    async fn resolve_source(&self, name: &str) -> Result<Option<i32>, PersistenceError>;

    /// Insert or update the job keyed by its url.
    async fn upsert_job(&self, job: &NewJob) -> Result<UpsertOutcome, PersistenceError>;

    async fn list_jobs(&self, filters: &JobFilters) -> Result<Vec<Job>, PersistenceError>;
}
