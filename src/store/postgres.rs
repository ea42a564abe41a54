use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::PersistenceError;
use crate::models::job::{Job, JobFilters, NewJob, UpsertOutcome};
use crate::models::job_source::JobSource;
use crate::store::ListingStore;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ListingStore for PgStore {
    async fn ping(&self) -> Result<(), PersistenceError> {
        let _: (i32,) = sqlx::query_as("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }

    async fn resolve_source(&self, name: &str) -> Result<Option<i32>, PersistenceError> {
        Ok(JobSource::find_by_name(&self.pool, name)
            .await?
            .map(|source| source.id))
    }

    async fn upsert_job(&self, job: &NewJob) -> Result<UpsertOutcome, PersistenceError> {
        Job::upsert(&self.pool, job).await
    }

    async fn list_jobs(&self, filters: &JobFilters) -> Result<Vec<Job>, PersistenceError> {
        Job::list(&self.pool, filters).await
    }
}
