use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::error::PersistenceError;
use crate::models::job::{Job, JobFilters, NewJob, UpsertOutcome};
use crate::models::listing::SourceName;
use crate::store::ListingStore;

/// In-process store with the same upsert semantics as the `jobs` table.
/// Lets the pipeline and HTTP surface run without PostgreSQL.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    sources: HashMap<String, i32>,
    jobs: BTreeMap<String, Job>,
    next_id: i32,
    failing_urls: HashSet<String>,
    unavailable: bool,
}

impl MemoryStore {
    /// A store seeded with every known source, like the initial migration.
    pub fn seeded() -> Self {
        Self::with_sources(SourceName::ALL.iter().map(SourceName::as_str))
    }

    pub fn with_sources<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let store = Self::default();
        {
            let mut inner = store.lock();
            for (idx, name) in names.into_iter().enumerate() {
                inner.sources.insert(name.to_string(), idx as i32 + 1);
            }
        }
        store
    }

    /// Make every upsert of `url` fail, as a constraint violation would.
    pub fn fail_on_url(&self, url: impl Into<String>) {
        self.lock().failing_urls.insert(url.into());
    }

    pub fn set_available(&self, available: bool) {
        self.lock().unavailable = !available;
    }

    pub fn len(&self) -> usize {
        self.lock().jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, url: &str) -> Option<Job> {
        self.lock().jobs.get(url).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // Every write completes within one call, so a poisoned map is still consistent.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Inner {
    fn check_available(&self) -> Result<(), PersistenceError> {
        if self.unavailable {
            return Err(PersistenceError::Store("connection refused".to_string()));
        }
        Ok(())
    }

    fn source_name(&self, id: i32) -> Option<&str> {
        self.sources
            .iter()
            .find(|(_, source_id)| **source_id == id)
            .map(|(name, _)| name.as_str())
    }
}

#[async_trait]
impl ListingStore for MemoryStore {
    async fn ping(&self) -> Result<(), PersistenceError> {
        self.lock().check_available()
    }

    async fn resolve_source(&self, name: &str) -> Result<Option<i32>, PersistenceError> {
        let inner = self.lock();
        inner.check_available()?;
        Ok(inner.sources.get(name).copied())
    }

    async fn upsert_job(&self, job: &NewJob) -> Result<UpsertOutcome, PersistenceError> {
        let mut inner = self.lock();
        inner.check_available()?;
        if inner.failing_urls.contains(&job.url) {
            return Err(PersistenceError::Store(format!(
                "constraint violation on '{}'",
                job.url
            )));
        }
        let source = inner
            .source_name(job.source_id)
            .ok_or_else(|| {
                PersistenceError::Store(format!("foreign key violation: source {}", job.source_id))
            })?
            .to_string();

        if let Some(existing) = inner.jobs.get_mut(&job.url) {
            existing.title = job.title.clone();
            existing.company = job.company.clone();
            existing.location = job.location.clone();
            existing.description = job.description.clone();
            existing.source_id = job.source_id;
            existing.source = source;
            existing.external_id = job.external_id.clone();
            existing.salary = job.salary.clone();
            existing.requirements = job.requirements.clone();
            if job.replace_posted_date {
                existing.posted_date = job.posted_date;
            }
            existing.last_scraped = job.last_scraped;
            return Ok(UpsertOutcome::Updated);
        }

        inner.next_id += 1;
        let row = Job {
            id: inner.next_id,
            title: job.title.clone(),
            company: job.company.clone(),
            location: job.location.clone(),
            description: job.description.clone(),
            url: job.url.clone(),
            source_id: job.source_id,
            source,
            external_id: job.external_id.clone(),
            salary: job.salary.clone(),
            requirements: job.requirements.clone(),
            posted_date: job.posted_date,
            last_scraped: job.last_scraped,
            created_at: Utc::now(),
        };
        inner.jobs.insert(job.url.clone(), row);
        Ok(UpsertOutcome::Inserted)
    }

    async fn list_jobs(&self, filters: &JobFilters) -> Result<Vec<Job>, PersistenceError> {
        let inner = self.lock();
        inner.check_available()?;

        let search = filters.search.as_deref().map(str::to_lowercase);
        let mut jobs: Vec<Job> = inner
            .jobs
            .values()
            .filter(|job| filters.source.as_deref().is_none_or(|s| job.source == s))
            .filter(|job| {
                search.as_deref().is_none_or(|q| {
                    job.title.to_lowercase().contains(q) || job.company.to_lowercase().contains(q)
                })
            })
            .cloned()
            .collect();
        jobs.sort_by(|a, b| b.posted_date.cmp(&a.posted_date).then(b.id.cmp(&a.id)));

        Ok(jobs
            .into_iter()
            .skip(filters.offset() as usize)
            .take(filters.limit() as usize)
            .collect())
    }
}
