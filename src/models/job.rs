use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::PersistenceError;

const JOB_COLUMNS: &str = "j.id, j.title, j.company, j.location, j.description, j.url, j.source_id, s.name AS source, j.external_id, j.salary, j.requirements, j.posted_date, j.last_scraped, j.created_at";

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub url: String,
    pub source_id: i32,
    pub source: String,
    pub external_id: Option<String>,
    pub salary: Option<String>,
    pub requirements: Option<Vec<String>>,
    pub posted_date: DateTime<Utc>,
    pub last_scraped: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Row values for an upsert keyed by `url`.
#[derive(Debug, Clone)]
pub struct NewJob {
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub url: String,
    pub source_id: i32,
    pub external_id: Option<String>,
    pub salary: Option<String>,
    pub requirements: Option<Vec<String>>,
    pub posted_date: DateTime<Utc>,
    /// Overwrite the stored posted date on conflict.
    pub replace_posted_date: bool,
    pub last_scraped: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

#[derive(Debug, Default, Deserialize)]
pub struct JobFilters {
    pub source: Option<String>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl JobFilters {
    pub fn limit(&self) -> i64 {
        self.per_page.unwrap_or(50).clamp(1, 100)
    }

    pub fn offset(&self) -> i64 {
        (self.page.unwrap_or(1) - 1).max(0) * self.limit()
    }
}

impl Job {
    pub async fn list(pool: &PgPool, filters: &JobFilters) -> Result<Vec<Job>, PersistenceError> {
        let jobs = sqlx::query_as::<_, Job>(&format!(
            "SELECT {JOB_COLUMNS} FROM jobs j JOIN job_sources s ON s.id = j.source_id WHERE ($1::text IS NULL OR s.name = $1) AND ($2::text IS NULL OR j.title ILIKE '%' || $2 || '%' OR j.company ILIKE '%' || $2 || '%') ORDER BY j.posted_date DESC, j.id DESC LIMIT $3 OFFSET $4"
        ))
        .bind(&filters.source)
        .bind(&filters.search)
        .bind(filters.limit())
        .bind(filters.offset())
        .fetch_all(pool)
        .await?;
        Ok(jobs)
    }

    /// Insert or update the row keyed by `url`. `xmax = 0` only holds for a
    /// freshly inserted tuple.
    pub async fn upsert(pool: &PgPool, input: &NewJob) -> Result<UpsertOutcome, PersistenceError> {
        let (inserted,): (bool,) = sqlx::query_as(
            "INSERT INTO jobs (title, company, location, description, url, source_id, external_id, salary, requirements, posted_date, last_scraped)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             ON CONFLICT (url) DO UPDATE SET
                 title = EXCLUDED.title,
                 company = EXCLUDED.company,
                 location = EXCLUDED.location,
                 description = EXCLUDED.description,
                 source_id = EXCLUDED.source_id,
                 external_id = EXCLUDED.external_id,
                 salary = EXCLUDED.salary,
                 requirements = EXCLUDED.requirements,
                 posted_date = CASE WHEN $12 THEN EXCLUDED.posted_date ELSE jobs.posted_date END,
                 last_scraped = EXCLUDED.last_scraped
             RETURNING (xmax = 0)",
        )
        .bind(&input.title)
        .bind(&input.company)
        .bind(&input.location)
        .bind(&input.description)
        .bind(&input.url)
        .bind(input.source_id)
        .bind(&input.external_id)
        .bind(&input.salary)
        .bind(&input.requirements)
        .bind(input.posted_date)
        .bind(input.last_scraped)
        .bind(input.replace_posted_date)
        .fetch_one(pool)
        .await?;

        Ok(if inserted {
            UpsertOutcome::Inserted
        } else {
            UpsertOutcome::Updated
        })
    }
}
