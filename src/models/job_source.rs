use serde::Serialize;
use sqlx::PgPool;

use crate::error::PersistenceError;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct JobSource {
    pub id: i32,
    pub name: String,
    pub base_url: Option<String>,
}

impl JobSource {
    pub async fn find_by_name(
        pool: &PgPool,
        name: &str,
    ) -> Result<Option<JobSource>, PersistenceError> {
        let source = sqlx::query_as::<_, JobSource>(
            "SELECT id, name, base_url FROM job_sources WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(pool)
        .await?;
        Ok(source)
    }
}
