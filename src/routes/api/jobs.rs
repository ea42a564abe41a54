use axum::Json;
use axum::extract::{Query, State};

use crate::error::AppError;
use crate::models::job::{Job, JobFilters};
use crate::models::listing::SourceName;
use crate::routes::AppState;

/// GET /api/v1/jobs
pub async fn list(
    State(state): State<AppState>,
    Query(mut filters): Query<JobFilters>,
) -> Result<Json<Vec<Job>>, AppError> {
    if let Some(raw) = filters.source.take() {
        let source: SourceName = raw.parse().map_err(AppError::BadRequest)?;
        filters.source = Some(source.to_string());
    }
    let jobs = state.store().list_jobs(&filters).await?;
    Ok(Json(jobs))
}
