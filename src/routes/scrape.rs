use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::error::AppError;
use crate::pipeline::RunSummary;
use crate::routes::AppState;

#[derive(Debug, Serialize)]
pub struct ScrapeResponse {
    pub success: bool,
    pub message: String,
    #[serde(flatten)]
    pub summary: RunSummary,
}

/// GET|POST /scrape-jobs
///
/// Runs one ingestion pass. Reports success even when some sources failed;
/// those are listed under `sourceErrors`.
pub async fn trigger(State(state): State<AppState>) -> Result<Json<ScrapeResponse>, AppError> {
    let summary = state.pipeline.run().await?;
    Ok(Json(ScrapeResponse {
        success: true,
        message: "Jobs scraped successfully".to_string(),
        summary,
    }))
}
