use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Failure of a single source adapter. Contained by the aggregator.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned HTTP {0}")]
    Status(u16),

    #[error("unparseable payload: {0}")]
    Parse(String),

    #[error("no response within {0:?}")]
    Timeout(Duration),

    #[error("collector task aborted: {0}")]
    Task(String),
}

/// Failure to persist one listing. The batch continues.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("unknown job source '{0}'")]
    UnknownSource(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("store error: {0}")]
    Store(String),
}

/// Failure of the whole ingestion run. The only kind surfaced to callers.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("job store unavailable: {0}")]
    StoreUnavailable(String),
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Pipeline(e) => {
                tracing::error!("Scrape pipeline failed: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            AppError::Persistence(e) => {
                tracing::error!("Store error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        };

        let body = axum::Json(json!({ "success": false, "error": message }));
        (status, body).into_response()
    }
}
