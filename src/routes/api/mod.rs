pub mod jobs;

use axum::Router;
use axum::routing::get;

use crate::routes::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/jobs", get(jobs::list))
}
