// HTTP-level tests driving the router directly via tower::ServiceExt::oneshot.

mod common;

use std::sync::Arc;

use axum::Router;
use axum::body::{self, Body};
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt as _;

use jobharvest::routes::{self, AppState};
use jobharvest::store::MemoryStore;

use common::{pipeline, three_sources};

const BODY_LIMIT: usize = 1024 * 1024;

fn app(store: &Arc<MemoryStore>) -> Router {
    routes::router(AppState::new(pipeline(store, three_sources())))
}

async fn json_body(resp: axum::response::Response) -> Value {
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse json")
}

#[tokio::test]
async fn scrape_reports_success_with_count_and_source_errors() {
    let store = Arc::new(MemoryStore::seeded());
    let req = Request::builder()
        .method("POST")
        .uri("/scrape-jobs")
        .body(Body::empty())
        .unwrap();

    let resp = app(&store).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()["access-control-allow-origin"],
        "*",
        "CORS header on regular responses"
    );

    let v = json_body(resp).await;
    assert_eq!(v["success"], true);
    assert_eq!(v["message"], "Jobs scraped successfully");
    assert_eq!(v["count"], 4);
    assert!(v["sourceErrors"]["Indeed"].is_string());
    assert!(v["runId"].is_string());
}

#[tokio::test]
async fn scrape_accepts_get() {
    let store = Arc::new(MemoryStore::seeded());
    let req = Request::builder()
        .uri("/scrape-jobs")
        .body(Body::empty())
        .unwrap();

    let resp = app(&store).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(store.len(), 4);
}

#[tokio::test]
async fn pipeline_failure_is_a_500_with_error_message() {
    let store = Arc::new(MemoryStore::seeded());
    store.set_available(false);
    let req = Request::builder()
        .method("POST")
        .uri("/scrape-jobs")
        .body(Body::empty())
        .unwrap();

    let resp = app(&store).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let v = json_body(resp).await;
    assert_eq!(v["success"], false);
    assert!(v["error"].as_str().unwrap().contains("job store unavailable"));
}

#[tokio::test]
async fn options_returns_empty_body_with_permissive_cors() {
    let store = Arc::new(MemoryStore::seeded());
    let req = Request::builder()
        .method("OPTIONS")
        .uri("/scrape-jobs")
        .body(Body::empty())
        .unwrap();

    let resp = app(&store).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let headers = resp.headers().clone();
    assert_eq!(headers["access-control-allow-origin"], "*");
    let methods = headers["access-control-allow-methods"].to_str().unwrap();
    for method in ["GET", "POST", "OPTIONS"] {
        assert!(methods.contains(method), "missing {method} in {methods}");
    }
    let allowed = headers["access-control-allow-headers"]
        .to_str()
        .unwrap()
        .to_ascii_lowercase();
    assert!(allowed.contains("content-type"));
    assert!(allowed.contains("authorization"));

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT).await.unwrap();
    assert!(bytes.is_empty());
    assert!(store.is_empty(), "preflight must not trigger a scrape");
}

#[tokio::test]
async fn jobs_endpoint_lists_persisted_rows() {
    let store = Arc::new(MemoryStore::seeded());
    let app = app(&store);

    let scrape = Request::builder()
        .method("POST")
        .uri("/scrape-jobs")
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(scrape).await.unwrap();

    let req = Request::builder()
        .uri("/api/v1/jobs?source=linkedin")
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let v = json_body(resp).await;
    let jobs = v.as_array().unwrap();
    assert!(jobs.iter().all(|j| j["source"] == "LinkedIn"));
    assert!(jobs.iter().any(|j| j["url"] == "https://jobs.test/sre"));

    let req = Request::builder()
        .uri("/api/v1/jobs?source=monster")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn readiness_follows_the_store() {
    let store = Arc::new(MemoryStore::seeded());
    let req = || Request::builder().uri("/readyz").body(Body::empty()).unwrap();

    let resp = app(&store).oneshot(req()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    store.set_available(false);
    let resp = app(&store).oneshot(req()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}
