// Source adapters: one per job board. Each fetches its provider's native
// payload and extracts RawListings; the aggregator contains their failures.

pub mod html;
pub mod indeed;
pub mod linkedin;
pub mod naukri;
pub mod url;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AdapterError;
use crate::models::listing::{RawListing, SourceName};

pub use indeed::Indeed;
pub use linkedin::LinkedIn;
pub use naukri::Naukri;

/// Trait that all job collectors must implement.
/// Each collector fetches one provider and returns the listings it could
/// extract. Blocks missing a title, company or link are skipped, not errors.
#[async_trait]
pub trait JobCollector: Send + Sync {
    /// Source this collector ingests, matching a `job_sources` row.
    fn source(&self) -> SourceName;

    async fn collect(&self) -> Result<Vec<RawListing>, AdapterError>;
}

/// The production collector set, sharing one HTTP client.
pub fn default_collectors(client: reqwest::Client) -> Vec<Arc<dyn JobCollector>> {
    vec![
        Arc::new(LinkedIn::new(client.clone())),
        Arc::new(Naukri::new(client.clone())),
        Arc::new(Indeed::new(client)),
    ]
}

pub fn build_http_client(user_agent: &str) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder().user_agent(user_agent).build()
}

/// Send a request and reject non-2xx responses.
pub(crate) async fn send(request: reqwest::RequestBuilder) -> Result<reqwest::Response, AdapterError> {
    let resp = request.send().await?;
    if !resp.status().is_success() {
        return Err(AdapterError::Status(resp.status().as_u16()));
    }
    Ok(resp)
}
