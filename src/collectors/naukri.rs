use async_trait::async_trait;
use scraper::Html;
use serde::Deserialize;
use serde_json::Value;

use crate::collectors::html::{collapse_whitespace, non_empty};
use crate::collectors::url::resolve_listing_url;
use crate::collectors::{JobCollector, send};
use crate::error::AdapterError;
use crate::models::listing::{RawListing, SourceName};

const BASE_URL: &str = "https://www.naukri.com";
const SEARCH_URL: &str = "https://www.naukri.com/jobapi/v3/search";
/// Client id the search API expects from its own web frontend.
const APP_ID: &str = "109";

/// Naukri's JSON search API.
pub struct Naukri {
    client: reqwest::Client,
    endpoint: String,
}

impl Naukri {
    pub fn new(client: reqwest::Client) -> Self {
        Self::with_endpoint(client, SEARCH_URL)
    }

    pub fn with_endpoint(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl JobCollector for Naukri {
    fn source(&self) -> SourceName {
        SourceName::Naukri
    }

    async fn collect(&self) -> Result<Vec<RawListing>, AdapterError> {
        let resp = send(
            self.client
                .get(&self.endpoint)
                .header("Accept", "application/json")
                .header("appid", APP_ID)
                .header("systemid", APP_ID),
        )
        .await?;
        let body = resp.bytes().await?;
        parse_listings(&body)
    }
}

/// Response envelope. A missing `jobDetails` means the API changed shape.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    job_details: Vec<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NaukriJob {
    title: String,
    company_name: String,
    #[serde(default)]
    location: Option<NaukriLocation>,
    job_url: String,
    #[serde(default)]
    job_description: Option<String>,
    #[serde(default)]
    created_date: Option<NaukriTimestamp>,
    #[serde(default)]
    job_id: Option<NaukriId>,
    #[serde(default)]
    salary: Option<String>,
    #[serde(default)]
    tags_and_skills: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NaukriLocation {
    Many(Vec<String>),
    One(String),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NaukriTimestamp {
    Millis(i64),
    /// Some responses serialize the epoch as a float (`1.7145504e12`).
    FloatMillis(f64),
    Text(String),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NaukriId {
    Text(String),
    Number(i64),
}

pub fn parse_listings(body: &[u8]) -> Result<Vec<RawListing>, AdapterError> {
    let response: SearchResponse = serde_json::from_slice(body)
        .map_err(|e| AdapterError::Parse(format!("Naukri search response: {e}")))?;

    let mut listings = Vec::with_capacity(response.job_details.len());
    for (idx, entry) in response.job_details.into_iter().enumerate() {
        let job: NaukriJob = match serde_json::from_value(entry) {
            Ok(job) => job,
            Err(e) => {
                tracing::warn!("Skipping malformed Naukri job #{idx}: {e}");
                continue;
            }
        };
        if let Some(listing) = to_raw_listing(job) {
            listings.push(listing);
        }
    }
    Ok(listings)
}

fn to_raw_listing(job: NaukriJob) -> Option<RawListing> {
    let title = collapse_whitespace(std::iter::once(job.title.as_str()));
    let company = collapse_whitespace(std::iter::once(job.company_name.as_str()));
    let url = resolve_listing_url(BASE_URL, &job.job_url)?;
    if title.is_empty() || company.is_empty() {
        return None;
    }

    let location = match job.location {
        Some(NaukriLocation::Many(places)) => places
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Some(NaukriLocation::One(place)) => place.trim().to_string(),
        None => String::new(),
    };

    let requirements = job.tags_and_skills.map(|tags| {
        tags.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect::<Vec<_>>()
    });

    Some(RawListing {
        location,
        description: job
            .job_description
            .as_deref()
            .map(strip_markup)
            .unwrap_or_default(),
        posted_date: job.created_date.map(|ts| match ts {
            NaukriTimestamp::Millis(ms) => ms.to_string(),
            NaukriTimestamp::FloatMillis(ms) => (ms.trunc() as i64).to_string(),
            NaukriTimestamp::Text(text) => text,
        }),
        external_id: job.job_id.and_then(|id| match id {
            NaukriId::Text(text) => non_empty(text.trim().to_string()),
            NaukriId::Number(n) => Some(n.to_string()),
        }),
        salary: job.salary.and_then(|s| non_empty(s.trim().to_string())),
        requirements: requirements.filter(|r| !r.is_empty()),
        ..RawListing::new(SourceName::Naukri, title, company, url)
    })
}

/// Job descriptions arrive as HTML fragments.
fn strip_markup(fragment: &str) -> String {
    let doc = Html::parse_fragment(fragment);
    collapse_whitespace(doc.root_element().text())
}
