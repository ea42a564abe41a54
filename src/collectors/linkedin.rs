use async_trait::async_trait;
use scraper::Html;

use crate::collectors::html::{attr_of, first_text, non_empty, own_attr, selector};
use crate::collectors::url::resolve_listing_url;
use crate::collectors::{JobCollector, send};
use crate::error::AdapterError;
use crate::models::listing::{RawListing, SourceName};

const BASE_URL: &str = "https://www.linkedin.com";
const SEARCH_URL: &str = "https://www.linkedin.com/jobs-guest/jobs/api/seeMoreJobPostings/search";

/// LinkedIn's guest search endpoint, which returns an HTML fragment of job cards.
pub struct LinkedIn {
    client: reqwest::Client,
    endpoint: String,
}

impl LinkedIn {
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
impl JobCollector for LinkedIn {
    fn source(&self) -> SourceName {
        SourceName::LinkedIn
    }

    async fn collect(&self) -> Result<Vec<RawListing>, AdapterError> {
        let resp = send(
            self.client
                .get(&self.endpoint)
                .header("Accept", "text/html,application/xhtml+xml,*/*;q=0.8"),
        )
        .await?;
        let body = resp.text().await?;
        parse_listings(&body)
    }
}

/// Extract one listing per `.job-search-card` block.
pub fn parse_listings(body: &str) -> Result<Vec<RawListing>, AdapterError> {
    let card_sel = selector(".job-search-card")?;
    let title_sel = selector(".job-search-card__title")?;
    let title_alt_sel = selector(".base-search-card__title")?;
    let company_sel = selector(".job-search-card__company-name")?;
    let company_alt_sel = selector(".base-search-card__subtitle")?;
    let location_sel = selector(".job-search-card__location")?;
    let link_sel = selector("a.job-search-card__link, a.base-card__full-link")?;
    let listed_sel = selector("time[datetime]")?;

    let document = Html::parse_document(body);
    let mut listings = Vec::new();

    for block in document.select(&card_sel) {
        let title = first_text(&block, &[&title_sel, &title_alt_sel]);
        let company = first_text(&block, &[&company_sel, &company_alt_sel]);
        let url = attr_of(&block, &link_sel, "href")
            .and_then(|href| resolve_listing_url(BASE_URL, &href))
            .unwrap_or_default();

        if title.is_empty() || company.is_empty() || url.is_empty() {
            tracing::debug!(%title, %company, "Skipping incomplete LinkedIn card");
            continue;
        }

        let external_id = own_attr(&block, "data-id").or_else(|| {
            own_attr(&block, "data-entity-urn")
                .and_then(|urn| urn.rsplit(':').next().map(String::from))
        });

        listings.push(RawListing {
            location: first_text(&block, &[&location_sel]),
            posted_date: attr_of(&block, &listed_sel, "datetime"),
            external_id: external_id.and_then(non_empty),
            ..RawListing::new(SourceName::LinkedIn, title, company, url)
        });
    }

    Ok(listings)
}
