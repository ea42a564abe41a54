use async_trait::async_trait;
use scraper::Html;

use crate::collectors::html::{attr_of, first_text, non_empty, own_attr, selector, text_of};
use crate::collectors::url::resolve_listing_url;
use crate::collectors::{JobCollector, send};
use crate::error::AdapterError;
use crate::models::listing::{RawListing, SourceName};

const BASE_URL: &str = "https://www.indeed.com";
const SEARCH_URL: &str = "https://www.indeed.com/jobs";

pub struct Indeed {
    client: reqwest::Client,
    endpoint: String,
}

impl Indeed {
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
impl JobCollector for Indeed {
    fn source(&self) -> SourceName {
        SourceName::Indeed
    }

    async fn collect(&self) -> Result<Vec<RawListing>, AdapterError> {
        let resp = send(
            self.client
                .get(&self.endpoint)
                .header("Accept", "text/html,application/xhtml+xml,*/*;q=0.8")
                .header("Accept-Language", "en-US,en;q=0.9"),
        )
        .await?;
        let body = resp.text().await?;
        parse_listings(&body)
    }
}

/// Extract one listing per `.job_seen_beacon` result block.
/// Result links are relative (`/rc/clk?jk=...`) and resolved against the site origin.
pub fn parse_listings(body: &str) -> Result<Vec<RawListing>, AdapterError> {
    let block_sel = selector(".job_seen_beacon")?;
    let title_sel = selector(".jobTitle")?;
    let company_sel = selector(".companyName")?;
    let company_alt_sel = selector("[data-testid=company-name]")?;
    let location_sel = selector(".companyLocation")?;
    let location_alt_sel = selector("[data-testid=text-location]")?;
    let snippet_sel = selector(".job-snippet")?;
    let salary_sel = selector(".salary-snippet-container")?;
    let salary_alt_sel = selector(".salaryOnly")?;
    let link_sel = selector("a[href]")?;
    let jk_sel = selector("a[data-jk]")?;

    let document = Html::parse_document(body);
    let mut listings = Vec::new();

    for block in document.select(&block_sel) {
        let title = text_of(&block, &title_sel);
        let company = first_text(&block, &[&company_sel, &company_alt_sel]);
        let url = attr_of(&block, &link_sel, "href")
            .and_then(|href| resolve_listing_url(BASE_URL, &href))
            .unwrap_or_default();

        if title.is_empty() || company.is_empty() || url.is_empty() {
            tracing::debug!(%title, %company, "Skipping incomplete Indeed result");
            continue;
        }

        let external_id =
            own_attr(&block, "data-jk").or_else(|| attr_of(&block, &jk_sel, "data-jk"));

        listings.push(RawListing {
            location: first_text(&block, &[&location_sel, &location_alt_sel]),
            description: text_of(&block, &snippet_sel),
            external_id,
            salary: non_empty(first_text(&block, &[&salary_sel, &salary_alt_sel])),
            ..RawListing::new(SourceName::Indeed, title, company, url)
        });
    }

    Ok(listings)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"
<div id="mosaic-provider-jobcards">
  <div class="cardOutline">
    <div class="job_seen_beacon">
      <h2 class="jobTitle"><a data-jk="abc123" href="/rc/clk?jk=abc123&amp;from=serp"><span title="Rust Developer">Rust Developer</span></a></h2>
      <span data-testid="company-name">Initech</span>
      <div class="companyLocation">Austin, TX</div>
      <div class="salary-snippet-container">$120,000 - $150,000 a year</div>
      <div class="job-snippet"><ul><li>Build ingestion services</li><li>Own the data model</li></ul></div>
    </div>
  </div>
  <div class="job_seen_beacon" data-jk="def456">
    <h2 class="jobTitle"><a href="/viewjob?jk=def456">Platform Engineer</a></h2>
    <span class="companyName">Umbrella</span>
    <div data-testid="text-location">Remote</div>
  </div>
  <div class="job_seen_beacon">
    <h2 class="jobTitle">No Link Here</h2>
    <span class="companyName">Hooli</span>
  </div>
</div>
"#;

    #[test]
    fn resolves_relative_links_and_reads_fields() {
        let listings = parse_listings(FIXTURE).unwrap();
        assert_eq!(listings.len(), 2);

        let first = &listings[0];
        assert_eq!(first.title, "Rust Developer");
        assert_eq!(first.company, "Initech");
        assert_eq!(first.location, "Austin, TX");
        assert_eq!(first.url, "https://www.indeed.com/rc/clk?jk=abc123&from=serp");
        assert_eq!(first.external_id.as_deref(), Some("abc123"));
        assert_eq!(first.salary.as_deref(), Some("$120,000 - $150,000 a year"));
        assert_eq!(first.description, "Build ingestion services Own the data model");
        assert_eq!(first.posted_date, None);
    }

    #[test]
    fn block_level_job_key_and_fallback_selectors() {
        let listings = parse_listings(FIXTURE).unwrap();
        let second = &listings[1];
        assert_eq!(second.company, "Umbrella");
        assert_eq!(second.location, "Remote");
        assert_eq!(second.url, "https://www.indeed.com/viewjob?jk=def456");
        assert_eq!(second.external_id.as_deref(), Some("def456"));
        assert_eq!(second.salary, None);
    }

    #[test]
    fn result_without_link_is_skipped() {
        let listings = parse_listings(FIXTURE).unwrap();
        assert!(listings.iter().all(|l| l.title != "No Link Here"));
    }
}
