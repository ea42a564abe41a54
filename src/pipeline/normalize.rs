use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::models::listing::{Listing, RawListing};

/// Epoch values above this are taken as milliseconds (year 5138 in seconds).
const MILLIS_THRESHOLD: i64 = 100_000_000_000;

/// Validate a raw listing. Returns `None` when title, company or url is blank.
/// A missing or unparseable posted date becomes `now`.
pub fn normalize(raw: RawListing, now: DateTime<Utc>) -> Option<Listing> {
    if is_blank(&raw.title) || is_blank(&raw.company) || is_blank(&raw.url) {
        return None;
    }

    let parsed = raw.posted_date.as_deref().and_then(parse_posted_date);

    Some(Listing {
        title: raw.title,
        company: raw.company,
        location: raw.location,
        url: raw.url,
        description: raw.description,
        posted_date: parsed.unwrap_or(now),
        posted_date_explicit: parsed.is_some(),
        source: raw.source,
        external_id: raw.external_id,
        salary: raw.salary,
        requirements: raw.requirements,
    })
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Accepts RFC 3339, `YYYY-MM-DD` and integer epoch seconds or milliseconds.
pub fn parse_posted_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }

    let epoch: i64 = value.parse().ok()?;
    if epoch <= 0 {
        return None;
    }
    if epoch >= MILLIS_THRESHOLD {
        Utc.timestamp_millis_opt(epoch).single()
    } else {
        Utc.timestamp_opt(epoch, 0).single()
    }
}
