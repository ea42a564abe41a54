use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The closed set of job boards this service ingests from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SourceName {
    LinkedIn,
    Naukri,
    Indeed,
}

impl SourceName {
    pub const ALL: [SourceName; 3] = [SourceName::LinkedIn, SourceName::Naukri, SourceName::Indeed];

    /// Name as stored in `job_sources.name`.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceName::LinkedIn => "LinkedIn",
            SourceName::Naukri => "Naukri",
            SourceName::Indeed => "Indeed",
        }
    }
}

impl fmt::Display for SourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SourceName::ALL
            .into_iter()
            .find(|source| source.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown source '{s}'"))
    }
}

/// A listing as extracted by a collector, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawListing {
    pub title: String,
    pub company: String,
    pub location: String,
    pub url: String,
    pub description: String,
    /// Provider-supplied posting date, unparsed.
    pub posted_date: Option<String>,
    pub source: SourceName,
    pub external_id: Option<String>,
    pub salary: Option<String>,
    pub requirements: Option<Vec<String>>,
}

impl RawListing {
    /// A listing with only the identifying fields set.
    pub fn new(
        source: SourceName,
        title: impl Into<String>,
        company: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            company: company.into(),
            location: String::new(),
            url: url.into(),
            description: String::new(),
            posted_date: None,
            source,
            external_id: None,
            salary: None,
            requirements: None,
        }
    }
}

/// A validated listing ready for persistence. `url` is its identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Listing {
    pub title: String,
    pub company: String,
    pub location: String,
    pub url: String,
    pub description: String,
    pub posted_date: DateTime<Utc>,
    /// False when `posted_date` is the ingestion time rather than a provider value.
    pub posted_date_explicit: bool,
    pub source: SourceName,
    pub external_id: Option<String>,
    pub salary: Option<String>,
    pub requirements: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_names_round_trip_case_insensitively() {
        assert_eq!("linkedin".parse::<SourceName>(), Ok(SourceName::LinkedIn));
        assert_eq!("NAUKRI".parse::<SourceName>(), Ok(SourceName::Naukri));
        assert_eq!(SourceName::Indeed.to_string(), "Indeed");
        assert!("Monster".parse::<SourceName>().is_err());
    }
}
