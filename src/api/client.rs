//! HTTP access to the REST Countries API.
//!
//! List queries map a [`FilterKind`] onto one endpoint. A 404 from a list
//! endpoint means "no matches" and comes back as an empty vector; every other
//! non-200 status is an error.

use super::model::Country;
use super::FetchError;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://restcountries.com/v3.1";

/// Fields requested from `/all`, which rejects unfiltered queries.
const LIST_FIELDS: &str = "name,cca3,cioc,flags,languages,region,subregion,timezones,capital";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    All,
    Name,
    CountryCode,
    Currency,
    Language,
    CapitalCity,
    Continent,
    Subregion,
}

impl FilterKind {
    pub const ALL: [FilterKind; 8] = [
        FilterKind::All,
        FilterKind::Name,
        FilterKind::CountryCode,
        FilterKind::Currency,
        FilterKind::Language,
        FilterKind::CapitalCity,
        FilterKind::Continent,
        FilterKind::Subregion,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FilterKind::All => "all",
            FilterKind::Name => "name",
            FilterKind::CountryCode => "country-code",
            FilterKind::Currency => "currency",
            FilterKind::Language => "language",
            FilterKind::CapitalCity => "capital-city",
            FilterKind::Continent => "continent",
            FilterKind::Subregion => "subregion",
        }
    }

    fn path(self) -> &'static str {
        match self {
            FilterKind::All => "all",
            FilterKind::Name => "name",
            FilterKind::CountryCode => "alpha",
            FilterKind::Currency => "currency",
            FilterKind::Language => "lang",
            FilterKind::CapitalCity => "capital",
            FilterKind::Continent => "region",
            FilterKind::Subregion => "subregion",
        }
    }

    pub fn needs_value(self) -> bool {
        self != FilterKind::All
    }

    /// Cycle through the filters in display order.
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|k| *k == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl FromStr for FilterKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown filter '{}'", s))
    }
}

/// Some endpoints answer with a bare object instead of an array.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<Country>),
    One(Box<Country>),
}

impl From<OneOrMany> for Vec<Country> {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::Many(v) => v,
            OneOrMany::One(c) => vec![*c],
        }
    }
}

#[derive(Debug, Clone)]
pub struct CountriesClient {
    http: Client,
    base_url: String,
}

impl CountriesClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("countrydeck/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    #[cfg(test)]
    pub fn with_url(base_url: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn list_url(&self, kind: FilterKind, value: &str) -> Result<String, FetchError> {
        if !kind.needs_value() {
            return Ok(format!("{}/all?fields={}", self.base_url, LIST_FIELDS));
        }
        let value = value.trim();
        if value.is_empty() {
            return Err(FetchError::InvalidInput(kind.label()));
        }
        Ok(format!(
            "{}/{}/{}",
            self.base_url,
            kind.path(),
            urlencoding::encode(value)
        ))
    }

    async fn get(&self, url: &str) -> Result<Option<Vec<Country>>, FetchError> {
        tracing::debug!(url, "fetching countries");
        let resp = self.http.get(url).send().await?;
        match resp.status() {
            StatusCode::OK => {
                let body = resp.bytes().await?;
                let parsed: OneOrMany = serde_json::from_slice(&body)?;
                Ok(Some(parsed.into()))
            }
            StatusCode::NOT_FOUND => Ok(None),
            status => {
                tracing::warn!(url, status = status.as_u16(), "unexpected status");
                Err(FetchError::Status(status.as_u16()))
            }
        }
    }

    /// Fetch every record matching `kind`/`value`. No matches is `Ok(vec![])`.
    pub async fn fetch_records(
        &self,
        kind: FilterKind,
        value: &str,
    ) -> Result<Vec<Country>, FetchError> {
        let url = self.list_url(kind, value)?;
        let records = self.get(&url).await?.unwrap_or_default();
        tracing::info!(filter = kind.label(), count = records.len(), "fetched records");
        Ok(records)
    }

    /// Fetch the single record whose name matches `name` exactly.
    pub async fn fetch_by_exact_name(&self, name: &str) -> Result<Country, FetchError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(FetchError::InvalidInput("name"));
        }
        let url = format!(
            "{}/name/{}?fullText=true",
            self.base_url,
            urlencoding::encode(name)
        );
        self.get(&url)
            .await?
            .and_then(|records| records.into_iter().next())
            .ok_or_else(|| FetchError::NotFound(name.to_string()))
    }
}
