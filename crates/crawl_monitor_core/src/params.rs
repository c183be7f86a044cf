use thiserror::Error;
use url::Url;

use crate::SavedParameters;

/// Raw operator input, exactly as typed into the form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobInput {
    pub vendor_name: String,
    pub base_url: String,
    pub start_urls: Vec<String>,
    pub page_limit: String,
}

impl From<SavedParameters> for JobInput {
    fn from(saved: SavedParameters) -> Self {
        Self {
            vendor_name: saved.vendor_name,
            base_url: saved.base_url,
            start_urls: saved.start_urls,
            page_limit: saved.page_limit.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("vendor name is required")]
    MissingVendorName,
    #[error("base url is required")]
    MissingBaseUrl,
    #[error("base url {0:?} is not an absolute http(s) url")]
    InvalidBaseUrl(String),
    #[error("at least one start url is required")]
    MissingStartUrls,
    #[error("start url {0:?} is not an absolute http(s) url")]
    InvalidStartUrl(String),
    #[error("page limit {0:?} is not a whole number")]
    InvalidPageLimit(String),
    #[error("page limit must be greater than zero")]
    NonPositivePageLimit,
}

/// Validated job parameters. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobParameters {
    vendor_name: String,
    base_url: String,
    start_urls: Vec<String>,
    page_limit: u32,
}

impl JobParameters {
    pub fn vendor_name(&self) -> &str {
        &self.vendor_name
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn start_urls(&self) -> &[String] {
        &self.start_urls
    }

    pub fn page_limit(&self) -> u32 {
        self.page_limit
    }

    pub fn to_saved(&self) -> SavedParameters {
        SavedParameters {
            vendor_name: self.vendor_name.clone(),
            base_url: self.base_url.clone(),
            start_urls: self.start_urls.clone(),
            page_limit: self.page_limit,
        }
    }
}

impl TryFrom<JobInput> for JobParameters {
    type Error = ValidationError;

    fn try_from(input: JobInput) -> Result<Self, Self::Error> {
        let vendor_name = input.vendor_name.trim();
        if vendor_name.is_empty() {
            return Err(ValidationError::MissingVendorName);
        }

        let base_url = input.base_url.trim();
        if base_url.is_empty() {
            return Err(ValidationError::MissingBaseUrl);
        }
        if !is_http_url(base_url) {
            return Err(ValidationError::InvalidBaseUrl(base_url.to_string()));
        }

        let start_urls: Vec<String> = input
            .start_urls
            .iter()
            .map(|url| url.trim())
            .filter(|url| !url.is_empty())
            .map(ToOwned::to_owned)
            .collect();
        if start_urls.is_empty() {
            return Err(ValidationError::MissingStartUrls);
        }
        if let Some(bad) = start_urls.iter().find(|url| !is_http_url(url)) {
            return Err(ValidationError::InvalidStartUrl(bad.clone()));
        }

        let page_limit = parse_page_limit(&input.page_limit)?;

        Ok(Self {
            vendor_name: vendor_name.to_string(),
            base_url: base_url.to_string(),
            start_urls,
            page_limit,
        })
    }
}

fn parse_page_limit(raw: &str) -> Result<u32, ValidationError> {
    let raw = raw.trim();
    // Parse as signed first so "-5" reports as non-positive rather than garbage.
    let value: i64 = raw
        .parse()
        .map_err(|_| ValidationError::InvalidPageLimit(raw.to_string()))?;
    if value <= 0 {
        return Err(ValidationError::NonPositivePageLimit);
    }
    u32::try_from(value).map_err(|_| ValidationError::InvalidPageLimit(raw.to_string()))
}

fn is_http_url(raw: &str) -> bool {
    Url::parse(raw)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
        .unwrap_or(false)
}
