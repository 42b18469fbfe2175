//! Paginated review fetching from SerpAPI's Google Maps Reviews engine.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use reviewlens_core::{defaults, Error, Result};

pub const API_KEY_VAR: &str = "SERPAPI_KEY";
pub const BASE_URL_VAR: &str = "SERPAPI_BASE_URL";

/// Fetcher settings.
#[derive(Debug, Clone)]
pub struct SerpApiConfig {
    pub base_url: String,
    pub api_key: String,
    /// Reviews per page; the `start` offset advances by this much.
    pub page_size: u32,
    /// Hard stop to bound API usage.
    pub max_pages: u32,
    /// Pause after each page that returned reviews.
    pub page_delay: Duration,
    pub timeout_seconds: u64,
}

impl SerpApiConfig {
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            base_url: defaults::SERPAPI_URL.to_string(),
            api_key: api_key.into(),
            page_size: defaults::FETCH_PAGE_SIZE,
            max_pages: defaults::FETCH_MAX_PAGES,
            page_delay: Duration::from_millis(defaults::FETCH_DELAY_MS),
            timeout_seconds: defaults::FETCH_TIMEOUT_SECS,
        }
    }

    /// Load from environment; a missing `SERPAPI_KEY` is fatal.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var(API_KEY_VAR)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| Error::Config(format!("{} is not set", API_KEY_VAR)))?;

        let mut config = Self::with_api_key(api_key.trim());
        if let Ok(url) = env::var(BASE_URL_VAR) {
            if !url.trim().is_empty() {
                config.base_url = url;
            }
        }
        Ok(config)
    }
}

/// The parts of a SerpAPI response page we look at.
#[derive(Debug, Deserialize)]
struct ReviewsPage {
    #[serde(default)]
    reviews: Option<Vec<Value>>,
    #[serde(default)]
    error: Option<String>,
}

/// SerpAPI client bound to one API key.
pub struct SerpApiClient {
    client: Client,
    config: SerpApiConfig,
}

impl SerpApiClient {
    pub fn new(config: SerpApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &SerpApiConfig {
        &self.config
    }

    /// Fetch one page; `None` means the listing is exhausted.
    async fn fetch_page(&self, place_id: &str, page: u32) -> Result<Option<Vec<Value>>> {
        let start = page * self.config.page_size;
        let response = self
            .client
            .get(&self.config.base_url)
            .query(&[
                ("engine", defaults::SERPAPI_ENGINE),
                ("place_id", place_id),
                ("api_key", self.config.api_key.as_str()),
                ("hl", "en"),
            ])
            .query(&[("start", start)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Request(format!(
                "SerpAPI returned {} for page {}: {}",
                status, page, body
            )));
        }

        let page_body: ReviewsPage = response.json().await?;
        if let Some(message) = page_body.error {
            warn!(place_id, page, error = %message, "SerpAPI reported an error, stopping");
            return Ok(None);
        }

        Ok(page_body.reviews.filter(|r| !r.is_empty()))
    }

    /// Fetch every review for `place_id`, page by page.
    pub async fn fetch_reviews(&self, place_id: &str) -> Result<Vec<Value>> {
        let mut reviews = Vec::new();
        let mut page = 0;

        loop {
            if page >= self.config.max_pages {
                warn!(
                    place_id,
                    max_pages = self.config.max_pages,
                    "Reached page limit, stopping"
                );
                break;
            }

            let Some(batch) = self.fetch_page(place_id, page).await? else {
                debug!(place_id, page, "No more reviews");
                break;
            };

            reviews.extend(batch);
            page += 1;
            info!(place_id, page, record_count = reviews.len(), "Fetched page");

            if !self.config.page_delay.is_zero() {
                tokio::time::sleep(self.config.page_delay).await;
            }
        }

        Ok(reviews)
    }
}

/// Write raw reviews as `<dir>/<name>.json`.
pub fn save_raw(dir: &Path, name: &str, reviews: &[Value]) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.json", name));
    fs::write(&path, serde_json::to_string_pretty(reviews)?)?;
    info!(path = %path.display(), record_count = reviews.len(), "Saved raw reviews");
    Ok(path)
}
