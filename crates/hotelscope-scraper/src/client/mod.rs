//! HTTP client for the booking site's search-results pages.

use std::time::Duration;

use hotelscope_core::{AppConfig, SearchQuery};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Url};

use crate::error::ScraperError;
use crate::pagination::PageSource;
use crate::rate_limit::retry_with_backoff;

const SEARCH_PATH: &str = "/searchresults.zh-tw.html";
const REFERER_PATH: &str = "/index.en-gb.html";

const GROUP_ADULTS: &str = "2";
const CURRENCY: &str = "TWD";
const LANGUAGE: &str = "en-us";
const SORT_ORDER: &str = "distance_from_search";

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.9";

/// Fetches search-results pages with a fixed browser-like header set.
///
/// Non-2xx responses are errors: a 429 becomes [`ScraperError::RateLimited`],
/// anything else [`ScraperError::UnexpectedStatus`]. Retries are off unless
/// `max_retries` is non-zero.
#[derive(Debug, Clone)]
pub struct BookingClient {
    client: Client,
    base_url: Url,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl BookingClient {
    /// Creates a client for the site at `base_url` (scheme and host, e.g.
    /// `https://www.booking.com`).
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidBaseUrl`] if `base_url` does not parse.
    /// - [`ScraperError::Http`] if the underlying `reqwest::Client` cannot be built.
    pub fn new(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ScraperError> {
        let base_url = Url::parse(base_url).map_err(|e| ScraperError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .default_headers(default_headers(&base_url)?)
            .build()?;

        Ok(Self {
            client,
            base_url,
            max_retries,
            backoff_base_secs,
        })
    }

    /// Creates a client from the application's scraper settings.
    ///
    /// # Errors
    ///
    /// See [`Self::new`].
    pub fn from_app_config(config: &AppConfig) -> Result<Self, ScraperError> {
        Self::new(
            &config.base_url,
            config.request_timeout_secs,
            &config.user_agent,
            config.max_retries,
            config.retry_backoff_base_secs,
        )
    }

    /// Builds the results URL for `query` starting at listing `offset`.
    #[must_use]
    pub fn search_url(&self, query: &SearchQuery, offset: usize) -> String {
        let mut url = self.base_url.clone();
        url.set_path(SEARCH_PATH);
        url.query_pairs_mut()
            .clear()
            .append_pair("ss", &query.location)
            .append_pair("checkin", &query.checkin_iso())
            .append_pair("checkout", &query.checkout_iso())
            .append_pair("group_adults", GROUP_ADULTS)
            .append_pair("selected_currency", CURRENCY)
            .append_pair("lang", LANGUAGE)
            .append_pair("soz", "1")
            .append_pair("order", SORT_ORDER)
            .append_pair("offset", &offset.to_string());
        url.to_string()
    }

    /// Fetches one results page as HTML text.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::RateLimited`] on HTTP 429.
    /// - [`ScraperError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`ScraperError::Http`] on transport failure.
    pub async fn fetch_results_page(
        &self,
        query: &SearchQuery,
        offset: usize,
    ) -> Result<String, ScraperError> {
        let url = self.search_url(query, offset);

        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.clone();
            async move {
                let response = self.client.get(&url).send().await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(60);
                    return Err(ScraperError::RateLimited {
                        domain: self.base_url.host_str().unwrap_or_default().to_owned(),
                        retry_after_secs,
                    });
                }

                if !status.is_success() {
                    return Err(ScraperError::UnexpectedStatus {
                        status: status.as_u16(),
                        url,
                    });
                }

                Ok(response.text().await?)
            }
        })
        .await
    }
}

impl PageSource for BookingClient {
    async fn fetch_page(&self, query: &SearchQuery, offset: usize) -> Result<String, ScraperError> {
        self.fetch_results_page(query, offset).await
    }
}

fn default_headers(base_url: &Url) -> Result<HeaderMap, ScraperError> {
    let mut referer = base_url.clone();
    referer.set_path(REFERER_PATH);
    referer.set_query(None);

    let mut headers = HeaderMap::new();
    let pairs = [
        (reqwest::header::CONNECTION, "keep-alive"),
        (reqwest::header::PRAGMA, "no-cache"),
        (reqwest::header::CACHE_CONTROL, "no-cache"),
        (HeaderName::from_static("dnt"), "1"),
        (reqwest::header::UPGRADE_INSECURE_REQUESTS, "1"),
        (reqwest::header::ACCEPT, ACCEPT_HTML),
    ];
    for (name, value) in pairs {
        headers.insert(name, HeaderValue::from_static(value));
    }

    let referer = HeaderValue::from_str(referer.as_str()).map_err(|e| {
        ScraperError::InvalidBaseUrl {
            base_url: base_url.to_string(),
            reason: format!("cannot build Referer header: {e}"),
        }
    })?;
    headers.insert(reqwest::header::REFERER, referer);

    Ok(headers)
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
