//! HTTP fetcher for the ticket listing page
//!
//! One GET per call with a bounded timeout and browser-like headers. Retry
//! is layered on top by [`crate::crawler::fetch_with_retry`], never here.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

use crate::config::TargetConfig;
use crate::crawler::headers::build_browser_headers;
use crate::crawler::SnapshotSource;
use crate::error::Result;
use crate::models::Snapshot;
use crate::parser::TicketPageParser;
use crate::utils::error::FetchError;

/// Fetches the ticket page and extracts a [`Snapshot`] from it
pub struct TicketFetcher {
    /// HTTP client with configured timeout and compression
    client: Client,

    /// Page to fetch, also the base for relative purchase links
    page_url: Url,

    /// User agent sent with every request
    user_agent: String,

    parser: TicketPageParser,
}

impl TicketFetcher {
    /// Create a fetcher from the target configuration
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidUrl` for a malformed target URL and
    /// `FetchError::Http` if the HTTP client cannot be created
    pub fn new(config: &TargetConfig) -> std::result::Result<Self, FetchError> {
        Self::with_config(&config.url, config.request_timeout(), &config.user_agent)
    }

    /// Create a fetcher with explicit settings
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidUrl` for a malformed URL and
    /// `FetchError::Http` if the HTTP client cannot be created
    pub fn with_config(
        url: &str,
        timeout: Duration,
        user_agent: &str,
    ) -> std::result::Result<Self, FetchError> {
        let page_url = Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{url}: {e}")))?;

        let client = Client::builder().timeout(timeout).gzip(true).build()?;

        Ok(Self {
            client,
            page_url,
            user_agent: user_agent.to_string(),
            parser: TicketPageParser::new(),
        })
    }

    /// URL of the ticket page
    pub fn page_url(&self) -> &Url {
        &self.page_url
    }

    /// Fetch the raw page body
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Timeout` when the request exceeds the timeout,
    /// `FetchError::ServerError` for a non-2xx status, and
    /// `FetchError::Http` for other transport failures
    pub async fn fetch_page(&self) -> std::result::Result<String, FetchError> {
        let response = self
            .client
            .get(self.page_url.clone())
            .headers(build_browser_headers(&self.user_agent))
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::ServerError(status.as_u16()));
        }

        response.text().await.map_err(classify)
    }
}

#[async_trait]
impl SnapshotSource for TicketFetcher {
    async fn fetch(&self) -> Result<Snapshot> {
        let body = self.fetch_page().await?;
        let snapshot = self.parser.parse(&body, &self.page_url)?;

        tracing::debug!(
            aktobe = snapshot.aktobe.is_available,
            real_madrid = snapshot.real_madrid.is_available,
            "Fetched ticket snapshot"
        );

        Ok(snapshot)
    }

    fn source_url(&self) -> &str {
        self.page_url.as_str()
    }
}

fn classify(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Http(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_url_rejected() {
        let result = TicketFetcher::with_config("not a url", Duration::from_secs(10), "ua");
        assert!(matches!(result, Err(FetchError::InvalidUrl(_))));
    }

    #[test]
    fn test_page_url_kept() {
        let fetcher =
            TicketFetcher::with_config("https://tickets.example.kz/", Duration::from_secs(10), "ua")
                .unwrap();
        assert_eq!(fetcher.source_url(), "https://tickets.example.kz/");
    }
}
