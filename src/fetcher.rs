use crate::error::ExtractError;
use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::Client;
use std::time::Duration;

/// Default page-fetch deadline. Slow third-party sites fail fast instead of
/// hanging the whole extraction request.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(8);

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";
const BROWSER_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";
const BROWSER_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Thin HTTP wrapper around the page fetch. Sends browser-like headers to
/// reduce anti-bot rejection and enforces the fetch timeout.
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new(timeout: Option<Duration>) -> Result<Self, ExtractError> {
        let timeout = timeout.unwrap_or(DEFAULT_FETCH_TIMEOUT);

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static(BROWSER_ACCEPT_LANGUAGE),
        );

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(PageFetcher { client })
    }

    /// Fetch a page body. Timeouts, network failures and non-2xx statuses are
    /// surfaced as distinct errors; the caller decides what the user sees.
    pub async fn fetch(&self, url: &str) -> Result<String, ExtractError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                warn!("Fetch timed out for {}", url);
                ExtractError::Timeout
            } else {
                warn!("Fetch failed for {}: {}", url, e);
                ExtractError::Fetch(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            // 403 usually means the site's scraping defenses fired; the
            // distinction matters for diagnosis but never reaches the user.
            warn!("Upstream returned {} for {}", status, url);
            return Err(ExtractError::UpstreamStatus(status.as_u16()));
        }

        let body = response.text().await.map_err(ExtractError::Fetch)?;
        debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/recipe")
            .with_status(200)
            .with_body("<html><body>hi</body></html>")
            .create_async()
            .await;

        let fetcher = PageFetcher::new(None).unwrap();
        let body = fetcher
            .fetch(&format!("{}/recipe", server.url()))
            .await
            .unwrap();
        assert!(body.contains("hi"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_403_surfaced_as_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/blocked")
            .with_status(403)
            .create_async()
            .await;

        let fetcher = PageFetcher::new(None).unwrap();
        let err = fetcher
            .fetch(&format!("{}/blocked", server.url()))
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::UpstreamStatus(403)));
    }

    #[tokio::test]
    async fn test_browser_headers_sent() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/ua")
            .match_header("user-agent", mockito::Matcher::Regex("Mozilla".to_string()))
            .match_header("accept-language", "en-US,en;q=0.9")
            .with_status(200)
            .with_body("ok")
            .create_async()
            .await;

        let fetcher = PageFetcher::new(None).unwrap();
        fetcher.fetch(&format!("{}/ua", server.url())).await.unwrap();
        mock.assert_async().await;
    }
}
