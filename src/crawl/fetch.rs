// src/crawl/fetch.rs
// =============================================================================
// HTTP fetching for the crawler.
//
// One reqwest Client is built per run and reused for every page (it keeps a
// connection pool internally). Each request gets the configured timeout, so
// a server that never answers fails that URL instead of stalling the crawl.
// =============================================================================

use anyhow::{anyhow, Context, Result};
use reqwest::Client;

use crate::config::CrawlConfig;

const MAX_REDIRECTS: usize = 10;

pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(config: &CrawlConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    // Fetches a page and returns its body as text
    //
    // Redirects are followed. Any non-2xx status is an error, so error pages
    // never end up in the output file.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(anyhow!("HTTP {}", response.status()));
        }

        let html = response.text().await?;
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{Method::GET, MockServer};

    fn fetcher() -> Fetcher {
        let mut config = CrawlConfig::new("http://localhost/");
        config.timeout_secs = 5;
        Fetcher::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/docs/page");
                then.status(200).body("<main>hi</main>");
            })
            .await;

        let body = fetcher().fetch(&server.url("/docs/page")).await.unwrap();
        assert_eq!(body, "<main>hi</main>");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_sends_user_agent() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/")
                    .header("user-agent", "test-agent/1.0");
                then.status(200).body("ok");
            })
            .await;

        let mut config = CrawlConfig::new("http://localhost/");
        config.user_agent = "test-agent/1.0".to_string();
        let fetcher = Fetcher::new(&config).unwrap();

        assert_eq!(fetcher.fetch(&server.url("/")).await.unwrap(), "ok");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_error_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/missing");
                then.status(404);
            })
            .await;

        let err = fetcher().fetch(&server.url("/missing")).await.unwrap_err();
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn test_fetch_follows_redirects() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/old");
                then.status(301).header("location", "/new");
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/new");
                then.status(200).body("moved");
            })
            .await;

        assert_eq!(fetcher().fetch(&server.url("/old")).await.unwrap(), "moved");
    }
}
