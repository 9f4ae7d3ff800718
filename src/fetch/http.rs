// src/fetch/http.rs
// =============================================================================
// The production fetcher: plain GET requests through one shared reqwest client.
//
// Key functionality:
// - One client for the whole run (connection pooling)
// - 10 second timeout, a handful of redirects at most
// - Anything other than a 2xx status is an error for the caller to handle
//
// Requests are awaited one at a time by the crawler, so there is no
// concurrency to manage here.
// =============================================================================

use super::Fetcher;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(concat!("topic-rank/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to create HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    // Fetches a resource and returns its body as text
    async fn fetch(&self, url: &Url) -> Result<String> {
        let response = self.client.get(url.clone()).send().await?;

        if !response.status().is_success() {
            return Err(anyhow!("HTTP {}", response.status()));
        }

        let body = response.text().await?;
        Ok(body)
    }
}
