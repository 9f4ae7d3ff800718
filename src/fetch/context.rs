// src/fetch/context.rs
// =============================================================================
// The execution context every fetch goes through.
//
// A page identifier like "/wiki/Tennis" turns into three kinds of address:
//   rendered page:  https://en.wikipedia.org/wiki/Tennis
//   raw text:       https://en.wikipedia.org/w/index.php?title=Tennis&action=raw
//   robots.txt:     https://en.wikipedia.org/robots.txt
//
// Each fetch first asks the pacer for permission, so the request counter sees
// all traffic against the origin.
// =============================================================================

use super::{Fetcher, RequestPacer};
use crate::crawl::WIKI_NAMESPACE;
use anyhow::{Context, Result};
use url::Url;

pub struct FetchContext<F> {
    fetcher: F,
    origin: Url,
    pacer: RequestPacer,
}

impl<F: Fetcher> FetchContext<F> {
    pub fn new(fetcher: F, origin: Url, pacer: RequestPacer) -> Self {
        Self {
            fetcher,
            origin,
            pacer,
        }
    }

    /// Rendered HTML of a page.
    pub async fn page(&mut self, id: &str) -> Result<String> {
        let url = self.page_address(id)?;
        self.get(&url).await
    }

    /// Raw wikitext of a page, used for the keyword test.
    pub async fn raw_text(&mut self, id: &str) -> Result<String> {
        let url = self.raw_text_address(id)?;
        self.get(&url).await
    }

    pub async fn robots(&mut self) -> Result<String> {
        let url = self
            .origin
            .join("/robots.txt")
            .context("bad robots.txt address")?;
        self.get(&url).await
    }

    pub fn page_address(&self, id: &str) -> Result<Url> {
        self.origin
            .join(id)
            .with_context(|| format!("bad page identifier '{}'", id))
    }

    pub fn raw_text_address(&self, id: &str) -> Result<Url> {
        let title = id
            .strip_prefix(WIKI_NAMESPACE)
            .unwrap_or_else(|| id.trim_start_matches('/'));

        let mut url = self
            .origin
            .join("/w/index.php")
            .context("bad raw text address")?;
        // set_query keeps existing percent escapes in the title intact
        url.set_query(Some(&format!("title={}&action=raw", title)));
        Ok(url)
    }

    pub fn requests(&self) -> usize {
        self.pacer.requests()
    }

    pub fn pauses(&self) -> usize {
        self.pacer.pauses()
    }

    async fn get(&mut self, url: &Url) -> Result<String> {
        self.pacer.before_request().await;
        self.fetcher.fetch(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::StaticSite;
    use std::time::Duration;

    fn context() -> FetchContext<StaticSite> {
        let site = StaticSite::new()
            .with("https://en.wikipedia.org/wiki/Tennis", "<p>html</p>")
            .with(
                "https://en.wikipedia.org/w/index.php?title=Tennis&action=raw",
                "raw",
            );
        FetchContext::new(
            site,
            Url::parse("https://en.wikipedia.org").unwrap(),
            RequestPacer::new(100, Duration::ZERO),
        )
    }

    #[test]
    fn test_raw_text_address_keeps_escapes() {
        let ctx = context();
        let url = ctx.raw_text_address("/wiki/Caf%C3%A9_(tennis)").unwrap();
        assert_eq!(
            url.as_str(),
            "https://en.wikipedia.org/w/index.php?title=Caf%C3%A9_(tennis)&action=raw"
        );
    }

    #[tokio::test]
    async fn test_every_kind_of_fetch_is_counted() {
        let mut ctx = context();
        assert_eq!(ctx.page("/wiki/Tennis").await.unwrap(), "<p>html</p>");
        assert_eq!(ctx.raw_text("/wiki/Tennis").await.unwrap(), "raw");
        assert!(ctx.robots().await.is_err());
        assert_eq!(ctx.requests(), 3);
    }
}
