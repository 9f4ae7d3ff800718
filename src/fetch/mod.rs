// src/fetch/mod.rs
// =============================================================================
// This module is the only place that talks to the network.
//
// Submodules:
// - http: The real fetcher, built on reqwest
// - pacer: Counts requests and pauses after every N of them
// - context: Ties a fetcher, the origin, and the pacer together and knows how
//   to turn a page identifier into the three kinds of addresses we fetch
//
// Everything else in the crate depends on the `Fetcher` trait instead of
// reqwest directly, so crawl tests can run against an in-memory site.
// =============================================================================

mod context;
mod http;
mod pacer;

use anyhow::Result;
use async_trait::async_trait;
use url::Url;

pub use context::FetchContext;
pub use http::HttpFetcher;
pub use pacer::RequestPacer;

/// Something that can turn an absolute address into a text body.
#[async_trait]
pub trait Fetcher {
    async fn fetch(&self, url: &Url) -> Result<String>;
}
