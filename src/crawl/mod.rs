// src/crawl/mod.rs
// =============================================================================
// This module builds the topic graph by crawling the wiki.
//
// Features:
// - Breadth-first crawling starting from a seed page
// - Only pages under /wiki/ that mention every keyword are admitted
// - Respects robots.txt (Disallow: /wiki/... entries)
// - Hard cap on the number of vertices
// - Polite crawling: a pause after every 100 requests
//
// Submodules:
// - robots: Loads the exclusion list before the crawl starts
// - topic: The keyword membership test
// - links: Pulls candidate links out of a rendered page
// - queue: The frontier controller that ties it all together
// =============================================================================

mod links;
mod queue;
mod robots;
mod topic;

use thiserror::Error;

pub use queue::{CrawlConfig, Crawler};
pub use robots::{load_exclusions, ExclusionSet, RetryPolicy};
pub use topic::TopicFilter;

/// Every crawlable page identifier starts with this prefix.
pub const WIKI_NAMESPACE: &str = "/wiki/";

#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("keywords can not be empty")]
    EmptyKeywords,

    #[error("maximum number of pages to crawl must be greater than 0")]
    ZeroCapacity,

    #[error("{0} is not a valid wiki page")]
    InvalidSeed(String),

    #[error("{0} does not contain all keywords")]
    SeedOffTopic(String),
}
