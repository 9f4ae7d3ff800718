// src/crawl/robots.rs
// =============================================================================
// Loads the origin's robots.txt and keeps every "Disallow: /wiki/..." entry.
//
// The crawl must not start without this list, so a failed fetch is retried
// after a fixed delay. With the default policy that means forever: if the
// origin is unreachable the crawl blocks here. Page fetches later on take the
// opposite approach and skip on failure.
// =============================================================================

use super::WIKI_NAMESPACE;
use crate::fetch::{FetchContext, Fetcher};
use anyhow::Result;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{info, warn};

const DISALLOW_MARKER: &str = "Disallow: /wiki/";

/// How to retry the robots.txt fetch.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub delay: Duration,
    /// None = keep trying until it works
    pub max_attempts: Option<usize>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(3),
            max_attempts: None,
        }
    }
}

/// Page identifiers the origin asks us not to crawl. Frozen once loaded.
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    paths: HashSet<String>,
}

impl ExclusionSet {
    pub fn contains(&self, id: &str) -> bool {
        self.paths.contains(id)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl FromIterator<String> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().collect(),
        }
    }
}

pub fn parse_robots(text: &str) -> ExclusionSet {
    text.lines()
        .filter(|line| line.contains(DISALLOW_MARKER))
        .filter_map(|line| {
            line.find(WIKI_NAMESPACE)
                .map(|start| line[start..].trim().to_string())
        })
        .collect()
}

pub async fn load_exclusions<F: Fetcher>(
    ctx: &mut FetchContext<F>,
    policy: &RetryPolicy,
) -> Result<ExclusionSet> {
    let mut attempt = 0;

    loop {
        attempt += 1;

        match ctx.robots().await {
            Ok(text) => {
                let exclusions = parse_robots(&text);
                if exclusions.is_empty() {
                    warn!("robots.txt has no {} entries", DISALLOW_MARKER);
                } else {
                    info!(entries = exclusions.len(), "loaded robots.txt");
                }
                return Ok(exclusions);
            }
            Err(e) => {
                if policy.max_attempts.is_some_and(|max| attempt >= max) {
                    return Err(e.context(format!(
                        "failed to get robots.txt after {} attempt(s)",
                        attempt
                    )));
                }
                warn!(
                    attempt,
                    error = %e,
                    "failed to get robots.txt, retrying in {:?}",
                    policy.delay
                );
                tokio::time::sleep(policy.delay).await;
            }
        }
    }
}
