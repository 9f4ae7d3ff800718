// src/crawl/topic.rs
// =============================================================================
// Decides whether a page is "about" the topic: its raw text has to contain
// every keyword.
//
// Matching rules:
// - Case-insensitive substring search, so "grand slam" must appear as is
// - Line by line; a keyword split across two lines does not count
// - Stops reading as soon as the last keyword is found
// =============================================================================

use super::CrawlError;
use crate::fetch::{FetchContext, Fetcher};
use anyhow::Result;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct TopicFilter {
    keywords: Vec<String>,
}

impl TopicFilter {
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> Result<Self, CrawlError> {
        let mut lowered: Vec<String> = Vec::new();
        for keyword in keywords {
            let keyword = keyword.as_ref().trim().to_lowercase();
            if !keyword.is_empty() && !lowered.contains(&keyword) {
                lowered.push(keyword);
            }
        }

        if lowered.is_empty() {
            return Err(CrawlError::EmptyKeywords);
        }

        Ok(Self { keywords: lowered })
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// True once every keyword has shown up on some line of `text`.
    pub fn matches(&self, text: &str) -> bool {
        let mut remaining: Vec<&str> = self.keywords.iter().map(String::as_str).collect();

        for line in text.lines() {
            let line = line.to_lowercase();
            remaining.retain(|keyword| !line.contains(keyword));
            if remaining.is_empty() {
                return true;
            }
        }

        false
    }

    /// Fetches the raw text of `id` and runs `matches` on it.
    pub async fn check<F: Fetcher>(&self, ctx: &mut FetchContext<F>, id: &str) -> Result<bool> {
        let text = ctx.raw_text(id).await?;
        let about = self.matches(&text);
        debug!(page = id, about, "topic check");
        Ok(about)
    }

    /// Like `check`, but a failed fetch counts as "not about the topic".
    pub async fn is_about_topic<F: Fetcher>(&self, ctx: &mut FetchContext<F>, id: &str) -> bool {
        match self.check(ctx, id).await {
            Ok(about) => about,
            Err(e) => {
                warn!(page = id, error = %e, "failed to fetch raw text, skipped");
                false
            }
        }
    }
}
