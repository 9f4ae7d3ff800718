// src/crawl/queue.rs
// =============================================================================
// This module implements the focused crawl with a breadth-first approach.
//
// How it works:
// 1. Check the seed page (valid, not excluded, about the topic) and queue it
// 2. Take the next page off the queue and fetch its HTML
// 3. Walk its links in order:
//    - a link we already admitted is always kept as an edge
//    - a new link is admitted only if it is a crawlable /wiki/ page, not in
//      robots.txt, the vertex cap is not reached yet, and its raw text
//      mentions every keyword; admitted links go to the back of the queue
// 4. Record the page's edges and repeat until the queue is empty
//
// Every page in the queue has already been admitted, so the queue drains
// even after the cap is hit; those pages just can't add new vertices.
// =============================================================================

use super::links::{is_crawlable, HtmlLinkParser, LinkParser, Reference};
use super::{CrawlError, ExclusionSet, TopicFilter};
use crate::fetch::{FetchContext, Fetcher};
use crate::graph::EdgeList;
use std::collections::{HashSet, VecDeque};
use tracing::{debug, info, warn};

/// What to crawl.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Relative identifier of the first page, e.g. "/wiki/Tennis"
    pub seed: String,
    /// Every admitted page must mention all of these
    pub keywords: Vec<String>,
    /// Maximum number of vertices in the graph
    pub max_vertices: usize,
}

/// The result of a finished crawl.
#[derive(Debug)]
pub struct CrawlOutcome {
    pub graph: EdgeList,
    pub visited: usize,
    pub requests: usize,
    pub pauses: usize,
}

pub struct Crawler<F> {
    ctx: FetchContext<F>,
    parser: Box<dyn LinkParser + Send + Sync>,
    topic: TopicFilter,
    exclusions: ExclusionSet,
    seed: String,
    max_vertices: usize,
    // Every page ever admitted. Never larger than max_vertices
    visited: HashSet<String>,
    // Pages whose raw text lacks a keyword; they never get a second fetch
    rejected: HashSet<String>,
    queue: VecDeque<String>,
}

impl<F: Fetcher> Crawler<F> {
    pub fn new(
        config: CrawlConfig,
        ctx: FetchContext<F>,
        exclusions: ExclusionSet,
    ) -> Result<Self, CrawlError> {
        let topic = TopicFilter::new(&config.keywords)?;

        if config.max_vertices == 0 {
            return Err(CrawlError::ZeroCapacity);
        }

        let seed = config.seed.trim().to_string();
        if !is_crawlable(&seed) || exclusions.contains(&seed) {
            return Err(CrawlError::InvalidSeed(seed));
        }

        Ok(Self {
            ctx,
            parser: Box::new(HtmlLinkParser),
            topic,
            exclusions,
            seed,
            max_vertices: config.max_vertices,
            visited: HashSet::new(),
            rejected: HashSet::new(),
            queue: VecDeque::new(),
        })
    }

    /// Swaps the HTML parser for another way of reading references.
    #[cfg(test)]
    pub fn with_parser<P>(mut self, parser: P) -> Self
    where
        P: LinkParser + Send + Sync + 'static,
    {
        self.parser = Box::new(parser);
        self
    }

    /// Runs the crawl to completion.
    ///
    /// Fails only if the seed itself is not about the topic; individual pages
    /// that can't be fetched are recorded without edges.
    pub async fn crawl(mut self) -> Result<CrawlOutcome, CrawlError> {
        let seed = self.seed.clone();
        if !self.topic.is_about_topic(&mut self.ctx, &seed).await {
            return Err(CrawlError::SeedOffTopic(seed));
        }

        info!(
            seed = %seed,
            keywords = ?self.topic.keywords(),
            max = self.max_vertices,
            "crawling"
        );
        self.admit(seed);

        let mut graph = EdgeList::new(self.max_vertices);
        while let Some(page) = self.queue.pop_front() {
            debug!(
                page = %page,
                queued = self.queue.len(),
                visited = self.visited.len(),
                requests = self.ctx.requests(),
                "expanding"
            );
            let edges = self.extract_links(&page).await;
            graph.push(page, edges);
        }

        Ok(CrawlOutcome {
            graph,
            visited: self.visited.len(),
            requests: self.ctx.requests(),
            pauses: self.ctx.pauses(),
        })
    }

    // Returns the outbound edges of `page`, admitting new vertices on the way.
    async fn extract_links(&mut self, page: &str) -> Vec<String> {
        let document = match self.ctx.page(page).await {
            Ok(document) => document,
            Err(e) => {
                warn!(page, error = %e, "failed to fetch page, recording it without links");
                return Vec::new();
            }
        };

        let references = self.parser.references(&document);

        // Each candidate is considered once per page, accepted or not
        let mut considered = HashSet::new();
        let mut edges = Vec::new();

        for reference in references {
            let link = match reference {
                Reference::Target(link) => link,
                Reference::Malformed(raw) => {
                    debug!(page, raw = %raw, "could not get link");
                    continue;
                }
            };

            if link == page || !considered.insert(link.clone()) {
                continue;
            }

            if self.visited.contains(&link) || self.try_admit(&link).await {
                edges.push(link);
            }
        }

        edges
    }

    // The gate for vertices we haven't seen before. Cheap checks first, the
    // topic test (one more request) last.
    async fn try_admit(&mut self, link: &str) -> bool {
        if self.visited.len() >= self.max_vertices {
            return false;
        }

        if !is_crawlable(link) || self.exclusions.contains(link) || self.rejected.contains(link) {
            return false;
        }

        match self.topic.check(&mut self.ctx, link).await {
            Ok(true) => {}
            Ok(false) => {
                self.rejected.insert(link.to_string());
                return false;
            }
            Err(e) => {
                // not remembered: the next page linking here tries again
                warn!(page = link, error = %e, "failed to fetch raw text, skipped");
                return false;
            }
        }

        self.admit(link.to_string());
        true
    }

    fn admit(&mut self, page: String) {
        debug_assert!(self.visited.len() < self.max_vertices);
        self.visited.insert(page.clone());
        self.queue.push_back(page);
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why a `rejected` set?
//    - The same off-topic page is usually linked from many admitted pages
//    - Its raw text can't change during one crawl, so one fetch is enough
//    - A failed raw text fetch is not a verdict, so it is not remembered
//
// 2. Why is the cap checked before the topic test?
//    - Once the graph is full no link can be admitted, and skipping the
//      check saves one request per candidate for the rest of the crawl
//
// 3. Why Box<dyn LinkParser>?
//    - The crawler only needs "give me the references of this document"
//    - Tests plug in their own parser; production uses HtmlLinkParser
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::StaticSite;
    use crate::fetch::RequestPacer;
    use std::time::Duration;
    use url::Url;

    const ORIGIN: &str = "https://wiki.test";
    const ON_TOPIC: &str = "Tennis is a sport.\nIt has four Grand Slam events.";
    const OFF_TOPIC: &str = "Tennis is a sport.\nNothing else here.";

    // Serves the rendered page of `id`, with `links` inside the first <p>
    fn with_page(site: StaticSite, id: &str, links: &[&str]) -> StaticSite {
        let anchors: String = links
            .iter()
            .map(|l| format!(r#"<a href="{}">x</a> "#, l))
            .collect();
        let html = format!(
            r#"<html><body><a href="/wiki/Main_Page">Main</a><p>{}</p></body></html>"#,
            anchors
        );
        site.with(&format!("{}{}", ORIGIN, id), &html)
    }

    // Serves the raw text of `id`
    fn with_text(site: StaticSite, id: &str, text: &str) -> StaticSite {
        let title = id.trim_start_matches("/wiki/");
        site.with(
            &format!("{}/w/index.php?title={}&action=raw", ORIGIN, title),
            text,
        )
    }

    fn crawler(site: StaticSite, max_vertices: usize, exclusions: ExclusionSet) -> Crawler<StaticSite> {
        let ctx = FetchContext::new(
            site,
            Url::parse(ORIGIN).unwrap(),
            RequestPacer::new(100, Duration::ZERO),
        );
        let config = CrawlConfig {
            seed: "/wiki/A".to_string(),
            keywords: vec!["tennis".to_string(), "grand slam".to_string()],
            max_vertices,
        };
        Crawler::new(config, ctx, exclusions).unwrap()
    }

    fn adjacency(list: &EdgeList) -> Vec<(&str, Vec<&str>)> {
        list.sources()
            .iter()
            .map(|(s, t)| (s.as_str(), t.iter().map(String::as_str).collect()))
            .collect()
    }

    fn tennis_site() -> StaticSite {
        let site = StaticSite::new();
        let site = with_page(
            site,
            "/wiki/A",
            &[
                "/wiki/B", "/wiki/C", "/wiki/B", "/wiki/A", "/wiki/File:Ball.jpg",
                "/wiki/D", "/wiki/E#History", "https://atp.test/",
            ],
        );
        let site = with_text(site, "/wiki/A", ON_TOPIC);
        let site = with_page(site, "/wiki/B", &["/wiki/C", "/wiki/A", "/wiki/D"]);
        let site = with_text(site, "/wiki/B", ON_TOPIC);
        let site = with_page(site, "/wiki/C", &["/wiki/A", "/wiki/F"]);
        let site = with_text(site, "/wiki/C", ON_TOPIC);
        let site = with_page(site, "/wiki/D", &["/wiki/A"]);
        let site = with_text(site, "/wiki/D", OFF_TOPIC);
        // F is on topic but its rendered page is missing
        with_text(site, "/wiki/F", ON_TOPIC)
    }

    #[tokio::test]
    async fn test_breadth_first_graph() {
        let outcome = crawler(tennis_site(), 10, ExclusionSet::default())
            .crawl()
            .await
            .unwrap();

        assert_eq!(
            adjacency(&outcome.graph),
            vec![
                ("/wiki/A", vec!["/wiki/B", "/wiki/C"]),
                ("/wiki/B", vec!["/wiki/C", "/wiki/A"]),
                ("/wiki/C", vec!["/wiki/A", "/wiki/F"]),
                ("/wiki/F", vec![]),
            ]
        );
        assert_eq!(outcome.visited, 4);
        assert_eq!(outcome.graph.declared_vertices(), 10);
    }

    #[tokio::test]
    async fn test_off_topic_page_is_never_queued_or_refetched() {
        let site = tennis_site();
        let outcome = crawler(site, 10, ExclusionSet::default())
            .crawl()
            .await
            .unwrap();

        assert!(outcome.graph.sources().iter().all(|(s, _)| s != "/wiki/D"));
        assert!(outcome.graph.edges().all(|(_, t)| t != "/wiki/D"));

        // seed raw + A page + B,C,D raw + B page + C page + F raw + F page
        assert_eq!(outcome.requests, 9);
    }

    #[tokio::test]
    async fn test_failed_topic_fetch_is_retried_on_next_link() {
        // G has no raw text, so every topic test on it fails to fetch
        let site = with_page(StaticSite::new(), "/wiki/A", &["/wiki/G", "/wiki/B"]);
        let site = with_text(site, "/wiki/A", ON_TOPIC);
        let site = with_page(site, "/wiki/B", &["/wiki/G"]);
        let site = with_text(site, "/wiki/B", ON_TOPIC);

        let outcome = crawler(site, 10, ExclusionSet::default())
            .crawl()
            .await
            .unwrap();

        assert_eq!(
            adjacency(&outcome.graph),
            vec![("/wiki/A", vec!["/wiki/B"]), ("/wiki/B", vec![])]
        );
        // seed raw + A page + G raw + B raw + B page + G raw again
        assert_eq!(outcome.requests, 6);
    }

    #[tokio::test]
    async fn test_cap_stops_new_vertices_but_keeps_known_edges() {
        let outcome = crawler(tennis_site(), 2, ExclusionSet::default())
            .crawl()
            .await
            .unwrap();

        assert_eq!(outcome.visited, 2);
        assert_eq!(
            adjacency(&outcome.graph),
            vec![("/wiki/A", vec!["/wiki/B"]), ("/wiki/B", vec!["/wiki/A"])]
        );
    }

    #[tokio::test]
    async fn test_excluded_pages_are_skipped() {
        let exclusions: ExclusionSet = ["/wiki/C".to_string()].into_iter().collect();
        let outcome = crawler(tennis_site(), 10, exclusions).crawl().await.unwrap();

        assert!(outcome.graph.edges().all(|(s, t)| s != "/wiki/C" && t != "/wiki/C"));
        assert_eq!(
            adjacency(&outcome.graph),
            vec![("/wiki/A", vec!["/wiki/B"]), ("/wiki/B", vec!["/wiki/A"])]
        );
    }

    #[tokio::test]
    async fn test_seed_off_topic() {
        let site = with_page(StaticSite::new(), "/wiki/A", &["/wiki/B"]);
        let site = with_text(site, "/wiki/A", OFF_TOPIC);
        let err = crawler(site, 10, ExclusionSet::default())
            .crawl()
            .await
            .unwrap_err();
        assert!(matches!(err, CrawlError::SeedOffTopic(_)));
    }

    #[test]
    fn test_constructor_validation() {
        let ctx = || {
            FetchContext::new(
                StaticSite::new(),
                Url::parse(ORIGIN).unwrap(),
                RequestPacer::default(),
            )
        };
        let config = |seed: &str, keywords: Vec<String>, max_vertices| CrawlConfig {
            seed: seed.to_string(),
            keywords,
            max_vertices,
        };
        let tennis = || vec!["tennis".to_string()];

        let err = Crawler::new(config("/wiki/A", vec![], 10), ctx(), ExclusionSet::default());
        assert!(matches!(err, Err(CrawlError::EmptyKeywords)));

        let err = Crawler::new(config("/wiki/A", tennis(), 0), ctx(), ExclusionSet::default());
        assert!(matches!(err, Err(CrawlError::ZeroCapacity)));

        let err = Crawler::new(config("/wiki/Talk:A", tennis(), 10), ctx(), ExclusionSet::default());
        assert!(matches!(err, Err(CrawlError::InvalidSeed(_))));

        let excluded: ExclusionSet = ["/wiki/A".to_string()].into_iter().collect();
        let err = Crawler::new(config("/wiki/A", tennis(), 10), ctx(), excluded);
        assert!(matches!(err, Err(CrawlError::InvalidSeed(_))));
    }

    // A parser that ignores the document and reports fixed references
    struct Scripted(Vec<Reference>);

    impl LinkParser for Scripted {
        fn references(&self, _document: &str) -> Vec<Reference> {
            self.0.clone()
        }
    }

    #[tokio::test]
    async fn test_malformed_reference_is_skipped() {
        let site = with_page(StaticSite::new(), "/wiki/A", &[]);
        let site = with_text(site, "/wiki/A", ON_TOPIC);
        let site = with_page(site, "/wiki/B", &[]);
        let site = with_text(site, "/wiki/B", ON_TOPIC);
        let parser = Scripted(vec![
            Reference::Malformed("/wiki/B>".to_string()),
            Reference::Target("/wiki/B".to_string()),
        ]);

        let outcome = crawler(site, 2, ExclusionSet::default())
            .with_parser(parser)
            .crawl()
            .await
            .unwrap();

        // B's page also reports B, which is a self reference there
        assert_eq!(
            adjacency(&outcome.graph),
            vec![("/wiki/A", vec!["/wiki/B"]), ("/wiki/B", vec![])]
        );
    }
}
