// src/crawl/links.rs
// =============================================================================
// This module pulls candidate links out of a rendered wiki page.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Is built on html5ever (Mozilla's HTML parser)
//
// Only links in the article body count. Everything before the first <p>
// element (site header, navigation, infobox chrome) is skipped.
//
// The crawler never looks at HTML itself: it asks a `LinkParser` for the
// references of a document, so tests can hand it synthetic documents.
//
// An href with an unterminated quote would make html5ever swallow everything
// up to the next quote, including the next link. Such values are closed off
// before parsing so only the broken link is lost.
// =============================================================================

use super::WIKI_NAMESPACE;
use scraper::Html;
use std::borrow::Cow;

const HREF_MARKER: &str = "href=\"";

// Inserted in front of the next href marker when the previous value never
// closed: ends the value and the tag, then opens a fresh anchor.
const CLOSE_RUNAWAY: &str = "\"></a><a ";

/// One `href` found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    /// A trimmed, well-formed link target
    Target(String),
    /// A value that could not have come from a closed attribute
    Malformed(String),
}

/// Anything that can list the outbound references of a document, in order.
pub trait LinkParser {
    fn references(&self, document: &str) -> Vec<Reference>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlLinkParser;

impl LinkParser for HtmlLinkParser {
    fn references(&self, document: &str) -> Vec<Reference> {
        let html = Html::parse_document(&close_runaway_quotes(document));
        let mut in_body = false;
        let mut references = Vec::new();

        // Walk the tree in document order
        for node in html.root_element().descendants() {
            let Some(element) = node.value().as_element() else {
                continue;
            };

            match element.name() {
                "p" => in_body = true,
                "a" if in_body => {
                    if let Some(href) = element.attr("href") {
                        references.push(classify(href));
                    }
                }
                _ => {}
            }
        }

        references
    }
}

// A value with no closing quote before the next href marker runs into it.
fn close_runaway_quotes(document: &str) -> Cow<'_, str> {
    let values: Vec<usize> = document
        .match_indices(HREF_MARKER)
        .map(|(start, _)| start + HREF_MARKER.len())
        .collect();

    let mut repaired = String::new();
    let mut copied = 0;
    for pair in values.windows(2) {
        let next_marker = pair[1] - HREF_MARKER.len();
        if !document[pair[0]..next_marker].contains('"') {
            repaired.push_str(&document[copied..next_marker]);
            repaired.push_str(CLOSE_RUNAWAY);
            copied = next_marker;
        }
    }

    if copied == 0 {
        return Cow::Borrowed(document);
    }
    repaired.push_str(&document[copied..]);
    Cow::Owned(repaired)
}

// A closed-off runaway value still carries the markup it swallowed, so it
// shows up here with quotes, brackets, or whitespace.
fn classify(href: &str) -> Reference {
    let link = href.trim();
    let broken = link.is_empty()
        || link
            .chars()
            .any(|c| c == '"' || c == '<' || c == '>' || c.is_whitespace());

    if broken {
        Reference::Malformed(href.to_string())
    } else {
        Reference::Target(link.to_string())
    }
}

/// Whether a link may become a new vertex at all.
///
/// Links containing '#' point at sections of other pages, and links
/// containing ':' are files, categories, talk pages and the like.
pub fn is_crawlable(link: &str) -> bool {
    link.starts_with(WIKI_NAMESPACE) && !link.contains('#') && !link.contains(':')
}
