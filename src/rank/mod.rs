// src/rank/mod.rs
// =============================================================================
// This module ranks the pages of a loaded graph.
//
// Submodules:
// - pagerank: Power iteration PageRank
// - stats: Top-k selection and Jaccard similarity
// - report: The human-readable (and JSON) result summary
//
// `Ranking` is the piece the rest of the program talks to: it owns the graph
// and its rank vector, and hands out top-k lists per metric.
// =============================================================================

mod pagerank;
mod report;
mod stats;

use crate::graph::Graph;
use std::collections::HashMap;
use thiserror::Error;

pub use pagerank::{PageRank, DAMPING};
pub use report::Report;
pub use stats::{jaccard, top_k};

#[derive(Debug, Error)]
pub enum RankError {
    #[error("the graph has no vertices")]
    EmptyGraph,

    #[error("epsilon must be a positive number, got {0}")]
    InvalidEpsilon(f64),

    #[error("pagerank did not converge after {iterations} iterations (last delta {delta})")]
    NotConverged { iterations: usize, delta: f64 },

    #[error("k = {k} is out of bounds for a graph with {vertices} vertices")]
    KOutOfBounds { k: usize, vertices: usize },

    #[error("the list is empty")]
    EmptySet,

    #[error("unknown page {0}")]
    UnknownVertex(String),
}

/// What to rank pages by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Rank,
    InDegree,
    OutDegree,
}

pub struct Ranking {
    graph: Graph,
    pagerank: PageRank,
    // (metric, k) -> pages, filled on first request
    top: HashMap<(Metric, usize), Vec<String>>,
}

impl Ranking {
    /// Runs PageRank on `graph` right away; the result never changes after.
    pub fn new(graph: Graph, epsilon: f64) -> Result<Self, RankError> {
        let pagerank = PageRank::compute(&graph, epsilon)?;
        Ok(Self {
            graph,
            pagerank,
            top: HashMap::new(),
        })
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn pagerank(&self) -> &PageRank {
        &self.pagerank
    }

    pub fn page_rank_of(&self, page: &str) -> Result<f64, RankError> {
        self.graph
            .index_of(page)
            .map(|i| self.pagerank.ranks()[i])
            .ok_or_else(|| RankError::UnknownVertex(page.to_string()))
    }

    pub fn in_degree_of(&self, page: &str) -> usize {
        self.graph.in_degree(page)
    }

    pub fn out_degree_of(&self, page: &str) -> usize {
        self.graph.out_degree(page)
    }

    /// One value per vertex, indexed like `Graph::vertices`.
    pub fn metric(&self, metric: Metric) -> Vec<f64> {
        match metric {
            Metric::Rank => self.pagerank.ranks().to_vec(),
            Metric::InDegree => self.degrees(|v| self.graph.in_degree(v)),
            Metric::OutDegree => self.degrees(|v| self.graph.out_degree(v)),
        }
    }

    pub fn top_k(&mut self, metric: Metric, k: usize) -> Result<Vec<String>, RankError> {
        if let Some(pages) = self.top.get(&(metric, k)) {
            return Ok(pages.clone());
        }

        let pages = top_k(self.graph.vertices(), &self.metric(metric), k)?;
        self.top.insert((metric, k), pages.clone());
        Ok(pages)
    }

    fn degrees(&self, degree: impl Fn(&str) -> usize) -> Vec<f64> {
        self.graph
            .vertices()
            .iter()
            .map(|v| degree(v.as_str()) as f64)
            .collect()
    }
}
