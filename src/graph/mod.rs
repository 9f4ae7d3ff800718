// src/graph/mod.rs
// =============================================================================
// The two shapes a graph takes in this program.
//
// - EdgeList: what the crawler produces. Sources in the order they were
//   expanded, each with its outbound links in the order they were found.
// - Graph: what the ranker consumes. Built from an edge list file, with both
//   directions of adjacency and a dense index (0..n) for every vertex.
//
// The codec submodule converts between the two through a flat text file.
// =============================================================================

mod codec;

use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;
use thiserror::Error;

pub use codec::{load, save};

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("I/O error: {source} (path: {path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("graph file is empty, expected a vertex count on the first line")]
    MissingHeader,

    #[error("bad vertex count '{0}' on line 1")]
    BadHeader(String),

    #[error("malformed edge on line {line}: '{content}'")]
    MalformedEdge { line: usize, content: String },
}

/// Crawl output, ready to be written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeList {
    declared_vertices: usize,
    sources: Vec<(String, Vec<String>)>,
}

impl EdgeList {
    pub fn new(declared_vertices: usize) -> Self {
        Self {
            declared_vertices,
            sources: Vec::new(),
        }
    }

    pub fn push(&mut self, source: String, targets: Vec<String>) {
        self.sources.push((source, targets));
    }

    pub fn declared_vertices(&self) -> usize {
        self.declared_vertices
    }

    #[cfg(test)]
    pub fn sources(&self) -> &[(String, Vec<String>)] {
        &self.sources
    }

    pub fn edge_count(&self) -> usize {
        self.sources.iter().map(|(_, targets)| targets.len()).sum()
    }

    /// Every (source, target) pair in file order.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.sources.iter().flat_map(|(source, targets)| {
            targets.iter().map(move |target| (source.as_str(), target.as_str()))
        })
    }
}

/// A loaded graph with in/out adjacency and a vertex index.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    declared_vertices: usize,
    out_edges: HashMap<String, Vec<String>>,
    in_edges: HashMap<String, Vec<String>>,
    vertices: Vec<String>,
    index: HashMap<String, usize>,
    edge_count: usize,
}

impl Graph {
    /// Builds the graph from edges in order. The vertex index follows
    /// ascending identifier order so it is the same on every run.
    pub fn from_edges<I, S>(declared_vertices: usize, edges: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        let mut graph = Graph {
            declared_vertices,
            ..Default::default()
        };
        let mut discovered = BTreeSet::new();

        for (source, target) in edges {
            let (source, target) = (source.into(), target.into());
            discovered.insert(source.clone());
            discovered.insert(target.clone());
            graph
                .out_edges
                .entry(source.clone())
                .or_default()
                .push(target.clone());
            graph.in_edges.entry(target).or_default().push(source);
            graph.edge_count += 1;
        }

        graph.vertices = discovered.into_iter().collect();
        graph.index = graph
            .vertices
            .iter()
            .enumerate()
            .map(|(i, v)| (v.clone(), i))
            .collect();
        graph
    }

    /// The count from the file header. May not match `vertex_count`.
    pub fn declared_vertices(&self) -> usize {
        self.declared_vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn vertices(&self) -> &[String] {
        &self.vertices
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn successors(&self, id: &str) -> &[String] {
        self.out_edges.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn predecessors(&self, id: &str) -> &[String] {
        self.in_edges.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn out_degree(&self, id: &str) -> usize {
        self.successors(id).len()
    }

    pub fn in_degree(&self, id: &str) -> usize {
        self.predecessors(id).len()
    }
}
