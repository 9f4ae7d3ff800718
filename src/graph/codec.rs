// src/graph/codec.rs
// =============================================================================
// Reads and writes the flat edge list format:
//
//   1000
//   /wiki/Tennis /wiki/Racket_sport
//   /wiki/Tennis /wiki/Wimbledon_Championships
//   ...
//
// Line 1 is the declared vertex count (the crawl cap). Every other line is
// one directed edge, source first, separated by a single space.
// =============================================================================

use super::{EdgeList, Graph, GraphError};
use std::fs;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;
use tracing::warn;

/// Writes `list` in file order.
pub fn write_edge_list<W: Write>(writer: &mut W, list: &EdgeList) -> io::Result<()> {
    writeln!(writer, "{}", list.declared_vertices())?;
    for (source, target) in list.edges() {
        writeln!(writer, "{} {}", source, target)?;
    }
    Ok(())
}

/// Renders the whole file in memory, then writes it in one go.
pub fn save(path: &Path, list: &EdgeList) -> Result<(), GraphError> {
    let mut buffer = Vec::new();
    let io_error = |source: io::Error| GraphError::Io {
        source,
        path: path.to_path_buf(),
    };

    write_edge_list(&mut buffer, list).map_err(io_error)?;
    fs::write(path, buffer).map_err(io_error)
}

pub fn load(path: &Path) -> Result<Graph, GraphError> {
    let file = fs::File::open(path).map_err(|source| GraphError::Io {
        source,
        path: path.to_path_buf(),
    })?;
    read_lines(BufReader::new(file), path)
}

fn read_lines<R: BufRead>(reader: R, path: &Path) -> Result<Graph, GraphError> {
    let mut lines = reader.lines();
    let io_error = |source: io::Error| GraphError::Io {
        source,
        path: path.to_path_buf(),
    };

    let header = lines.next().ok_or(GraphError::MissingHeader)?.map_err(io_error)?;
    let declared: usize = header
        .trim()
        .parse()
        .map_err(|_| GraphError::BadHeader(header.clone()))?;

    let mut edges = Vec::new();
    for (i, line) in lines.enumerate() {
        let line = line.map_err(io_error)?;
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }
        edges.push(parse_edge(line, i + 2)?);
    }

    let graph = Graph::from_edges(declared, edges);
    if graph.vertex_count() != graph.declared_vertices() {
        warn!(
            declared = graph.declared_vertices(),
            discovered = graph.vertex_count(),
            "number of vertices is not consistent, using the discovered count"
        );
    }

    Ok(graph)
}

fn parse_edge(line: &str, line_number: usize) -> Result<(String, String), GraphError> {
    let malformed = || GraphError::MalformedEdge {
        line: line_number,
        content: line.to_string(),
    };

    let (source, target) = line.split_once(' ').ok_or_else(malformed)?;
    let broken = |token: &str| token.is_empty() || token.contains(char::is_whitespace);
    if broken(source) || broken(target) {
        return Err(malformed());
    }

    Ok((source.to_string(), target.to_string()))
}
