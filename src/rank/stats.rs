// src/rank/stats.rs
// Top-k selection over a per-vertex metric, and Jaccard similarity of two
// page sets.

use super::RankError;
use std::collections::HashMap;

/// The `k` vertices with the largest metric values, largest first.
///
/// `metric[i]` belongs to `vertices[i]`. Equal values are ordered by
/// ascending identifier so the result is the same on every run.
pub fn top_k(vertices: &[String], metric: &[f64], k: usize) -> Result<Vec<String>, RankError> {
    if k > vertices.len() {
        return Err(RankError::KOutOfBounds {
            k,
            vertices: vertices.len(),
        });
    }

    let mut pairs: Vec<(&str, f64)> = vertices
        .iter()
        .map(String::as_str)
        .zip(metric.iter().copied())
        .collect();
    pairs.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    Ok(pairs.into_iter().take(k).map(|(id, _)| id.to_string()).collect())
}

/// |A ∩ B| / |A ∪ B|. Both sets must be non-empty.
pub fn jaccard(a: &[String], b: &[String]) -> Result<f64, RankError> {
    if a.is_empty() || b.is_empty() {
        return Err(RankError::EmptySet);
    }

    // give every page in the union a position
    let mut positions: HashMap<&str, usize> = HashMap::new();
    for page in a.iter().chain(b) {
        let next = positions.len();
        positions.entry(page.as_str()).or_insert(next);
    }

    let signature = |pages: &[String]| {
        let mut bits = vec![false; positions.len()];
        for page in pages {
            bits[positions[page.as_str()]] = true;
        }
        bits
    };
    let (in_a, in_b) = (signature(a), signature(b));

    let intersection = in_a.iter().zip(&in_b).filter(|(x, y)| **x && **y).count();
    Ok(intersection as f64 / positions.len() as f64)
}
