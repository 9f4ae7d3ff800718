// src/rank/pagerank.rs
// =============================================================================
// PageRank by power iteration.
//
// One step, for a graph with n vertices and damping β:
// - every vertex starts the step with (1 - β) / n
// - a vertex with successors hands β * rank / out_degree to each successor
// - a dangling vertex (no successors) spreads β * rank / n over every vertex,
//   so its mass is not lost
//
// We stop once the L1 distance between two consecutive vectors is at most ε
// and keep the newer one. Nothing renormalizes the vector afterwards.
// =============================================================================

use super::RankError;
use crate::graph::Graph;
use tracing::{debug, info};

pub const DAMPING: f64 = 0.85;

/// Upper bound on steps, for ε too small for f64 to ever reach.
pub const MAX_ITERATIONS: usize = 10_000;

#[derive(Debug, Clone)]
pub struct PageRank {
    ranks: Vec<f64>,
    iterations: usize,
    delta: f64,
}

impl PageRank {
    pub fn compute(graph: &Graph, epsilon: f64) -> Result<Self, RankError> {
        if !(epsilon > 0.0 && epsilon.is_finite()) {
            return Err(RankError::InvalidEpsilon(epsilon));
        }

        let n = graph.vertex_count();
        if n == 0 {
            return Err(RankError::EmptyGraph);
        }

        // successors by dense index, in file order
        let successors: Vec<Vec<usize>> = graph
            .vertices()
            .iter()
            .map(|v| {
                graph
                    .successors(v)
                    .iter()
                    .filter_map(|s| graph.index_of(s))
                    .collect()
            })
            .collect();

        let mut ranks = vec![1.0 / n as f64; n];
        let mut iterations = 0;

        loop {
            let next = step(&ranks, &successors);
            let delta = l1_distance(&next, &ranks);
            ranks = next;
            iterations += 1;
            debug!(iterations, delta, "pagerank step");

            if delta <= epsilon {
                info!(iterations, delta, "pagerank converged");
                return Ok(Self {
                    ranks,
                    iterations,
                    delta,
                });
            }

            if iterations >= MAX_ITERATIONS {
                return Err(RankError::NotConverged { iterations, delta });
            }
        }
    }

    /// Final rank vector, indexed like `Graph::vertices`.
    pub fn ranks(&self) -> &[f64] {
        &self.ranks
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// L1 distance between the last two vectors.
    pub fn delta(&self) -> f64 {
        self.delta
    }
}

fn step(ranks: &[f64], successors: &[Vec<usize>]) -> Vec<f64> {
    let n = ranks.len() as f64;
    let mut next = vec![(1.0 - DAMPING) / n; ranks.len()];
    let mut dangling = 0.0;

    for (i, targets) in successors.iter().enumerate() {
        if targets.is_empty() {
            dangling += DAMPING * ranks[i] / n;
        } else {
            let share = DAMPING * ranks[i] / targets.len() as f64;
            for &j in targets {
                next[j] += share;
            }
        }
    }

    if dangling > 0.0 {
        for value in next.iter_mut() {
            *value += dangling;
        }
    }

    next
}

fn l1_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Graph {
        Graph::from_edges(3, [("A", "B"), ("A", "C"), ("B", "C"), ("C", "A")])
    }

    fn rank(graph: &Graph, pr: &PageRank, id: &str) -> f64 {
        pr.ranks()[graph.index_of(id).unwrap()]
    }

    #[test]
    fn test_triangle_converges_to_fixed_point() {
        let graph = triangle();
        let pr = PageRank::compute(&graph, 0.0001).unwrap();

        assert_eq!(pr.iterations(), 17);
        assert!(pr.delta() <= 0.0001);

        // exact solution of r = (1 - β)/n + β M r
        let (a, b, c) = (rank(&graph, &pr, "A"), rank(&graph, &pr, "B"), rank(&graph, &pr, "C"));
        assert!((a - 0.387790).abs() < 1e-3, "A = {a}");
        assert!((b - 0.214811).abs() < 1e-3, "B = {b}");
        assert!((c - 0.397400).abs() < 1e-3, "C = {c}");
        assert!(a < c);
        assert!(b < a);
    }

    #[test]
    fn test_dangling_mass_is_not_lost() {
        // C and D have no outgoing edges
        let graph = Graph::from_edges(4, [("A", "B"), ("B", "C"), ("A", "D")]);
        let pr = PageRank::compute(&graph, 1e-8).unwrap();

        let sum: f64 = pr.ranks().iter().sum();
        assert!((sum - 1.0).abs() < 1e-9, "sum = {sum}");
        assert!(pr.ranks().iter().all(|&r| r >= 0.0));
        assert!(rank(&graph, &pr, "C") > rank(&graph, &pr, "A"));
    }

    #[test]
    fn test_single_self_loop() {
        let graph = Graph::from_edges(1, [("A", "A")]);
        let pr = PageRank::compute(&graph, 0.01).unwrap();
        assert_eq!(pr.iterations(), 1);
        assert!((pr.ranks()[0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_bad_input() {
        let graph = triangle();
        assert!(matches!(PageRank::compute(&graph, 0.0), Err(RankError::InvalidEpsilon(_))));
        assert!(matches!(PageRank::compute(&graph, f64::NAN), Err(RankError::InvalidEpsilon(_))));
        assert!(matches!(
            PageRank::compute(&Graph::default(), 0.01),
            Err(RankError::EmptyGraph)
        ));
    }
}
