// src/rank/report.rs
// =============================================================================
// The result summary for a ranked graph.
//
// Text layout:
//   Page with Highest Rank: ... with Rank: ...
//   Page with Highest in-degree: ... with in-degree: ...
//   Page with Highest out-degree: ... with out-degree: ...
//
//   Top k highest rank pages:
//   1.  <page> with Rank: ...
//   ...
//   Number of Vertices: n; Number of Edges: m; Sum: <sum of the top 6 ranks>
//
//   Jaccard similarities between the three top-k sets
//   Iteration count
//
// The same data serializes to JSON for `--json`.
// =============================================================================

use super::{jaccard, Metric, RankError, Ranking};
use serde::Serialize;
use std::fmt;

// How many of the top ranks go into the "Sum" figure
const SUM_OF_TOP: usize = 6;

#[derive(Debug, Clone, Serialize)]
pub struct ScoredPage {
    pub page: String,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DegreePage {
    pub page: String,
    pub degree: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Similarity {
    pub rank_in_degree: f64,
    pub rank_out_degree: f64,
    pub in_out_degree: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub k: usize,
    pub highest_rank: ScoredPage,
    pub highest_in_degree: DegreePage,
    pub highest_out_degree: DegreePage,
    pub top_ranks: Vec<ScoredPage>,
    pub vertices: usize,
    pub edges: usize,
    pub top_rank_sum: f64,
    pub similarity: Similarity,
    pub iterations: usize,
}

impl Report {
    pub fn build(ranking: &mut Ranking, k: usize) -> Result<Self, RankError> {
        let vertices = ranking.graph().vertex_count();
        if k == 0 {
            return Err(RankError::KOutOfBounds { k, vertices });
        }

        let by_rank = ranking.top_k(Metric::Rank, k)?;
        let by_in = ranking.top_k(Metric::InDegree, k)?;
        let by_out = ranking.top_k(Metric::OutDegree, k)?;

        let top_ranks = by_rank
            .iter()
            .map(|page| {
                ranking.page_rank_of(page).map(|score| ScoredPage {
                    page: page.clone(),
                    score,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let top_rank_sum = ranking
            .top_k(Metric::Rank, SUM_OF_TOP.min(vertices))?
            .iter()
            .map(|page| ranking.page_rank_of(page))
            .sum::<Result<f64, _>>()?;

        Ok(Report {
            k,
            highest_rank: top_ranks[0].clone(),
            highest_in_degree: DegreePage {
                page: by_in[0].clone(),
                degree: ranking.in_degree_of(&by_in[0]),
            },
            highest_out_degree: DegreePage {
                page: by_out[0].clone(),
                degree: ranking.out_degree_of(&by_out[0]),
            },
            top_ranks,
            vertices,
            edges: ranking.graph().edge_count(),
            top_rank_sum,
            similarity: Similarity {
                rank_in_degree: jaccard(&by_rank, &by_in)?,
                rank_out_degree: jaccard(&by_rank, &by_out)?,
                in_out_degree: jaccard(&by_in, &by_out)?,
            },
            iterations: ranking.pagerank().iterations(),
        })
    }
}

impl fmt::Display for Report {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            out,
            "Page with Highest Rank: {} with Rank: {}",
            self.highest_rank.page, self.highest_rank.score
        )?;
        writeln!(
            out,
            "Page with Highest in-degree: {} with in-degree: {}",
            self.highest_in_degree.page, self.highest_in_degree.degree
        )?;
        writeln!(
            out,
            "Page with Highest out-degree: {} with out-degree: {}",
            self.highest_out_degree.page, self.highest_out_degree.degree
        )?;

        writeln!(out)?;
        writeln!(out, "Top {} highest rank pages:", self.k)?;
        for (i, entry) in self.top_ranks.iter().enumerate() {
            writeln!(out, "{}.\t{} with Rank: {}", i + 1, entry.page, entry.score)?;
        }
        writeln!(
            out,
            "Number of Vertices: {}; Number of Edges: {}; Sum: {}",
            self.vertices, self.edges, self.top_rank_sum
        )?;

        writeln!(out)?;
        let k = self.k;
        writeln!(
            out,
            "Jaccard Similarity between Top {} rank pages and in-degree pages: {}",
            k, self.similarity.rank_in_degree
        )?;
        writeln!(
            out,
            "Jaccard Similarity between Top {} rank pages and out-degree pages: {}",
            k, self.similarity.rank_out_degree
        )?;
        writeln!(
            out,
            "Jaccard Similarity between Top {} in-degree pages and out-degree pages: {}",
            k, self.similarity.in_out_degree
        )?;
        writeln!(out, "PageRank converged after {} iterations", self.iterations)
    }
}
