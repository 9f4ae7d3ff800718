// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two subcommands, one per stage:
// - crawl: build the topic graph and write it as an edge list
// - rank:  load an edge list, run PageRank, and print the report
//
// The defaults reproduce the classic run: a 1000 page tennis graph seeded at
// /wiki/Tennis, ranked with ε = 0.01 and the top 6 pages reported.
// =============================================================================

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "topic-rank",
    version,
    about = "Crawl a topic-restricted wiki graph and rank its pages",
    long_about = "topic-rank crawls wiki pages breadth-first from a seed, keeping only pages that \
                  mention every keyword, writes the resulting link graph to a file, and ranks the \
                  pages of such a file with PageRank."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl the wiki from a seed page and write the graph as an edge list
    ///
    /// Example: topic-rank crawl /wiki/Tennis -k tennis -k "grand slam" --max 1000
    Crawl {
        /// Relative address of the seed page
        #[arg(default_value = "/wiki/Tennis")]
        seed: String,

        /// Keyword every crawled page must contain (repeat for more)
        #[arg(
            short,
            long = "keyword",
            default_values_t = [String::from("tennis"), String::from("grand slam")]
        )]
        keywords: Vec<String>,

        /// Maximum number of pages in the graph
        #[arg(long, default_value_t = 1000)]
        max: usize,

        /// File the graph is written to
        #[arg(short, long, default_value = "WikiTennisGraph.txt")]
        output: PathBuf,

        /// Site the relative page addresses belong to
        #[arg(long, default_value = "https://en.wikipedia.org")]
        origin: String,

        /// Seconds to wait after every batch of requests
        #[arg(long, default_value_t = 5)]
        pause_secs: u64,

        /// Number of requests in a batch
        #[arg(long, default_value_t = 100)]
        every: usize,

        /// Seconds to wait before retrying robots.txt
        #[arg(long, default_value_t = 3)]
        retry_secs: u64,
    },

    /// Rank the pages of a graph file and print the top pages
    ///
    /// Example: topic-rank rank WikiTennisGraph.txt --epsilon 0.005 --top 15
    Rank {
        /// Edge list written by the crawl command
        graph_file: PathBuf,

        /// Approximation parameter: stop when two iterations differ by at most this (L1)
        #[arg(short, long, default_value_t = 0.01)]
        epsilon: f64,

        /// How many top pages to report
        #[arg(short = 'k', long = "top", default_value_t = 6)]
        top: usize,

        /// Print the report as JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crawl_defaults() {
        let cli = Cli::parse_from(["topic-rank", "crawl"]);
        match cli.command {
            Commands::Crawl {
                seed, keywords, max, ..
            } => {
                assert_eq!(seed, "/wiki/Tennis");
                assert_eq!(keywords, ["tennis", "grand slam"]);
                assert_eq!(max, 1000);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_rank_arguments() {
        let cli = Cli::parse_from(["topic-rank", "rank", "graph.txt", "-e", "0.005", "-k", "15", "--json"]);
        match cli.command {
            Commands::Rank {
                graph_file,
                epsilon,
                top,
                json,
            } => {
                assert_eq!(graph_file, PathBuf::from("graph.txt"));
                assert_eq!(epsilon, 0.005);
                assert_eq!(top, 15);
                assert!(json);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
