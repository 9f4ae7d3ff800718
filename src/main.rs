// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (tracing) and parse command-line arguments (clap)
// 2. Dispatch to the crawl or rank handler
// 3. Print the results
// 4. Exit with proper code (0 = success, 2 = error)
//
// The two stages are independent: `crawl` writes a graph file, `rank` reads
// one, possibly in a different session.
// =============================================================================

mod cli;
mod crawl;
mod fetch;
mod graph;
mod rank;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;
use url::Url;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let exit_code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Crawl {
            seed,
            keywords,
            max,
            output,
            origin,
            pause_secs,
            every,
            retry_secs,
        } => {
            let pacer = fetch::RequestPacer::new(every, Duration::from_secs(pause_secs));
            let retry = crawl::RetryPolicy {
                delay: Duration::from_secs(retry_secs),
                max_attempts: None,
            };
            let config = crawl::CrawlConfig {
                seed,
                keywords,
                max_vertices: max,
            };
            handle_crawl(config, &origin, pacer, retry, &output).await
        }
        Commands::Rank {
            graph_file,
            epsilon,
            top,
            json,
        } => handle_rank(&graph_file, epsilon, top, json),
    }
}

// Handles the 'crawl' subcommand
async fn handle_crawl(
    config: crawl::CrawlConfig,
    origin: &str,
    pacer: fetch::RequestPacer,
    retry: crawl::RetryPolicy,
    output: &Path,
) -> Result<()> {
    let started = Instant::now();
    let origin = Url::parse(origin).with_context(|| format!("invalid origin '{}'", origin))?;

    println!("🔍 Crawling {}{}", origin.as_str().trim_end_matches('/'), config.seed);
    println!("🔑 Keywords: {}", config.keywords.join(", "));
    println!("📊 Max pages: {}", config.max_vertices);

    let mut ctx = fetch::FetchContext::new(fetch::HttpFetcher::new()?, origin, pacer);
    let exclusions = crawl::load_exclusions(&mut ctx, &retry).await?;

    let outcome = crawl::Crawler::new(config, ctx, exclusions)?.crawl().await?;
    graph::save(output, &outcome.graph)?;

    println!(
        "📄 Wrote {} to {}",
        describe(outcome.visited, outcome.graph.edge_count()),
        output.display()
    );
    println!(
        "🌐 Sent {} request(s) in {:.0?} ({} pause(s))",
        outcome.requests,
        started.elapsed(),
        outcome.pauses
    );
    Ok(())
}

// Handles the 'rank' subcommand
fn handle_rank(graph_file: &Path, epsilon: f64, k: usize, json: bool) -> Result<()> {
    let graph = graph::load(graph_file)?;
    let mut ranking = rank::Ranking::new(graph, epsilon)?;
    info!(
        iterations = ranking.pagerank().iterations(),
        delta = ranking.pagerank().delta(),
        "pagerank converged"
    );
    let report = rank::Report::build(&mut ranking, k)?;

    let text = report.to_string();
    let result_file = result_path(graph_file);
    std::fs::write(&result_file, &text)
        .with_context(|| format!("failed to write {}", result_file.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", text);
        println!();
        println!(
            "📊 β = {}, ε = {}; report saved to {}",
            rank::DAMPING,
            epsilon,
            result_file.display()
        );
    }

    Ok(())
}

// "graphs/WikiTennisGraph.txt" -> "graphs/Result_WikiTennisGraph.txt"
fn result_path(graph_file: &Path) -> PathBuf {
    let name = graph_file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "graph.txt".to_string());
    graph_file.with_file_name(format!("Result_{}", name))
}

fn describe(vertices: usize, edges: usize) -> String {
    format!("{} page(s) and {} link(s)", vertices, edges)
}
