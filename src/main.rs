//! Computes the distance of every node of a DOT graph from a starting frontier, once with a
//! sequential BFS and once with a parallel BFS, and checks that both agree.

use std::{io::Write, path::PathBuf, process::ExitCode};

use anyhow::{bail, Context};
use clap::Parser;
use graphxplorer::{dot, report, ExplorerBuilder};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "graphxplorer")]
#[command(version)]
#[command(about = "Explore a DOT graph breadth-first from a set of starting nodes")]
struct Cli {
    /// Print the distance of every explored node
    #[arg(long)]
    verbose: bool,

    /// Number of parallel workers
    #[arg(long = "n_workers", visible_alias = "n-workers", default_value_t = 1)]
    n_workers: usize,

    /// Print a JSON report instead of text
    #[arg(long)]
    json: bool,

    /// Path to the DOT file to explore
    path: PathBuf,

    /// Names of the nodes in the starting frontier
    #[arg(required = true, num_args = 1..)]
    starting_nodes: Vec<String>,
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let graph = dot::read_dot_file(&cli.path)
        .with_context(|| format!("Failed to load a graph from {:?}", cli.path))?;

    tracing::info!(
        "loaded {} graph with {} nodes and {} edges",
        if graph.is_directed() { "directed" } else { "undirected" },
        graph.num_nodes(),
        graph.num_edges(),
    );

    let explorer = ExplorerBuilder::new()
        .graph(&graph)
        .starting_vertices(&cli.starting_nodes)
        .n_workers(cli.n_workers)
        .build()?;

    let comparison = explorer.compare()?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if cli.json {
        report::write_comparison_json(&mut out, &comparison, cli.n_workers, cli.verbose)?;
    } else {
        report::write_comparison(&mut out, &comparison, cli.verbose)?;
    }
    out.flush()?;

    if !comparison.agree() {
        bail!("The two searches produced different results");
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:#}");
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
