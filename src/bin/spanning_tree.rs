//! CLI entry point: runs a full experiment sweep over one graph shape and
//! writes the resulting `ResultsFile` as JSON, mirroring the source's
//! command-line driver.

use std::fs;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use wsdeque::{experiment_complete, GraphType, ResultsFile};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum GraphTypeArg {
    Torus2d,
    Torus2d60,
    Torus3d,
    Torus3d40,
}

impl From<GraphTypeArg> for GraphType {
    fn from(g: GraphTypeArg) -> Self {
        match g {
            GraphTypeArg::Torus2d => GraphType::Torus2d,
            GraphTypeArg::Torus2d60 => GraphType::Torus2d60,
            GraphTypeArg::Torus3d => GraphType::Torus3d,
            GraphTypeArg::Torus3d40 => GraphType::Torus3d40,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "spanning-tree", about = "Sweep work-stealing deque algorithms over a torus graph")]
struct Cli {
    #[arg(long, value_enum, default_value_t = GraphTypeArg::Torus2d)]
    graph_type: GraphTypeArg,

    /// Side length of the torus (2D) or per-axis extent (3D).
    #[arg(long, default_value_t = 20)]
    shape: usize,

    #[arg(long, default_value_t = false)]
    directed: bool,

    /// Destination for the JSON results file; prints to stdout if omitted.
    #[arg(long)]
    output: Option<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let graph_type: GraphType = cli.graph_type.into();

    let results = std::panic::catch_unwind(|| experiment_complete(graph_type, cli.shape, cli.directed));
    let values = match results {
        Ok(values) => values,
        Err(_) => {
            tracing::error!("a spanning-tree invariant failed during the experiment sweep");
            return ExitCode::FAILURE;
        }
    };

    let file = ResultsFile { values };
    let json = match serde_json::to_string_pretty(&file) {
        Ok(json) => json,
        Err(err) => {
            tracing::error!(%err, "failed to serialize results");
            return ExitCode::FAILURE;
        }
    };

    match cli.output {
        Some(path) => {
            if let Err(err) = fs::write(&path, json) {
                tracing::error!(%err, path, "failed to write results file");
                return ExitCode::FAILURE;
            }
        }
        None => println!("{json}"),
    }

    ExitCode::SUCCESS
}
