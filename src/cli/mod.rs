//! Command-line interface for repo-pulse
//!
//! Provides the `issues`, `pulls`, `summary`, `values`, and `completions`
//! subcommands.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod analyze;
mod completions;
mod summary;
mod utils;
mod values;

/// GitHub repository activity reports and layered configuration values
#[derive(Parser)]
#[command(name = "repo-pulse")]
#[command(author, version, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and analyze a repository's issues
    Issues(analyze::AnalyzeArgs),

    /// Fetch and analyze a repository's pull requests
    Pulls(analyze::AnalyzeArgs),

    /// Combined issues and pull requests overview
    Summary(summary::SummaryArgs),

    /// Print the effective merged values for a layered values directory
    Values(values::ValuesArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Wire verbose flag to the tracing log level.
    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    match cli.command {
        Commands::Issues(args) => analyze::run("issues", args),
        Commands::Pulls(args) => analyze::run("pulls", args),
        Commands::Summary(args) => summary::run(args),
        Commands::Values(args) => values::run(args),
        Commands::Completions(args) => completions::run(args),
    }
}
