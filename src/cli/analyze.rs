//! Shared implementation of the `issues` and `pulls` commands.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use super::utils::{fetch_spinner, parse_format, validate_repo, write_output};
use crate::analyze::{analyzer_for, FetchOptions};
use crate::config::{load_settings, merge_cli_with_settings, CliOverrides};
use crate::github::GithubClient;
use crate::render::render;

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Repository to analyze; falls back to `repo` in the settings file
    #[arg(value_name = "OWNER/NAME")]
    pub repo: Option<String>,

    /// Filter by item state: open, closed, or all
    #[arg(short, long, value_name = "STATE")]
    pub state: Option<String>,

    /// Stop after fetching this many pages
    #[arg(long, value_name = "N")]
    pub max_pages: Option<u32>,

    /// Records per page (1-100)
    #[arg(long, value_name = "N")]
    pub page_size: Option<u32>,

    /// Output format: terminal, markdown, csv, or json
    #[arg(short, long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// Write the report here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Path to a settings file (repo-pulse.toml or .repo-pulse.yml)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// GitHub API root, e.g. for GitHub Enterprise hosts
    #[arg(long, value_name = "URL", env = "GITHUB_API_URL")]
    pub api_url: Option<String>,

    /// Omit the generation timestamp for reproducible JSON output
    #[arg(long)]
    pub no_timestamp: bool,
}

pub fn run(kind: &'static str, args: AnalyzeArgs) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let settings = load_settings(&cwd, args.config.as_deref())?;
    let overrides = CliOverrides {
        repo: args.repo.clone(),
        api_url: args.api_url.clone(),
        state: args.state.clone(),
        format: args.format.clone(),
        page_size: args.page_size,
        max_pages: args.max_pages,
    };
    let merged = merge_cli_with_settings(settings, overrides);
    merged.validate()?;

    let repo = merged.repo.clone().ok_or_else(|| {
        anyhow::anyhow!("No repository given; pass OWNER/NAME or set `repo` in repo-pulse.toml")
    })?;
    validate_repo(&repo)?;
    let format = parse_format(merged.format.as_deref().unwrap_or("terminal"))?;

    let analyzer =
        analyzer_for(kind).ok_or_else(|| anyhow::anyhow!("Unknown analysis kind: {kind}"))?;
    let client = GithubClient::new(
        merged.api_url.as_deref(),
        merged.token_file.as_deref(),
        merged.fetch_config(),
    );
    let options = FetchOptions {
        state: merged.state.clone().unwrap_or_else(|| "all".to_string()),
        max_pages: merged.max_pages,
    };

    let spinner = fetch_spinner(format!("Fetching {kind} for {repo}"));
    let outcome = analyzer.fetch(&client, &repo, &options);
    spinner.finish_and_clear();

    // A failed walk that already collected records still produces a report,
    // flagged as incomplete. A walk that collected nothing is a hard error.
    let (pages, complete) = match outcome {
        Ok(pages) => (pages, true),
        Err(error) if !error.partial.items.is_empty() => {
            tracing::warn!("{error}; reporting on partial data");
            (error.into_partial(), false)
        }
        Err(error) => {
            return Err(error).with_context(|| format!("Fetching {kind} for {repo} failed"));
        }
    };

    let report = analyzer.transform(&repo, &pages, complete);
    let rendered = render(&report, format, !args.no_timestamp)?;
    write_output(&rendered, args.output.as_deref())
}
