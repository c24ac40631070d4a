//! Combined issues plus pull requests overview.

use anyhow::{Context, Result};
use clap::Args;
use std::fmt::Write as _;
use std::path::PathBuf;

use super::utils::{fetch_spinner, validate_repo, write_output};
use crate::analyze::{analyzer_for, FetchOptions};
use crate::config::{load_settings, merge_cli_with_settings, CliOverrides};
use crate::domain::AnalysisReport;
use crate::github::{GithubClient, PageSet, PaginationError};
use crate::render::json::render_summary_json;
use crate::render::terminal::render_terminal;

#[derive(Args)]
pub struct SummaryArgs {
    /// Repository to analyze; falls back to `repo` in the settings file
    #[arg(value_name = "OWNER/NAME")]
    pub repo: Option<String>,

    /// Filter by item state: open, closed, or all
    #[arg(short, long, value_name = "STATE")]
    pub state: Option<String>,

    /// Stop after fetching this many pages per endpoint
    #[arg(long, value_name = "N")]
    pub max_pages: Option<u32>,

    /// Output format: terminal or json
    #[arg(short, long, value_name = "FORMAT", default_value = "terminal")]
    pub format: String,

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

pub fn run(args: SummaryArgs) -> Result<()> {
    if !matches!(args.format.as_str(), "terminal" | "json") {
        anyhow::bail!("Summary supports terminal or json output, not '{}'", args.format);
    }

    let cwd = std::env::current_dir()?;
    let settings = load_settings(&cwd, args.config.as_deref())?;
    let overrides = CliOverrides {
        repo: args.repo.clone(),
        api_url: args.api_url.clone(),
        state: args.state.clone(),
        format: None,
        page_size: None,
        max_pages: args.max_pages,
    };
    let merged = merge_cli_with_settings(settings, overrides);
    merged.validate()?;

    let repo = merged.repo.clone().ok_or_else(|| {
        anyhow::anyhow!("No repository given; pass OWNER/NAME or set `repo` in repo-pulse.toml")
    })?;
    validate_repo(&repo)?;

    let issues =
        analyzer_for("issues").ok_or_else(|| anyhow::anyhow!("issues analyzer missing"))?;
    let pulls = analyzer_for("pulls").ok_or_else(|| anyhow::anyhow!("pulls analyzer missing"))?;
    let client = GithubClient::new(
        merged.api_url.as_deref(),
        merged.token_file.as_deref(),
        merged.fetch_config(),
    );
    let options = FetchOptions {
        state: merged.state.clone().unwrap_or_else(|| "all".to_string()),
        max_pages: merged.max_pages,
    };

    // Both endpoints are independent walks; run them side by side. Scoped
    // threads let everything stay borrowed.
    let spinner = fetch_spinner(format!("Fetching issues and pull requests for {repo}"));
    let (issue_outcome, pull_outcome) = std::thread::scope(|scope| {
        let issue_handle = scope.spawn(|| issues.fetch(&client, &repo, &options));
        let pull_handle = scope.spawn(|| pulls.fetch(&client, &repo, &options));
        (issue_handle.join(), pull_handle.join())
    });
    spinner.finish_and_clear();

    let issue_outcome =
        issue_outcome.map_err(|_| anyhow::anyhow!("issues fetch thread panicked"))?;
    let pull_outcome = pull_outcome.map_err(|_| anyhow::anyhow!("pulls fetch thread panicked"))?;

    let (issue_pages, issues_complete) = salvage("issues", &repo, issue_outcome)?;
    let (pull_pages, pulls_complete) = salvage("pull requests", &repo, pull_outcome)?;

    let issue_report = issues.transform(&repo, &issue_pages, issues_complete);
    let pull_report = pulls.transform(&repo, &pull_pages, pulls_complete);

    let rendered = match args.format.as_str() {
        "json" => render_summary_json(&issue_report, &pull_report, !args.no_timestamp)?,
        _ => render_summary_terminal(&repo, &issue_report, &pull_report),
    };
    write_output(&rendered, args.output.as_deref())
}

// One side failing does not discard the other; a side with salvageable
// records reports them as incomplete.
fn salvage(
    what: &str,
    repo: &str,
    outcome: Result<PageSet, PaginationError>,
) -> Result<(PageSet, bool)> {
    match outcome {
        Ok(pages) => Ok((pages, true)),
        Err(error) if !error.partial.items.is_empty() => {
            tracing::warn!("{error}; reporting on partial data");
            Ok((error.into_partial(), false))
        }
        Err(error) => Err(error).with_context(|| format!("Fetching {what} for {repo} failed")),
    }
}

fn render_summary_terminal(
    repo: &str,
    issues: &AnalysisReport,
    pulls: &AnalysisReport,
) -> String {
    let header = format!("Summary for {repo}");
    let mut out = String::new();
    let _ = writeln!(out, "{header}");
    let _ = writeln!(out, "{}", "=".repeat(header.len()));
    let _ = writeln!(out);
    out.push_str(&render_terminal(issues));
    let _ = writeln!(out);
    out.push_str(&render_terminal(pulls));
    out
}
