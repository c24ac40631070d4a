//! Shared CLI utilities.

use anyhow::{Context, Result};
use indicatif::ProgressBar;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use std::time::Duration;

use crate::domain::ReportFormat;

/// owner/name with the characters GitHub itself allows.
static REPO_SLUG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*/[A-Za-z0-9._-]+$").unwrap());

/// Parse a report format name given on the command line or in a settings file.
pub fn parse_format(value: &str) -> Result<ReportFormat> {
    match value {
        "terminal" => Ok(ReportFormat::Terminal),
        "markdown" => Ok(ReportFormat::Markdown),
        "csv" => Ok(ReportFormat::Csv),
        "json" => Ok(ReportFormat::Json),
        other => {
            anyhow::bail!("Unknown format '{other}' (expected terminal, markdown, csv, or json)")
        }
    }
}

/// Reject repository identifiers that are not an OWNER/NAME pair before any
/// request is built from them.
pub fn validate_repo(repo: &str) -> Result<()> {
    if REPO_SLUG.is_match(repo) {
        Ok(())
    } else {
        anyhow::bail!("Invalid repository '{repo}' (expected OWNER/NAME)")
    }
}

/// Write rendered output to a file, or to stdout when no path is given.
/// A trailing newline is guaranteed either way.
pub fn write_output(content: &str, output: Option<&Path>) -> Result<()> {
    let mut text = content.to_string();
    if !text.ends_with('\n') {
        text.push('\n');
    }
    match output {
        Some(path) => {
            std::fs::write(path, &text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}

/// Spinner shown while a fetch is in flight. Indicatif draws it to stderr
/// and keeps it hidden when stderr is not a terminal, so piped output and
/// CI logs stay clean.
pub fn fetch_spinner(message: String) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_message(message);
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}
