//! Analyzers: fetch a record stream, classify it, aggregate a report
//!
//! Each analysis capability implements [`Analyzer`]; the CLI looks one up
//! by kind in [`analyzer_for`] and drives the same fetch/transform sequence
//! for every kind.

pub mod classify;
pub mod issues;
pub mod pulls;

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::domain::{AnalysisReport, Breakdown, Count};
use crate::github::{GithubClient, PageSet, PaginationError};

/// Per-run fetch options shared by all analyzers.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// State filter forwarded to the endpoint: "open", "closed", or "all".
    pub state: String,
    /// Optional page cap below the engine's own ceiling.
    pub max_pages: Option<u32>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self { state: "all".to_string(), max_pages: None }
    }
}

/// One analysis capability. `Send + Sync` so the summary command can share
/// analyzers across scoped threads.
pub trait Analyzer: Send + Sync {
    /// Stable kind identifier; also the report's `kind` field.
    fn kind(&self) -> &'static str;

    /// Fetch every record this analyzer cares about.
    fn fetch(
        &self,
        client: &GithubClient,
        repo: &str,
        options: &FetchOptions,
    ) -> Result<PageSet, PaginationError>;

    /// Classify raw records and aggregate them into a report. `complete` is
    /// false when `pages` was salvaged from a failed run.
    fn transform(&self, repo: &str, pages: &PageSet, complete: bool) -> AnalysisReport;
}

/// Registered analyzer kinds, in display order.
pub const KINDS: &[&str] = &["issues", "pulls"];

/// Look an analyzer up by kind.
pub fn analyzer_for(kind: &str) -> Option<Box<dyn Analyzer>> {
    match kind {
        "issues" => Some(Box::new(issues::IssueAnalyzer)),
        "pulls" => Some(Box::new(pulls::PullAnalyzer)),
        _ => None,
    }
}

// Field extraction below is deliberately forgiving: records come from the
// network and analyzers must not panic on absent or oddly-typed fields.

pub(crate) fn text_field(record: &Value, key: &str) -> String {
    record.get(key).and_then(Value::as_str).unwrap_or_default().to_string()
}

pub(crate) fn number_field(record: &Value, key: &str) -> u64 {
    record.get(key).and_then(Value::as_u64).unwrap_or(0)
}

pub(crate) fn timestamp_field(record: &Value, key: &str) -> Option<DateTime<Utc>> {
    let raw = record.get(key)?.as_str()?;
    DateTime::parse_from_rfc3339(raw).ok().map(|t| t.with_timezone(&Utc))
}

pub(crate) fn label_names(record: &Value) -> Vec<String> {
    record
        .get("labels")
        .and_then(Value::as_array)
        .map(|labels| {
            labels
                .iter()
                .filter_map(|label| label.get("name").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

pub(crate) fn author_login(record: &Value) -> String {
    record
        .get("user")
        .and_then(|user| user.get("login"))
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string()
}

/// Days from creation to close, or to now for still-open records.
pub(crate) fn days_open(
    created: Option<DateTime<Utc>>,
    closed: Option<DateTime<Utc>>,
) -> Option<i64> {
    let created = created?;
    let end = closed.unwrap_or_else(Utc::now);
    Some((end - created).num_days())
}

/// Count occurrences, ordered by count descending and name ascending so
/// equal runs render identically.
pub(crate) fn count_by(names: impl Iterator<Item = String>, title: &str) -> Breakdown {
    let mut tally: HashMap<String, usize> = HashMap::new();
    for name in names {
        *tally.entry(name).or_insert(0) += 1;
    }
    let mut counts: Vec<Count> =
        tally.into_iter().map(|(name, count)| Count { name, count }).collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    Breakdown { title: title.to_string(), counts }
}

pub(crate) fn mean(values: &[i64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<i64>() as f64 / values.len() as f64)
}
