//! Shared record and report types produced by the analyzers.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Schema version stamped into JSON reports. Bump on breaking shape changes.
pub const REPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Output format for rendered reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Terminal,
    Markdown,
    Csv,
    Json,
}

impl ReportFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportFormat::Terminal => "terminal",
            ReportFormat::Markdown => "markdown",
            ReportFormat::Csv => "csv",
            ReportFormat::Json => "json",
        }
    }
}

/// One normalized record row: an issue or a pull request after
/// classification. Field meanings are shared across kinds; `complexity`
/// is only populated for issues.
#[derive(Debug, Clone, Serialize)]
pub struct ItemRow {
    pub number: u64,
    pub title: String,
    /// "open", "closed", or "merged" (pull requests only).
    pub state: String,
    pub author: String,
    pub labels: Vec<String>,
    /// Classified kind ("bug", "feature", ...) depending on the analyzer.
    pub category: String,
    pub priority: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complexity: Option<String>,
    pub comments: u64,
    pub created_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    /// Days from creation to close, or to now for still-open items.
    pub days_open: Option<i64>,
    pub url: String,
}

/// A single named figure in a report ("open", "3.4 days", ...).
#[derive(Debug, Clone, Serialize)]
pub struct Metric {
    pub name: String,
    pub value: String,
}

impl Metric {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), value: value.into() }
    }
}

/// A grouped count ("bug: 12") inside a breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct Count {
    pub name: String,
    pub count: usize,
}

/// An ordered table of counts under a heading ("By kind", "Top labels").
#[derive(Debug, Clone, Serialize)]
pub struct Breakdown {
    pub title: String,
    pub counts: Vec<Count>,
}

/// Aggregated output of one analyzer run. Renderers consume this; they
/// never look at raw API records.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// Analyzer kind identifier ("issues", "pulls").
    pub kind: String,
    /// Repository slug as "owner/name".
    pub repo: String,
    /// Raw records fetched from the API before filtering.
    pub fetched: usize,
    /// Rows that survived filtering and were classified.
    pub analyzed: usize,
    /// Pages the fetch engine retrieved.
    pub pages: u32,
    /// False when the run salvaged partial data after a fetch failure.
    pub complete: bool,
    /// Last remaining-quota figure the server reported, if any.
    pub rate_remaining: Option<u64>,
    pub metrics: Vec<Metric>,
    pub breakdowns: Vec<Breakdown>,
    pub items: Vec<ItemRow>,
}
