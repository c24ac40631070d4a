//! Report rendering
//!
//! Four formats over the same [`AnalysisReport`]: plain terminal sections,
//! markdown, CSV rows, and a versioned JSON document.

pub mod csv;
pub mod json;
pub mod markdown;
pub mod terminal;

use anyhow::Result;

use crate::domain::{AnalysisReport, ReportFormat};

/// Render one report in the requested format. `include_timestamp` only
/// affects JSON, which is the format meant for archiving.
pub fn render(
    report: &AnalysisReport,
    format: ReportFormat,
    include_timestamp: bool,
) -> Result<String> {
    match format {
        ReportFormat::Terminal => Ok(terminal::render_terminal(report)),
        ReportFormat::Markdown => Ok(markdown::render_markdown(report)),
        ReportFormat::Csv => Ok(csv::render_csv(report)),
        ReportFormat::Json => json::render_json(report, include_timestamp),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::domain::{AnalysisReport, Breakdown, Count, ItemRow, Metric};
    use chrono::{TimeZone, Utc};

    pub(crate) fn sample_report() -> AnalysisReport {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let closed = Utc.with_ymd_and_hms(2024, 1, 11, 0, 0, 0).unwrap();
        AnalysisReport {
            kind: "issues".to_string(),
            repo: "octo/demo".to_string(),
            fetched: 3,
            analyzed: 2,
            pages: 1,
            complete: true,
            rate_remaining: Some(4990),
            metrics: vec![
                Metric::new("issues analyzed", "2"),
                Metric::new("open", "1"),
                Metric::new("closed", "1"),
            ],
            breakdowns: vec![Breakdown {
                title: "By kind".to_string(),
                counts: vec![
                    Count { name: "bug".to_string(), count: 1 },
                    Count { name: "question".to_string(), count: 1 },
                ],
            }],
            items: vec![
                ItemRow {
                    number: 1,
                    title: "Crash | with, \"quotes\"".to_string(),
                    state: "closed".to_string(),
                    author: "alice".to_string(),
                    labels: vec!["bug".to_string(), "p1".to_string()],
                    category: "bug".to_string(),
                    priority: "critical".to_string(),
                    complexity: Some("low".to_string()),
                    comments: 2,
                    created_at: Some(created),
                    closed_at: Some(closed),
                    days_open: Some(10),
                    url: "https://github.com/octo/demo/issues/1".to_string(),
                },
                ItemRow {
                    number: 2,
                    title: "How does throttling work?".to_string(),
                    state: "open".to_string(),
                    author: "bob".to_string(),
                    labels: vec![],
                    category: "question".to_string(),
                    priority: "normal".to_string(),
                    complexity: Some("low".to_string()),
                    comments: 0,
                    created_at: Some(created),
                    closed_at: None,
                    days_open: Some(45),
                    url: "https://github.com/octo/demo/issues/2".to_string(),
                },
            ],
        }
    }
}
