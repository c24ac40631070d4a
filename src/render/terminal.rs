//! Plain terminal rendering

use std::fmt::Write;

use crate::domain::AnalysisReport;
use crate::utils::format_with_commas;

/// Indented sections in plain text, suitable for a quick look.
pub fn render_terminal(report: &AnalysisReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Repository: {}", report.repo);
    let _ = writeln!(out, "Analysis: {}", report.kind);
    let _ = writeln!(out, "Pages fetched: {}", report.pages);
    if let Some(remaining) = report.rate_remaining {
        let _ = writeln!(out, "API quota remaining: {}", format_with_commas(remaining));
    }
    if !report.complete {
        let _ = writeln!(
            out,
            "Partial results: the fetch stopped early; figures cover {} fetched records",
            report.fetched
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Metrics:");
    for metric in &report.metrics {
        let _ = writeln!(out, "  {}: {}", metric.name, metric.value);
    }

    for breakdown in &report.breakdowns {
        if breakdown.counts.is_empty() {
            continue;
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "{}:", breakdown.title);
        for count in &breakdown.counts {
            let _ = writeln!(out, "  {}: {}", count.name, count.count);
        }
    }
    out
}
