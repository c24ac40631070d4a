//! Markdown rendering

use std::fmt::Write;

use crate::domain::AnalysisReport;
use crate::utils::truncate_text;

/// Item rows shown in the markdown table before it cuts off.
const ITEM_LIMIT: usize = 50;

pub fn render_markdown(report: &AnalysisReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {} report for {}", kind_heading(&report.kind), report.repo);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Analyzed {} of {} fetched records across {} pages.",
        report.analyzed, report.fetched, report.pages
    );
    if !report.complete {
        let _ = writeln!(out);
        let _ = writeln!(out, "> **Warning:** partial results; the fetch stopped on an error.");
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "## Metrics");
    let _ = writeln!(out);
    let _ = writeln!(out, "| Metric | Value |");
    let _ = writeln!(out, "| --- | --- |");
    for metric in &report.metrics {
        let _ = writeln!(out, "| {} | {} |", escape_cell(&metric.name), escape_cell(&metric.value));
    }

    for breakdown in &report.breakdowns {
        if breakdown.counts.is_empty() {
            continue;
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "### {}", breakdown.title);
        let _ = writeln!(out);
        let _ = writeln!(out, "| Name | Count |");
        let _ = writeln!(out, "| --- | --- |");
        for count in &breakdown.counts {
            let _ = writeln!(out, "| {} | {} |", escape_cell(&count.name), count.count);
        }
    }

    if !report.items.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "## Items");
        let _ = writeln!(out);
        let _ = writeln!(out, "| # | Title | State | Category | Priority | Days open |");
        let _ = writeln!(out, "| --- | --- | --- | --- | --- | --- |");
        for row in report.items.iter().take(ITEM_LIMIT) {
            let days =
                row.days_open.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string());
            let _ = writeln!(
                out,
                "| [{}]({}) | {} | {} | {} | {} | {} |",
                row.number,
                row.url,
                escape_cell(&truncate_text(&row.title, 60)),
                row.state,
                row.category,
                row.priority,
                days
            );
        }
        if report.items.len() > ITEM_LIMIT {
            let _ = writeln!(out);
            let _ = writeln!(out, "...and {} more.", report.items.len() - ITEM_LIMIT);
        }
    }
    out
}

fn kind_heading(kind: &str) -> &str {
    match kind {
        "issues" => "Issues",
        "pulls" => "Pull requests",
        other => other,
    }
}

/// Keep titles from breaking the table: pipes escaped, newlines flattened.
fn escape_cell(raw: &str) -> String {
    raw.replace('|', "\\|").replace(['\r', '\n'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::fixtures::sample_report;

    #[test]
    fn headings_and_tables_render() {
        let text = render_markdown(&sample_report());
        assert!(text.starts_with("# Issues report for octo/demo\n"));
        assert!(text.contains("Analyzed 2 of 3 fetched records across 1 pages."));
        assert!(text.contains("| Metric | Value |"));
        assert!(text.contains("| issues analyzed | 2 |"));
        assert!(text.contains("### By kind"));
        assert!(text.contains("| bug | 1 |"));
        assert!(!text.contains("Warning"));
    }

    #[test]
    fn pipes_in_titles_are_escaped() {
        let text = render_markdown(&sample_report());
        assert!(text.contains(r"Crash \| with"));
    }

    #[test]
    fn long_item_lists_are_truncated() {
        let mut report = sample_report();
        let template = report.items[0].clone();
        for number in 3..=60 {
            let mut row = template.clone();
            row.number = number;
            report.items.push(row);
        }
        let text = render_markdown(&report);
        assert!(text.contains("...and 10 more."));
    }

    #[test]
    fn incomplete_runs_warn() {
        let mut report = sample_report();
        report.complete = false;
        let text = render_markdown(&report);
        assert!(text.contains("> **Warning:** partial results"));
    }
}
