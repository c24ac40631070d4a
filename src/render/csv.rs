//! CSV export of item rows

use std::fmt::Write;

use crate::domain::{AnalysisReport, ItemRow};

const HEADER: &str =
    "number,state,category,priority,complexity,author,comments,created_at,closed_at,days_open,labels,title,url";

/// One row per analyzed item; aggregates are not included. Dates are
/// rendered as YYYY-MM-DD, labels joined with ';'.
pub fn render_csv(report: &AnalysisReport) -> String {
    let mut out = String::with_capacity(64 * (report.items.len() + 1));
    let _ = writeln!(out, "{HEADER}");
    for row in &report.items {
        let _ = writeln!(out, "{}", csv_row(row));
    }
    out
}

fn csv_row(row: &ItemRow) -> String {
    let fields = [
        row.number.to_string(),
        row.state.clone(),
        row.category.clone(),
        row.priority.clone(),
        row.complexity.clone().unwrap_or_default(),
        row.author.clone(),
        row.comments.to_string(),
        date(&row.created_at),
        date(&row.closed_at),
        row.days_open.map(|d| d.to_string()).unwrap_or_default(),
        row.labels.join(";"),
        row.title.clone(),
        row.url.clone(),
    ];
    fields.iter().map(|field| quote(field)).collect::<Vec<_>>().join(",")
}

fn date(value: &Option<chrono::DateTime<chrono::Utc>>) -> String {
    value.map(|t| t.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

fn quote(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
