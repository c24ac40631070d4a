//! Issue analytics: kind, priority, and complexity classification.

use serde_json::Value;

use super::classify::{classify_complexity, classify_issue_kind, classify_priority};
use super::{
    author_login, count_by, days_open, label_names, mean, number_field, text_field,
    timestamp_field, Analyzer, FetchOptions,
};
use crate::domain::{AnalysisReport, ItemRow, Metric};
use crate::github::{GithubClient, PageSet, PaginationError};

pub struct IssueAnalyzer;

impl Analyzer for IssueAnalyzer {
    fn kind(&self) -> &'static str {
        "issues"
    }

    fn fetch(
        &self,
        client: &GithubClient,
        repo: &str,
        options: &FetchOptions,
    ) -> Result<PageSet, PaginationError> {
        let endpoint = format!("repos/{repo}/issues");
        let params =
            [("state", options.state.as_str()), ("sort", "created"), ("direction", "asc")];
        client.paginate(&endpoint, &params, options.max_pages)
    }

    fn transform(&self, repo: &str, pages: &PageSet, complete: bool) -> AnalysisReport {
        // The issues endpoint interleaves pull requests; keep real issues.
        let mut rows: Vec<ItemRow> = pages
            .items
            .iter()
            .filter(|record| record.get("pull_request").is_none())
            .map(issue_row)
            .collect();
        rows.sort_by_key(|row| row.number);

        let open = rows.iter().filter(|row| row.state == "open").count();
        let closed = rows.len() - open;
        let close_days: Vec<i64> = rows
            .iter()
            .filter(|row| row.closed_at.is_some())
            .filter_map(|row| row.days_open)
            .collect();

        let mut metrics = vec![
            Metric::new("issues analyzed", rows.len().to_string()),
            Metric::new("open", open.to_string()),
            Metric::new("closed", closed.to_string()),
        ];
        if let Some(average) = mean(&close_days) {
            metrics.push(Metric::new("average days to close", format!("{average:.1}")));
        }
        let skipped = pages.items.len() - rows.len();
        if skipped > 0 {
            metrics.push(Metric::new("pull requests skipped", skipped.to_string()));
        }

        let mut top_labels =
            count_by(rows.iter().flat_map(|row| row.labels.iter().cloned()), "Top labels");
        top_labels.counts.truncate(5);

        let breakdowns = vec![
            count_by(rows.iter().map(|row| row.category.clone()), "By kind"),
            count_by(rows.iter().map(|row| row.priority.clone()), "By priority"),
            count_by(rows.iter().filter_map(|row| row.complexity.clone()), "By complexity"),
            top_labels,
        ];

        AnalysisReport {
            kind: self.kind().to_string(),
            repo: repo.to_string(),
            fetched: pages.items.len(),
            analyzed: rows.len(),
            pages: pages.pages_fetched,
            complete,
            rate_remaining: pages.rate_remaining,
            metrics,
            breakdowns,
            items: rows,
        }
    }
}

fn issue_row(record: &Value) -> ItemRow {
    let labels = label_names(record);
    let title = text_field(record, "title");
    let body_length = record.get("body").and_then(Value::as_str).map_or(0, str::len);
    let comments = number_field(record, "comments");
    let created_at = timestamp_field(record, "created_at");
    let closed_at = timestamp_field(record, "closed_at");

    let kind = classify_issue_kind(&labels, &title);
    let priority = classify_priority(&labels, &title);
    let complexity = classify_complexity(body_length, comments);

    ItemRow {
        number: number_field(record, "number"),
        state: text_field(record, "state"),
        author: author_login(record),
        category: kind.as_str().to_string(),
        priority: priority.as_str().to_string(),
        complexity: Some(complexity.as_str().to_string()),
        comments,
        days_open: days_open(created_at, closed_at),
        created_at,
        closed_at,
        url: text_field(record, "html_url"),
        title,
        labels,
    }
}
