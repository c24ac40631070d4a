//! Pull request analytics: categories, merge outcomes, authorship.

use serde_json::Value;

use super::classify::{classify_priority, classify_pull_category};
use super::{
    author_login, count_by, days_open, label_names, mean, number_field, text_field,
    timestamp_field, Analyzer, FetchOptions,
};
use crate::domain::{AnalysisReport, ItemRow, Metric};
use crate::github::{GithubClient, PageSet, PaginationError};

pub struct PullAnalyzer;

impl Analyzer for PullAnalyzer {
    fn kind(&self) -> &'static str {
        "pulls"
    }

    fn fetch(
        &self,
        client: &GithubClient,
        repo: &str,
        options: &FetchOptions,
    ) -> Result<PageSet, PaginationError> {
        let endpoint = format!("repos/{repo}/pulls");
        let params =
            [("state", options.state.as_str()), ("sort", "created"), ("direction", "asc")];
        client.paginate(&endpoint, &params, options.max_pages)
    }

    fn transform(&self, repo: &str, pages: &PageSet, complete: bool) -> AnalysisReport {
        let mut rows: Vec<ItemRow> = pages.items.iter().map(pull_row).collect();
        rows.sort_by_key(|row| row.number);

        let open = rows.iter().filter(|row| row.state == "open").count();
        let merged = rows.iter().filter(|row| row.state == "merged").count();
        let closed_unmerged = rows.len() - open - merged;
        let merge_days: Vec<i64> = rows
            .iter()
            .filter(|row| row.state == "merged")
            .filter_map(|row| row.days_open)
            .collect();
        let drafts = pages
            .items
            .iter()
            .filter(|record| record.get("draft").and_then(Value::as_bool) == Some(true))
            .count();

        let mut metrics = vec![
            Metric::new("pull requests analyzed", rows.len().to_string()),
            Metric::new("open", open.to_string()),
            Metric::new("merged", merged.to_string()),
            Metric::new("closed unmerged", closed_unmerged.to_string()),
        ];
        let completed = merged + closed_unmerged;
        if completed > 0 {
            let rate = merged as f64 / completed as f64 * 100.0;
            metrics.push(Metric::new("merge rate", format!("{rate:.0}%")));
        }
        if let Some(average) = mean(&merge_days) {
            metrics.push(Metric::new("average days to merge", format!("{average:.1}")));
        }
        if drafts > 0 {
            metrics.push(Metric::new("drafts", drafts.to_string()));
        }

        let mut top_authors =
            count_by(rows.iter().map(|row| row.author.clone()), "Top authors");
        top_authors.counts.truncate(5);

        let breakdowns = vec![
            count_by(rows.iter().map(|row| row.category.clone()), "By category"),
            count_by(rows.iter().map(|row| row.priority.clone()), "By priority"),
            top_authors,
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

fn pull_row(record: &Value) -> ItemRow {
    let labels = label_names(record);
    let title = text_field(record, "title");
    let created_at = timestamp_field(record, "created_at");
    let closed_at = timestamp_field(record, "closed_at");
    let merged = timestamp_field(record, "merged_at").is_some();

    // The list endpoint only knows open/closed; closed-with-merge is merged.
    let state = if merged { "merged".to_string() } else { text_field(record, "state") };

    let category = classify_pull_category(&title);
    let priority = classify_priority(&labels, &title);

    ItemRow {
        number: number_field(record, "number"),
        state,
        author: author_login(record),
        category: category.as_str().to_string(),
        priority: priority.as_str().to_string(),
        complexity: None,
        comments: number_field(record, "comments"),
        days_open: days_open(created_at, closed_at),
        created_at,
        closed_at,
        url: text_field(record, "html_url"),
        title,
        labels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::{FetchConfig, RawResponse, RetryPolicy, Transport, TransportError};
    use serde_json::json;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    fn fixture() -> PageSet {
        let items = vec![
            json!({
                "number": 10, "title": "feat: add exporter", "state": "open",
                "draft": true, "labels": [], "user": {"login": "dave"},
                "created_at": "2024-03-01T00:00:00Z",
                "html_url": "https://github.com/octo/demo/pull/10"
            }),
            json!({
                "number": 11, "title": "fix: null deref in pager", "state": "closed",
                "labels": [], "user": {"login": "erin"},
                "created_at": "2024-01-01T00:00:00Z",
                "closed_at": "2024-01-05T00:00:00Z",
                "merged_at": "2024-01-05T00:00:00Z",
                "html_url": "https://github.com/octo/demo/pull/11"
            }),
            json!({
                "number": 12, "title": "Experiment", "state": "closed",
                "labels": [], "user": {"login": "dave"},
                "created_at": "2024-01-10T00:00:00Z",
                "closed_at": "2024-01-12T00:00:00Z",
                "merged_at": null,
                "html_url": "https://github.com/octo/demo/pull/12"
            }),
            json!({
                "number": 13, "title": "docs: update install guide", "state": "closed",
                "labels": [], "user": {"login": "frank"},
                "created_at": "2024-02-01T00:00:00Z",
                "closed_at": "2024-02-03T00:00:00Z",
                "merged_at": "2024-02-03T00:00:00Z",
                "html_url": "https://github.com/octo/demo/pull/13"
            }),
        ];
        PageSet { items, pages_fetched: 1, rate_remaining: None, hit_ceiling: false }
    }

    fn metric<'a>(report: &'a AnalysisReport, name: &str) -> Option<&'a str> {
        report.metrics.iter().find(|m| m.name == name).map(|m| m.value.as_str())
    }

    #[test]
    fn merged_state_overrides_closed() {
        let report = PullAnalyzer.transform("octo/demo", &fixture(), true);
        let states: Vec<&str> =
            report.items.iter().map(|row| row.state.as_str()).collect();
        assert_eq!(states, vec!["open", "merged", "closed", "merged"]);
    }

    #[test]
    fn merge_metrics_aggregate() {
        let report = PullAnalyzer.transform("octo/demo", &fixture(), true);
        assert_eq!(metric(&report, "pull requests analyzed"), Some("4"));
        assert_eq!(metric(&report, "open"), Some("1"));
        assert_eq!(metric(&report, "merged"), Some("2"));
        assert_eq!(metric(&report, "closed unmerged"), Some("1"));
        assert_eq!(metric(&report, "merge rate"), Some("67%"));
        // 4 days for #11, 2 days for #13.
        assert_eq!(metric(&report, "average days to merge"), Some("3.0"));
        assert_eq!(metric(&report, "drafts"), Some("1"));
    }

    #[test]
    fn categories_and_authors_break_down() {
        let report = PullAnalyzer.transform("octo/demo", &fixture(), true);
        let categories = report.breakdowns.iter().find(|b| b.title == "By category").unwrap();
        let by_name: Vec<(&str, usize)> =
            categories.counts.iter().map(|c| (c.name.as_str(), c.count)).collect();
        assert!(by_name.contains(&("feature", 1)));
        assert!(by_name.contains(&("fix", 1)));
        assert!(by_name.contains(&("docs", 1)));
        assert!(by_name.contains(&("other", 1)));

        let authors = report.breakdowns.iter().find(|b| b.title == "Top authors").unwrap();
        assert_eq!(authors.counts[0].name, "dave");
        assert_eq!(authors.counts[0].count, 2);
    }

    struct RecordingTransport {
        urls: Arc<Mutex<Vec<String>>>,
    }

    impl Transport for RecordingTransport {
        fn get(
            &self,
            url: &str,
            _query: &[(&str, String)],
            _headers: &[(&str, String)],
        ) -> Result<RawResponse, TransportError> {
            self.urls.lock().unwrap().push(url.to_string());
            Ok(RawResponse { status: 200, headers: Default::default(), body: "[]".to_string() })
        }
    }

    #[test]
    fn fetch_walks_the_pulls_endpoint() {
        let urls = Arc::new(Mutex::new(Vec::new()));
        let client = crate::github::GithubClient::with_transport(
            Box::new(RecordingTransport { urls: Arc::clone(&urls) }),
            Some("http://api.test"),
            None,
            FetchConfig {
                throttle: Duration::ZERO,
                retry: RetryPolicy::new(1, Duration::ZERO),
                ..FetchConfig::default()
            },
        );
        PullAnalyzer.fetch(&client, "octo/demo", &FetchOptions::default()).unwrap();
        assert_eq!(urls.lock().unwrap()[0], "http://api.test/repos/octo/demo/pulls");
    }
}
