//! Versioned JSON rendering

use anyhow::Result;
use chrono::Utc;
use serde_json::{Map, Value};

use crate::domain::{AnalysisReport, REPORT_SCHEMA_VERSION};

/// One report as a pretty-printed JSON document with a schema version and
/// an optional generation timestamp. Disable the timestamp to make two
/// identical runs byte-identical.
pub fn render_json(report: &AnalysisReport, include_timestamp: bool) -> Result<String> {
    let mut doc = envelope(include_timestamp);
    if let Value::Object(fields) = serde_json::to_value(report)? {
        for (key, value) in fields {
            doc.insert(key, value);
        }
    }
    Ok(serde_json::to_string_pretty(&Value::Object(doc))?)
}

/// Two reports side by side, as produced by the summary command.
pub fn render_summary_json(
    issues: &AnalysisReport,
    pulls: &AnalysisReport,
    include_timestamp: bool,
) -> Result<String> {
    let mut doc = envelope(include_timestamp);
    doc.insert("repo".to_string(), Value::String(issues.repo.clone()));
    doc.insert("issues".to_string(), serde_json::to_value(issues)?);
    doc.insert("pulls".to_string(), serde_json::to_value(pulls)?);
    Ok(serde_json::to_string_pretty(&Value::Object(doc))?)
}

fn envelope(include_timestamp: bool) -> Map<String, Value> {
    let mut doc = Map::new();
    doc.insert("schema_version".to_string(), Value::String(REPORT_SCHEMA_VERSION.to_string()));
    if include_timestamp {
        doc.insert(
            "generated_at".to_string(),
            Value::String(Utc::now().format("%Y-%m-%dT%H:%M:%S+00:00").to_string()),
        );
    }
    doc
}
