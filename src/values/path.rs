//! Dotted-path lookup into merged documents

use serde_yaml::Value;

/// Walk a dotted path ("server.tls.port") through nested mappings.
/// Returns `None` the moment a segment is missing or the current node is
/// not a mapping; there is no error case.
pub fn lookup<'a>(document: &'a Value, dotted: &str) -> Option<&'a Value> {
    let mut node = document;
    for segment in dotted.split('.') {
        node = node.get(segment)?;
    }
    Some(node)
}

/// Like [`lookup`], but cloning and falling back to `default`.
pub fn lookup_or(document: &Value, dotted: &str, default: Value) -> Value {
    lookup(document, dotted).cloned().unwrap_or(default)
}
