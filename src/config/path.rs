//! Dot-path traversal into nested configuration values.
//!
//! A path such as `server.tls.cert` names one key per nesting level. The
//! empty path names the whole value. Segments that look like indices
//! (`hosts.0`) select an element when the current value is an array.

use thiserror::Error;
use toml::Value;

/// A path segment was missing at some nesting level.
///
/// Callers with more context (the group the value came from) are expected
/// to re-wrap this into their own error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no value at segment '{segment}' of path '{path}'")]
pub struct PathError {
    pub path: String,
    pub segment: String,
}

/// Returns `true` if `path` names the whole structure.
pub fn is_root(path: &str) -> bool {
    path.is_empty()
}

/// Resolves a dotted `path` against `root`.
///
/// Stops at the first segment that cannot be navigated; `root` is never
/// modified.
pub fn resolve<'a>(path: &str, root: &'a Value) -> Result<&'a Value, PathError> {
    if is_root(path) {
        return Ok(root);
    }

    let mut current = root;
    for segment in path.split('.') {
        current = step(current, segment).ok_or_else(|| PathError {
            path: path.to_string(),
            segment: segment.to_string(),
        })?;
    }

    Ok(current)
}

fn step<'a>(value: &'a Value, segment: &str) -> Option<&'a Value> {
    match value {
        Value::Table(table) => table.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}
