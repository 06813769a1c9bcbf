//! property path resolution
//!
//! a path is a dot-separated list of property names. each segment is looked
//! up on the value produced by the previous one, starting from the context.

use strsim::levenshtein;
use tracing::trace;

use super::error::{Result, RuleError};
use super::value::Value;

/// maximum edit distance for "did you mean" suggestions
const SUGGESTION_THRESHOLD: usize = 2;

/// resolve `path` against `context`
///
/// an empty (or blank) path returns the context unchanged. a missing segment
/// fails at that segment.
pub fn resolve(context: Option<&Value>, path: Option<&str>) -> Result<Value> {
    let path = match path {
        Some(p) if !p.trim().is_empty() => p,
        _ => return Ok(context.cloned().unwrap_or_default()),
    };

    let context = match context {
        Some(c) if !c.is_null() => c,
        _ => {
            return Err(RuleError::NullContext {
                path: path.to_string(),
            })
        }
    };

    trace!(path, "resolving property path");

    let segments: Vec<&str> = path.split('.').collect();
    walk(context, &segments, path)
}

fn walk(current: &Value, segments: &[&str], path: &str) -> Result<Value> {
    let Some((segment, rest)) = segments.split_first() else {
        return Ok(current.clone());
    };

    match current {
        Value::Null => Err(RuleError::NullContext {
            path: path.to_string(),
        }),
        Value::Record(map) => match map.get(*segment) {
            Some(child) => walk(child, rest, path),
            None => Err(not_found(current, segment, path)),
        },
        Value::Opaque(source) => match source.property(segment) {
            Some(child) => walk(&child, rest, path),
            None => Err(not_found(current, segment, path)),
        },
        _ => Err(not_found(current, segment, path)),
    }
}

fn not_found(value: &Value, segment: &str, path: &str) -> RuleError {
    RuleError::PropertyNotFound {
        path: path.to_string(),
        segment: segment.to_string(),
        suggestion: suggest(segment, &value.property_names()),
    }
}

/// closest property name within the threshold
fn suggest(segment: &str, names: &[String]) -> Option<String> {
    let query = segment.to_lowercase();

    let mut candidates: Vec<_> = names
        .iter()
        .map(|name| (name, levenshtein(&query, &name.to_lowercase())))
        .filter(|(_, distance)| *distance <= SUGGESTION_THRESHOLD)
        .collect();

    candidates.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)));

    candidates.first().map(|(name, _)| name.to_string())
}

/// resolve `path` to a sequence, optionally projecting each element through
/// `item_path`
///
/// text never counts as a sequence.
pub fn resolve_sequence(
    context: Option<&Value>,
    path: Option<&str>,
    item_path: Option<&str>,
) -> Result<Vec<Value>> {
    let resolved = resolve(context, path)?;
    let items = as_sequence(&resolved, path.unwrap_or_default())?;
    project(items, item_path)
}

/// elements of a value expected to be a sequence
pub(crate) fn as_sequence(value: &Value, path: &str) -> Result<Vec<Value>> {
    if let Value::Text(_) = value {
        return Err(not_an_array(value, path));
    }

    value.items().ok_or_else(|| not_an_array(value, path))
}

fn not_an_array(value: &Value, path: &str) -> RuleError {
    RuleError::NotAnArray {
        path: path.to_string(),
        found: value.type_name().to_string(),
    }
}

fn project(items: Vec<Value>, item_path: Option<&str>) -> Result<Vec<Value>> {
    match item_path {
        Some(p) if !p.trim().is_empty() => {
            trace!(item_path = p, count = items.len(), "projecting array items");
            items
                .iter()
                .map(|item| resolve(Some(item), Some(p)))
                .collect()
        }
        _ => Ok(items),
    }
}
