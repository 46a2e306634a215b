//! State Paths
//!
//! Paths address locations in the state tree as dot-separated segments,
//! e.g. `items.length` or `users.42.name`. Two paths *overlap* when one is a
//! segment prefix of the other: a change to `a.b` affects a reader of
//! `a.b.c`, and a change to `a.b.c` affects a reader of `a.b`.
//!
//! A trailing `*` segment enumerates the children of the parent location.
//! It is the only wildcard form accepted for dependency registration; a `*`
//! anywhere else leaves the location ambiguous.

use serde_json::Value;
use smallvec::SmallVec;

use crate::error::{Result, ViewError};

/// The wildcard segment.
pub const WILDCARD: &str = "*";

type Segments<'a> = SmallVec<[&'a str; 8]>;

/// Split a path into its non-empty segments.
pub fn segments(path: &str) -> Segments<'_> {
    path.split('.').filter(|s| !s.is_empty()).collect()
}

/// Whether `prefix` is a segment prefix of (or equal to) `path`.
///
/// A wildcard segment on either side matches any single segment.
pub fn is_prefix(prefix: &str, path: &str) -> bool {
    let prefix = segments(prefix);
    let path = segments(path);

    prefix.len() <= path.len()
        && prefix
            .iter()
            .zip(path.iter())
            .all(|(a, b)| a == b || *a == WILDCARD || *b == WILDCARD)
}

/// Bidirectional prefix match between a changed path and a read path.
pub fn paths_overlap(a: &str, b: &str) -> bool {
    is_prefix(a, b) || is_prefix(b, a)
}

/// Whether the path ends in a child-enumeration wildcard.
pub fn is_child_enumeration(path: &str) -> bool {
    segments(path).last() == Some(&WILDCARD)
}

/// Validate that `path` names a concrete location in the current state.
///
/// `value` is what the state getter returned for `path`. Returns the path
/// unchanged on success.
pub fn ensure_strict_path(path: &str, value: Option<&Value>) -> Result<String> {
    let segs = segments(path);
    let Some((last, parents)) = segs.split_last() else {
        return Err(ViewError::UnresolvedPath { path: path.to_owned() });
    };

    if parents.contains(&WILDCARD) {
        return Err(ViewError::AmbiguousPath { path: path.to_owned() });
    }

    match value {
        None => Err(ViewError::UnresolvedPath { path: path.to_owned() }),
        Some(Value::Object(_) | Value::Array(_)) => Ok(path.to_owned()),
        Some(_) if *last == WILDCARD => Err(ViewError::UnresolvedPath { path: path.to_owned() }),
        Some(_) => Ok(path.to_owned()),
    }
}

/// Read a path out of a JSON state tree.
///
/// Objects are indexed by key, arrays by numeric segment, and `length` on an
/// array yields its length. A trailing `*` returns the enumerable parent.
pub fn read_path(root: &Value, path: &str) -> Option<Value> {
    let segs = segments(path);
    let mut current = root;

    for (index, segment) in segs.iter().enumerate() {
        if *segment == WILDCARD {
            let trailing = index + 1 == segs.len();
            return match current {
                Value::Object(_) | Value::Array(_) if trailing => Some(current.clone()),
                _ => None,
            };
        }

        current = match current {
            Value::Object(map) => map.get(*segment)?,
            Value::Array(items) if *segment == "length" && index + 1 == segs.len() => {
                return Some(Value::from(items.len()));
            }
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }

    Some(current.clone())
}

/// List the child keys of an object or array, as strings.
pub fn child_keys(value: &Value) -> Vec<Value> {
    match value {
        Value::Object(map) => map.keys().map(|key| Value::String(key.clone())).collect(),
        Value::Array(items) => (0..items.len()).map(|i| Value::String(i.to_string())).collect(),
        _ => Vec::new(),
    }
}
