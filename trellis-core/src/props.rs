//! Props and signals passed into a bound view.

use std::fmt::{self, Debug};
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::path::read_path;

/// Props keyed by name, in insertion order.
pub type Props = IndexMap<String, PropValue>;

/// A single prop: plain data or a dispatchable signal.
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Data(Value),
    Signal(Signal),
}

impl PropValue {
    /// The data value, if this prop holds data.
    pub fn as_data(&self) -> Option<&Value> {
        match self {
            PropValue::Data(value) => Some(value),
            PropValue::Signal(_) => None,
        }
    }

    /// The signal, if this prop holds one.
    pub fn as_signal(&self) -> Option<&Signal> {
        match self {
            PropValue::Signal(signal) => Some(signal),
            PropValue::Data(_) => None,
        }
    }
}

impl From<Value> for PropValue {
    fn from(value: Value) -> Self {
        PropValue::Data(value)
    }
}

impl From<Signal> for PropValue {
    fn from(signal: Signal) -> Self {
        PropValue::Signal(signal)
    }
}

/// A handle to a dispatchable action registered under a path.
///
/// Two handles are equal when they name the same path and share the same
/// handler.
#[derive(Clone)]
pub struct Signal {
    path: String,
    handler: Arc<dyn Fn(Value) + Send + Sync>,
}

impl Signal {
    /// Create a signal handle for `path`.
    pub fn new<F>(path: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Value) + Send + Sync + 'static,
    {
        Self {
            path: path.into(),
            handler: Arc::new(handler),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Dispatch the signal with a payload.
    pub fn call(&self, payload: Value) {
        (self.handler)(payload);
    }
}

impl PartialEq for Signal {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path && Arc::ptr_eq(&self.handler, &other.handler)
    }
}

impl Debug for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal").field("path", &self.path).finish()
    }
}

/// Read a possibly nested prop, e.g. `user.name` reads `name` out of the
/// `user` prop's data.
pub fn read_prop(props: &Props, path: &str) -> Option<PropValue> {
    let (key, rest) = match path.split_once('.') {
        Some((key, rest)) => (key, Some(rest)),
        None => (path, None),
    };
    let prop = props.get(key)?;

    match (prop, rest) {
        (_, None) => Some(prop.clone()),
        (PropValue::Data(value), Some(rest)) => read_path(value, rest).map(PropValue::Data),
        (PropValue::Signal(_), Some(_)) => None,
    }
}

/// Keys whose values differ between two props snapshots.
///
/// Added and removed keys count as changed. Values are compared shallowly
/// by equality.
pub fn changed_props(prev: &Props, next: &Props) -> Vec<String> {
    let mut changed: Vec<String> = next
        .iter()
        .filter(|(key, value)| prev.get(*key) != Some(*value))
        .map(|(key, _)| key.clone())
        .collect();

    changed.extend(prev.keys().filter(|key| !next.contains_key(*key)).cloned());
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(entries: &[(&str, Value)]) -> Props {
        entries
            .iter()
            .map(|(key, value)| (key.to_string(), PropValue::Data(value.clone())))
            .collect()
    }

    #[test]
    fn identical_props_have_no_changes() {
        let a = props(&[("id", json!(1)), ("name", json!("x"))]);
        assert!(changed_props(&a, &a.clone()).is_empty());
    }

    #[test]
    fn changed_added_and_removed_keys() {
        let prev = props(&[("id", json!(1)), ("gone", json!(true))]);
        let next = props(&[("id", json!(2)), ("fresh", json!(0))]);
        assert_eq!(changed_props(&prev, &next), vec!["id", "fresh", "gone"]);
    }

    #[test]
    fn signals_compare_by_handler_identity() {
        let signal = Signal::new("app.clicked", |_| {});
        let same = signal.clone();
        let other = Signal::new("app.clicked", |_| {});

        assert_eq!(PropValue::from(signal.clone()), PropValue::from(same));
        assert_ne!(PropValue::from(signal), PropValue::from(other));
    }

    #[test]
    fn read_nested_prop() {
        let p = props(&[("user", json!({ "name": "ada" }))]);
        assert_eq!(read_prop(&p, "user.name"), Some(PropValue::Data(json!("ada"))));
        assert_eq!(read_prop(&p, "user"), Some(PropValue::Data(json!({ "name": "ada" }))));
        assert_eq!(read_prop(&p, "missing"), None);
    }
}
