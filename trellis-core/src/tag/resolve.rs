//! Tag resolution against the current getters.

use serde_json::Value;

use super::{Getters, Tag, TagKind};
use crate::error::{Result, ViewError};
use crate::path::{child_keys, ensure_strict_path, is_child_enumeration};
use crate::props::PropValue;

fn missing_path(component: &str, key: &str) -> ViewError {
    ViewError::MissingTagPath {
        component: component.to_owned(),
        key: key.to_owned(),
    }
}

/// Resolve the value of the tag bound to prop `key` of `component`.
///
/// A state path ending in `*` resolves to the list of child keys at that
/// location. Signal failures are reported with the component name and the
/// attempted path.
pub fn resolve_tag(tag: &Tag, getters: &Getters<'_>, component: &str, key: &str) -> Result<PropValue> {
    match tag.kind() {
        TagKind::State => {
            let path = tag.path(getters).ok_or_else(|| missing_path(component, key))?;
            let value = getters.state(&path);

            if is_child_enumeration(&path) {
                let keys = value.as_ref().map(child_keys).unwrap_or_default();
                Ok(PropValue::Data(Value::Array(keys)))
            } else {
                Ok(PropValue::Data(value.unwrap_or(Value::Null)))
            }
        }
        TagKind::Signal => {
            let value = tag.value_fn().ok_or_else(|| ViewError::MissingTagValue {
                component: component.to_owned(),
                key: key.to_owned(),
                kind: TagKind::Signal,
            })?;

            value(getters).map_err(|_| ViewError::MissingSignal {
                component: component.to_owned(),
                path: tag.path(getters).unwrap_or_default(),
            })
        }
        TagKind::Props => {
            let value = tag.value_fn().ok_or_else(|| ViewError::MissingTagValue {
                component: component.to_owned(),
                key: key.to_owned(),
                kind: TagKind::Props,
            })?;

            value(getters)
        }
    }
}

/// Strict state paths contributed by the tag and its nested tags.
///
/// Only state tags flagged as state dependencies contribute. Each path is
/// probed against the current state and must resolve to a concrete
/// location.
pub fn tag_state_paths(tag: &Tag, getters: &Getters<'_>, component: &str, key: &str) -> Result<Vec<String>> {
    let mut paths = Vec::new();

    for tag in tag.tags() {
        if tag.kind() != TagKind::State || !tag.is_state_dependency() {
            continue;
        }

        let path = tag.path(getters).ok_or_else(|| missing_path(component, key))?;
        let value = getters.state(&path);
        paths.push(ensure_strict_path(&path, value.as_ref())?);
    }

    Ok(paths)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::path::read_path;
    use crate::props::{Props, Signal};
    use crate::tag::{SignalGetter, StateGetter};

    fn fixture() -> (StateGetter, SignalGetter, Props) {
        let tree = json!({
            "title": "A",
            "current": "b",
            "users": { "a": { "name": "ada" }, "b": { "name": "bob" } },
        });
        let state: StateGetter = Arc::new(move |path: &str| read_path(&tree, path));
        let signal: SignalGetter = Arc::new(|path: &str| {
            (path == "app.clicked").then(|| Signal::new(path, |_| {}))
        });
        let mut props = Props::new();
        props.insert("user".into(), PropValue::Data(json!("a")));
        (state, signal, props)
    }

    #[test]
    fn state_tag_resolves_value() {
        let (state, signal, props) = fixture();
        let getters = Getters::new(&state, &signal, &props);

        let value = resolve_tag(&Tag::state("title"), &getters, "View", "label").unwrap();
        assert_eq!(value, PropValue::Data(json!("A")));

        let missing = resolve_tag(&Tag::state("nope"), &getters, "View", "label").unwrap();
        assert_eq!(missing, PropValue::Data(Value::Null));
    }

    #[test]
    fn wildcard_state_tag_lists_child_keys() {
        let (state, signal, props) = fixture();
        let getters = Getters::new(&state, &signal, &props);

        let value = resolve_tag(&Tag::state("users.*"), &getters, "View", "ids").unwrap();
        assert_eq!(value, PropValue::Data(json!(["a", "b"])));

        let empty = resolve_tag(&Tag::state("missing.*"), &getters, "View", "ids").unwrap();
        assert_eq!(empty, PropValue::Data(json!([])));
    }

    #[test]
    fn missing_signal_names_component_and_path() {
        let (state, signal, props) = fixture();
        let getters = Getters::new(&state, &signal, &props);

        let found = resolve_tag(&Tag::signal("app.clicked"), &getters, "Button", "onClick").unwrap();
        assert_eq!(found.as_signal().map(Signal::path), Some("app.clicked"));

        let err = resolve_tag(&Tag::signal("app.missing"), &getters, "Button", "onClick").unwrap_err();
        assert_eq!(
            err,
            ViewError::MissingSignal {
                component: "Button".into(),
                path: "app.missing".into(),
            }
        );
    }

    #[test]
    fn props_tag_reads_props() {
        let (state, signal, props) = fixture();
        let getters = Getters::new(&state, &signal, &props);

        let value = resolve_tag(&Tag::props("user"), &getters, "View", "who").unwrap();
        assert_eq!(value, PropValue::Data(json!("a")));
    }

    #[test]
    fn tags_without_metadata_are_rejected() {
        let (state, signal, props) = fixture();
        let getters = Getters::new(&state, &signal, &props);

        let err = resolve_tag(&Tag::new(TagKind::State), &getters, "View", "x").unwrap_err();
        assert!(matches!(err, ViewError::MissingTagPath { .. }));

        let err = resolve_tag(&Tag::new(TagKind::Props), &getters, "View", "x").unwrap_err();
        assert!(matches!(err, ViewError::MissingTagValue { kind: TagKind::Props, .. }));
    }

    #[test]
    fn composite_tag_registers_every_state_path() {
        let (state, signal, props) = fixture();
        let getters = Getters::new(&state, &signal, &props);

        let tag = Tag::state_with(|g| {
            let current = g.state("current").and_then(|v| v.as_str().map(str::to_owned));
            format!("users.{}.name", current.unwrap_or_default())
        })
        .with_nested(Tag::state("current"));

        let paths = tag_state_paths(&tag, &getters, "View", "name").unwrap();
        assert_eq!(paths, vec!["users.b.name", "current"]);
    }

    #[test]
    fn props_and_untracked_tags_do_not_register() {
        let (state, signal, props) = fixture();
        let getters = Getters::new(&state, &signal, &props);

        let tag = Tag::state_with(|g| {
            let user = g.prop("user").and_then(|p| p.as_data()?.as_str().map(str::to_owned));
            format!("users.{}", user.unwrap_or_default())
        })
        .with_nested(Tag::props("user"))
        .with_nested(Tag::state("title").state_dependency(false));

        let paths = tag_state_paths(&tag, &getters, "View", "user").unwrap();
        assert_eq!(paths, vec!["users.a"]);
    }

    #[test]
    fn unresolvable_dependency_path_is_fatal() {
        let (state, signal, props) = fixture();
        let getters = Getters::new(&state, &signal, &props);

        let err = tag_state_paths(&Tag::state("users.*.name"), &getters, "View", "names").unwrap_err();
        assert!(matches!(err, ViewError::AmbiguousPath { .. }));

        let err = tag_state_paths(&Tag::state("subtitle"), &getters, "View", "sub").unwrap_err();
        assert!(matches!(err, ViewError::UnresolvedPath { .. }));
    }
}
