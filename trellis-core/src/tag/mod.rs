//! Tags
//!
//! A tag is a declarative descriptor pointing into state, at a signal, or at
//! an incoming prop. Tags are resolved lazily against [`Getters`], so a
//! tag's path may itself depend on props or other state, e.g. a state tag
//! for `users.{props.id}`.
//!
//! A tag may carry nested tags it was composed from. Dependency
//! registration walks the tag and everything nested inside it, so a state
//! path interpolating another state value registers both locations.

mod getters;
mod resolve;

use std::fmt::{self, Debug};
use std::sync::Arc;

use serde_json::Value;

use crate::error::Result;
use crate::props::PropValue;

pub use getters::{Getters, SignalGetter, StateGetter};
pub use resolve::{resolve_tag, tag_state_paths};

/// Computes a tag's path from the current getters.
pub type PathFn = Arc<dyn Fn(&Getters<'_>) -> String + Send + Sync>;

/// Computes a tag's value from the current getters.
pub type ValueFn = Arc<dyn Fn(&Getters<'_>) -> Result<PropValue> + Send + Sync>;

fn into_value_fn<F>(value: F) -> ValueFn
where
    F: Fn(&Getters<'_>) -> Result<PropValue> + Send + Sync + 'static,
{
    Arc::new(value)
}

/// What a tag points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    State,
    Signal,
    Props,
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TagKind::State => "state",
            TagKind::Signal => "signal",
            TagKind::Props => "props",
        })
    }
}

/// A declarative path expression.
#[derive(Clone)]
pub struct Tag {
    kind: TagKind,
    path: Option<PathFn>,
    value: Option<ValueFn>,
    is_state_dependency: bool,
    nested: Vec<Tag>,
}

impl Tag {
    /// A bare tag of the given kind, with no path or value function.
    ///
    /// Use the `with_*` methods to fill it in. The convenience constructors
    /// below are usually what you want.
    pub fn new(kind: TagKind) -> Self {
        Self {
            kind,
            path: None,
            value: None,
            is_state_dependency: false,
            nested: Vec::new(),
        }
    }

    /// A state tag at a fixed path. State tags are state dependencies.
    pub fn state(path: impl Into<String>) -> Self {
        let path = path.into();
        Self::state_with(move |_| path.clone())
    }

    /// A state tag whose path is computed from the getters.
    pub fn state_with<F>(path: F) -> Self
    where
        F: Fn(&Getters<'_>) -> String + Send + Sync + 'static,
    {
        Self::new(TagKind::State)
            .with_path(path)
            .state_dependency(true)
    }

    /// A signal tag at a fixed path.
    pub fn signal(path: impl Into<String>) -> Self {
        let path = path.into();
        Self::signal_with(move |_| path.clone())
    }

    /// A signal tag whose path is computed from the getters.
    pub fn signal_with<F>(path: F) -> Self
    where
        F: Fn(&Getters<'_>) -> String + Send + Sync + 'static,
    {
        let path: PathFn = Arc::new(path);
        let lookup = Arc::clone(&path);

        Self {
            path: Some(path),
            value: Some(into_value_fn(move |getters| {
                getters.signal(&lookup(getters)).map(PropValue::Signal)
            })),
            ..Self::new(TagKind::Signal)
        }
    }

    /// A props tag reading the prop at `path`. Missing props read as null.
    pub fn props(path: impl Into<String>) -> Self {
        let path = path.into();
        Self::props_with(move |_| path.clone())
    }

    /// A props tag whose prop path is computed from the getters.
    pub fn props_with<F>(path: F) -> Self
    where
        F: Fn(&Getters<'_>) -> String + Send + Sync + 'static,
    {
        let path: PathFn = Arc::new(path);
        let lookup = Arc::clone(&path);

        Self {
            path: Some(path),
            value: Some(into_value_fn(move |getters| {
                Ok(getters
                    .prop(&lookup(getters))
                    .unwrap_or(PropValue::Data(Value::Null)))
            })),
            ..Self::new(TagKind::Props)
        }
    }

    pub fn with_path<F>(mut self, path: F) -> Self
    where
        F: Fn(&Getters<'_>) -> String + Send + Sync + 'static,
    {
        self.path = Some(Arc::new(path));
        self
    }

    pub fn with_value<F>(mut self, value: F) -> Self
    where
        F: Fn(&Getters<'_>) -> Result<PropValue> + Send + Sync + 'static,
    {
        self.value = Some(into_value_fn(value));
        self
    }

    /// Set whether this tag's path is registered as a state dependency.
    pub fn state_dependency(mut self, is_state_dependency: bool) -> Self {
        self.is_state_dependency = is_state_dependency;
        self
    }

    /// Attach a tag this one was composed from.
    pub fn with_nested(mut self, tag: Tag) -> Self {
        self.nested.push(tag);
        self
    }

    pub fn kind(&self) -> TagKind {
        self.kind
    }

    pub fn is_state_dependency(&self) -> bool {
        self.is_state_dependency
    }

    /// Compute the path, or `None` if the tag has no path function.
    pub fn path(&self, getters: &Getters<'_>) -> Option<String> {
        self.path.as_ref().map(|path| path(getters))
    }

    /// This tag followed by every nested tag, depth first.
    pub fn tags(&self) -> Vec<&Tag> {
        let mut tags = vec![self];
        for nested in &self.nested {
            tags.extend(nested.tags());
        }
        tags
    }

    pub(crate) fn value_fn(&self) -> Option<&ValueFn> {
        self.value.as_ref()
    }
}

impl Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tag")
            .field("kind", &self.kind)
            .field("has_path", &self.path.is_some())
            .field("has_value", &self.value.is_some())
            .field("is_state_dependency", &self.is_state_dependency)
            .field("nested", &self.nested)
            .finish()
    }
}
