//! Dependency descriptors bound to a view's props.

use indexmap::IndexMap;

use crate::tag::Tag;
use crate::tracker::Compute;

/// How a single prop is derived.
#[derive(Debug, Clone)]
pub enum Dependency {
    /// A derivation whose reads are tracked.
    Computed(Compute),
    /// A declarative path expression.
    Tag(Tag),
}

impl From<Compute> for Dependency {
    fn from(compute: Compute) -> Self {
        Dependency::Computed(compute)
    }
}

impl From<Tag> for Dependency {
    fn from(tag: Tag) -> Self {
        Dependency::Tag(tag)
    }
}

/// The prop key → descriptor map a view is bound with.
///
/// A key may be declared before its descriptor is known; a view built with
/// such a key fails with a missing-dependency error.
#[derive(Debug, Clone, Default)]
pub struct Dependencies {
    entries: IndexMap<String, Option<Dependency>>,
}

impl Dependencies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `key` to a descriptor.
    pub fn with(mut self, key: impl Into<String>, dependency: impl Into<Dependency>) -> Self {
        self.insert(key, dependency);
        self
    }

    /// Declare `key` without a descriptor.
    pub fn declare(mut self, key: impl Into<String>) -> Self {
        self.entries.entry(key.into()).or_insert(None);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, dependency: impl Into<Dependency>) {
        self.entries.insert(key.into(), Some(dependency.into()));
    }

    /// `None` if the key is unknown, `Some(None)` if declared only.
    pub fn get(&self, key: &str) -> Option<Option<&Dependency>> {
        self.entries.get(key).map(Option::as_ref)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Dependency>)> {
        self.entries
            .iter()
            .map(|(key, dependency)| (key.as_str(), dependency.as_ref()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, D> FromIterator<(K, D)> for Dependencies
where
    K: Into<String>,
    D: Into<Dependency>,
{
    fn from_iter<I: IntoIterator<Item = (K, D)>>(iter: I) -> Self {
        let mut dependencies = Self::new();
        for (key, dependency) in iter {
            dependencies.insert(key, dependency);
        }
        dependencies
    }
}
