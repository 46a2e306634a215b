//! Dependency Maps
//!
//! A view depends on state through two sources:
//!
//! - **Tracker maps**: the state paths and prop keys its computed trackers
//!   read during their last runs.
//! - **Tags map**: the strict state paths of its state tags.
//!
//! The union of the tags map and the trackers' state paths is the
//! [`DependencyMap`] registered with the subscription store. It is always
//! derived from the two sources on demand and never stored on its own.

use std::fmt;

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use crate::tracker::{DependencyTracker, TrackFlatMap};

/// A set of state paths, in insertion order.
///
/// Equality ignores order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DependencyMap(IndexSet<String>);

impl DependencyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a path. Returns `false` if it was already present.
    pub fn insert(&mut self, path: impl Into<String>) -> bool {
        self.0.insert(path.into())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.0.contains(path)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// What changes going from `self` to `next`.
    pub fn diff(&self, next: &DependencyMap) -> DependencyDiff {
        DependencyDiff {
            added: next.0.difference(&self.0).cloned().collect(),
            removed: self.0.difference(&next.0).cloned().collect(),
        }
    }
}

impl FromIterator<String> for DependencyMap {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a str> for DependencyMap {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self(iter.into_iter().map(str::to_owned).collect())
    }
}

impl Extend<String> for DependencyMap {
    fn extend<I: IntoIterator<Item = String>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl<'a> IntoIterator for &'a DependencyMap {
    type Item = &'a String;
    type IntoIter = indexmap::set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Paths added and removed between two dependency maps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyDiff {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

impl DependencyDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    /// The added paths as a map.
    pub fn added_map(&self) -> DependencyMap {
        self.added.iter().cloned().collect()
    }

    /// The removed paths as a map.
    pub fn removed_map(&self) -> DependencyMap {
        self.removed.iter().cloned().collect()
    }
}

impl fmt::Display for DependencyDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "+{:?} -{:?}", self.added, self.removed)
    }
}

/// Union of every tracker's read sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackerMaps {
    pub state: TrackFlatMap,
    pub props: TrackFlatMap,
}

impl TrackerMaps {
    /// Collect the read sets of all trackers, in tracker order.
    pub fn collect(trackers: &IndexMap<String, DependencyTracker>) -> Self {
        let mut maps = Self::default();
        for tracker in trackers.values() {
            maps.state.extend(tracker.state_track().iter().cloned());
            maps.props.extend(tracker.props_track().iter().cloned());
        }
        maps
    }
}

/// Everything a view instance currently depends on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewDependencyMaps {
    pub trackers: TrackerMaps,
    pub tags: DependencyMap,
}

impl ViewDependencyMaps {
    /// The map registered with the subscription store.
    pub fn combined(&self) -> DependencyMap {
        let mut combined: DependencyMap = self.trackers.state.iter().cloned().collect();
        combined.extend(self.tags.iter().map(str::to_owned));
        combined
    }
}
