//! In-memory subscription store.
//!
//! Maps each registered state path to the set of views depending on it.
//! Lookups on a change walk every registered path and use the same
//! segment-overlap rule as the trackers, so a change to `a` wakes views on
//! `a.b` and a change to `a.b.c` wakes views on `a.b`.

use indexmap::{IndexMap, IndexSet};
use parking_lot::RwLock;

use super::DependencyStore;
use crate::path::paths_overlap;
use crate::view::{DependencyMap, ViewId};

/// A [`DependencyStore`] keeping path → views in memory.
#[derive(Debug, Default)]
pub struct ComponentDependencyStore {
    paths: RwLock<IndexMap<String, IndexSet<ViewId>>>,
}

impl ComponentDependencyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Views depending on any of the changed paths, each listed once.
    pub fn entities_for_changes<S: AsRef<str>>(&self, changes: &[S]) -> Vec<ViewId> {
        let paths = self.paths.read();
        let mut views = IndexSet::new();

        for (path, entities) in paths.iter() {
            if changes.iter().any(|change| paths_overlap(change.as_ref(), path)) {
                views.extend(entities.iter().copied());
            }
        }

        views.into_iter().collect()
    }

    /// The paths `view` is currently registered under.
    pub fn dependencies_of(&self, view: ViewId) -> DependencyMap {
        self.paths
            .read()
            .iter()
            .filter(|(_, entities)| entities.contains(&view))
            .map(|(path, _)| path.clone())
            .collect()
    }

    /// Number of distinct paths with at least one registered view.
    pub fn path_count(&self) -> usize {
        self.paths.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.read().is_empty()
    }
}

impl DependencyStore for ComponentDependencyStore {
    fn add_entity(&self, view: ViewId, map: &DependencyMap) {
        let mut paths = self.paths.write();
        for path in map.iter() {
            paths.entry(path.to_owned()).or_default().insert(view);
        }
    }

    fn remove_entity(&self, view: ViewId, map: &DependencyMap) {
        let mut paths = self.paths.write();
        for path in map.iter() {
            let emptied = match paths.get_mut(path) {
                Some(entities) => {
                    entities.shift_remove(&view);
                    entities.is_empty()
                }
                None => false,
            };
            if emptied {
                paths.shift_remove(path);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(paths: &[&str]) -> DependencyMap {
        paths.iter().copied().collect()
    }

    #[test]
    fn add_and_remove_entities() {
        let store = ComponentDependencyStore::new();
        let view = ViewId::new();

        store.add_entity(view, &map(&["a", "b"]));
        assert_eq!(store.path_count(), 2);
        assert_eq!(store.dependencies_of(view), map(&["a", "b"]));

        store.remove_entity(view, &map(&["a", "b"]));
        assert!(store.is_empty());
        assert!(store.dependencies_of(view).is_empty());
    }

    #[test]
    fn shared_paths_survive_partial_removal() {
        let store = ComponentDependencyStore::new();
        let first = ViewId::new();
        let second = ViewId::new();

        store.add_entity(first, &map(&["shared"]));
        store.add_entity(second, &map(&["shared"]));
        store.remove_entity(first, &map(&["shared"]));

        assert_eq!(store.entities_for_changes(&["shared"]), vec![second]);
    }

    #[test]
    fn update_moves_only_the_difference() {
        let store = ComponentDependencyStore::new();
        let view = ViewId::new();
        let other = ViewId::new();

        store.add_entity(view, &map(&["x", "y"]));
        store.add_entity(other, &map(&["x"]));
        store.update_entity(view, &map(&["x", "y"]), &map(&["y", "z"]));

        assert_eq!(store.dependencies_of(view), map(&["y", "z"]));
        assert_eq!(store.dependencies_of(other), map(&["x"]));
    }

    #[test]
    fn changes_wake_overlapping_views_once() {
        let store = ComponentDependencyStore::new();
        let list = ViewId::new();
        let item = ViewId::new();
        let title = ViewId::new();

        store.add_entity(list, &map(&["items", "items.length"]));
        store.add_entity(item, &map(&["items.0.name"]));
        store.add_entity(title, &map(&["title"]));

        let woken = store.entities_for_changes(&["items.0"]);
        assert_eq!(woken, vec![list, item]);

        assert_eq!(store.entities_for_changes(&["title"]), vec![title]);
        assert!(store.entities_for_changes(&["other"]).is_empty());
    }
}
