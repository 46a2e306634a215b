//! Subscription Store
//!
//! The store records which view instances depend on which state paths so
//! that a state mutation wakes only the affected instances. View instances
//! talk to it through [`DependencyStore`] and never look inside.
//!
//! Registration is diff-based: after an update an instance hands over both
//! its previous and next dependency maps, and the store adds and removes the
//! difference for that instance only.

mod component_store;

pub use component_store::ComponentDependencyStore;

use crate::view::{DependencyMap, ViewId};

/// Registration primitives a view instance uses.
pub trait DependencyStore: Send + Sync {
    /// Register `view` under every path in `map`.
    fn add_entity(&self, view: ViewId, map: &DependencyMap);

    /// Remove `view` from every path in `map`.
    fn remove_entity(&self, view: ViewId, map: &DependencyMap);

    /// Move `view` from `prev` to `next`, touching only the difference.
    fn update_entity(&self, view: ViewId, prev: &DependencyMap, next: &DependencyMap) {
        let diff = prev.diff(next);
        if !diff.removed.is_empty() {
            self.remove_entity(view, &diff.removed_map());
        }
        if !diff.added.is_empty() {
            self.add_entity(view, &diff.added_map());
        }
    }
}
