//! Resolver handed to merge functions.

use crate::error::Result;
use crate::props::PropValue;
use crate::tag::{resolve_tag, Getters, Tag};
use crate::tracker::DependencyTracker;

use super::Dependency;

/// Resolves descriptors against a view's getters on demand.
///
/// Computed descriptors are evaluated fresh; their reads are not tracked
/// by the view.
#[derive(Clone, Copy)]
pub struct Resolver<'a> {
    getters: Getters<'a>,
    component: &'a str,
}

impl<'a> Resolver<'a> {
    pub fn new(getters: Getters<'a>, component: &'a str) -> Self {
        Self { getters, component }
    }

    /// The value a descriptor resolves to right now.
    pub fn value(&self, dependency: &Dependency) -> Result<PropValue> {
        match dependency {
            Dependency::Computed(compute) => {
                let mut tracker = DependencyTracker::new(compute.clone());
                let run = tracker.run(self.getters.state_getter(), self.getters.props());
                Ok(PropValue::Data(run.value.clone()))
            }
            Dependency::Tag(tag) => resolve_tag(tag, &self.getters, self.component, "<resolver>"),
        }
    }

    /// The path a tag resolves to right now.
    pub fn path(&self, tag: &Tag) -> Option<String> {
        tag.path(&self.getters)
    }

    pub fn getters(&self) -> &Getters<'a> {
        &self.getters
    }
}
