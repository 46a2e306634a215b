//! Bound Views
//!
//! This module holds the orchestrating half of the crate: the
//! [`ViewInstance`] that binds one component instance to shared state, the
//! descriptors it is built from, and the dependency maps it registers with
//! the subscription store.
//!
//! # Flow
//!
//! 1. Construction runs every computed tracker once and resolves the strict
//!    paths of every state tag.
//! 2. Mounting registers the union of both as the view's dependency map.
//! 3. The store wakes the view on overlapping state changes; the view
//!    reruns only the affected trackers and diff-registers the result.
//! 4. Rendering asks the view for its materialized props.

mod dependencies;
mod id;
mod instance;
mod maps;
mod options;
mod resolver;

pub use dependencies::{Dependencies, Dependency};
pub use id::ViewId;
pub use instance::{Lifecycle, MergeProps, ViewConfig, ViewInstance};
pub use maps::{DependencyDiff, DependencyMap, TrackerMaps, ViewDependencyMaps};
pub use options::{ObservabilityHook, ViewOptions};
pub use resolver::Resolver;
