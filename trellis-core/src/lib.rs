//! Trellis Core
//!
//! This crate resolves, with path-level precision, which pieces of shared
//! state a bound view depends on, and recomputes only what a change touches.
//! It implements:
//!
//! - Computed trackers that record every state path and prop they read
//! - Tags: declarative paths into state, signals and props
//! - View instances that keep a subscription store's registration accurate
//!   through diff-based updates
//! - An in-memory subscription store
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `path`: Dotted state paths and segment-prefix matching
//! - `props`: Props, signals and shallow change detection
//! - `tag`: Tag descriptors and their resolution
//! - `tracker`: Computed derivations and read tracking
//! - `view`: View instances, descriptors and dependency maps
//! - `store`: The subscription store contract and a reference store
//!
//! Everything is synchronous. A single driver is expected to serialize all
//! calls into a given view instance.
//!
//! # Example
//!
//! ```rust,ignore
//! use trellis_core::{Compute, Dependencies, Tag, ViewConfig, ViewInstance};
//!
//! let deps = Dependencies::new()
//!     .with("count", Compute::new(|ctx| ctx.state("items.length").unwrap_or_default()))
//!     .with("label", Tag::state("title"));
//!
//! let mut view = ViewInstance::new(ViewConfig::new(deps, state, signal, store))?;
//! view.mount()?;
//!
//! // Later, the store reports that `items.length` changed:
//! view.update_from_state(&["items.length"], view.current_props().clone(), false)?;
//! let props = view.props()?;
//! ```

pub mod error;
pub mod path;
pub mod props;
pub mod store;
pub mod tag;
pub mod tracker;
pub mod view;

pub use error::{Result, ViewError};
pub use props::{PropValue, Props, Signal};
pub use store::{ComponentDependencyStore, DependencyStore};
pub use tag::{Getters, SignalGetter, StateGetter, Tag, TagKind};
pub use tracker::{Compute, DependencyTracker, TrackingContext};
pub use view::{
    Dependencies, Dependency, DependencyDiff, DependencyMap, Lifecycle, ObservabilityHook, Resolver,
    ViewConfig, ViewId, ViewInstance, ViewOptions,
};
