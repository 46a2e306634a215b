//! View Instance
//!
//! A view instance binds one component instance to shared state. It owns
//! the component's dependency descriptors, a tracker for every computed
//! descriptor, and the dependency maps derived from both.
//!
//! # Lifecycle
//!
//! `Created → Mounted → Unmounted`. Construction runs every tracker once
//! and computes the initial maps without touching the store. Mounting
//! registers the combined map. Updates are only accepted while mounted and
//! diff-register with the store. Unmounting deregisters and is terminal.
//!
//! # Updates
//!
//! - A props update reruns the trackers that read a changed prop and
//!   recomputes the tags map, since tag paths may read props.
//! - A state update reruns the trackers whose reads overlap a changed path.
//!   The tags map is left alone: a tag's path set does not move when only
//!   state values change. A forced update reruns every tracker and
//!   recomputes the tags map.
//!
//! Fallible work happens before anything is committed, so a failed update
//! leaves the instance and its registration untouched.

use std::cell::Cell;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, trace, warn};

use super::maps::{DependencyDiff, DependencyMap, TrackerMaps, ViewDependencyMaps};
use super::{Dependencies, Dependency, Resolver, ViewId, ViewOptions};
use crate::error::{Result, ViewError};
use crate::props::{changed_props, PropValue, Props};
use crate::store::DependencyStore;
use crate::tag::{resolve_tag, tag_state_paths, Getters, SignalGetter, StateGetter};
use crate::tracker::DependencyTracker;

const NO_CHANGES: &[&str] = &[];

/// Combines derived props with raw props when materializing.
pub type MergeProps = Arc<dyn Fn(Props, &Props, &Resolver<'_>) -> Result<Props> + Send + Sync>;

/// Where a view instance is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    Created,
    Mounted,
    Unmounted,
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Lifecycle::Created => "not mounted",
            Lifecycle::Mounted => "mounted",
            Lifecycle::Unmounted => "unmounted",
        })
    }
}

/// Everything needed to construct a [`ViewInstance`].
pub struct ViewConfig {
    dependencies: Dependencies,
    props: Props,
    display_name: String,
    merge_props: Option<MergeProps>,
    state: StateGetter,
    signal: SignalGetter,
    store: Arc<dyn DependencyStore>,
    options: ViewOptions,
}

impl ViewConfig {
    pub fn new(
        dependencies: Dependencies,
        state: StateGetter,
        signal: SignalGetter,
        store: Arc<dyn DependencyStore>,
    ) -> Self {
        Self {
            dependencies,
            props: Props::new(),
            display_name: "Anonymous".to_owned(),
            merge_props: None,
            state,
            signal,
            store,
            options: ViewOptions::default(),
        }
    }

    /// Initial props.
    pub fn with_props(mut self, props: Props) -> Self {
        self.props = props;
        self
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    /// Called with `(derived, raw, resolver)` instead of the default merge.
    pub fn with_merge_props<F>(mut self, merge: F) -> Self
    where
        F: Fn(Props, &Props, &Resolver<'_>) -> Result<Props> + Send + Sync + 'static,
    {
        self.merge_props = Some(Arc::new(merge));
        self
    }

    pub fn with_options(mut self, options: ViewOptions) -> Self {
        self.options = options;
        self
    }
}

/// The dependency state of one bound component instance.
pub struct ViewInstance {
    id: ViewId,
    display_name: String,
    dependencies: Dependencies,

    /// One tracker per computed descriptor, fixed at construction.
    trackers: IndexMap<String, DependencyTracker>,

    maps: ViewDependencyMaps,
    props: Props,
    merge_props: Option<MergeProps>,
    state: StateGetter,
    signal: SignalGetter,
    store: Arc<dyn DependencyStore>,
    options: ViewOptions,
    lifecycle: Lifecycle,
    has_warned_big_component: Cell<bool>,
}

impl ViewInstance {
    /// Build the instance, running every computed tracker once.
    pub fn new(config: ViewConfig) -> Result<Self> {
        let ViewConfig {
            dependencies,
            props,
            display_name,
            merge_props,
            state,
            signal,
            store,
            options,
        } = config;

        let mut trackers = IndexMap::new();
        for (key, dependency) in dependencies.iter() {
            match dependency {
                Some(Dependency::Computed(compute)) => {
                    let mut tracker = DependencyTracker::new(compute.clone());
                    tracker.run(&state, &props);
                    trackers.insert(key.to_owned(), tracker);
                }
                Some(Dependency::Tag(_)) | None => {}
            }
        }

        let mut view = Self {
            id: ViewId::new(),
            display_name,
            dependencies,
            trackers,
            maps: ViewDependencyMaps::default(),
            props,
            merge_props,
            state,
            signal,
            store,
            options,
            lifecycle: Lifecycle::Created,
            has_warned_big_component: Cell::new(false),
        };

        let tags = view.tags_dependency_map(&view.props)?;
        view.maps = ViewDependencyMaps {
            trackers: TrackerMaps::collect(&view.trackers),
            tags,
        };

        debug!(
            component = %view.display_name,
            view = %view.id,
            dependencies = view.dependencies.len(),
            trackers = view.trackers.len(),
            "view instance created"
        );

        Ok(view)
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// The raw props snapshot from the last update.
    pub fn current_props(&self) -> &Props {
        &self.props
    }

    pub fn dependency_maps(&self) -> &ViewDependencyMaps {
        &self.maps
    }

    /// The combined map as registered with the store.
    pub fn dependency_map(&self) -> DependencyMap {
        self.maps.combined()
    }

    pub fn tracker(&self, key: &str) -> Option<&DependencyTracker> {
        self.trackers.get(key)
    }

    pub fn has_warned_big_component(&self) -> bool {
        self.has_warned_big_component.get()
    }

    /// Register the combined dependency map with the store.
    pub fn mount(&mut self) -> Result<()> {
        self.ensure(Lifecycle::Created, "mount")?;

        let map = self.maps.combined();
        self.store.add_entity(self.id, &map);
        if let Some(devtools) = &self.options.devtools {
            devtools.update_components_map(self.id, &self.display_name, &map);
        }
        self.lifecycle = Lifecycle::Mounted;

        debug!(component = %self.display_name, view = %self.id, paths = map.len(), "view mounted");
        Ok(())
    }

    /// Deregister from the store. The instance cannot be used afterwards.
    pub fn unmount(&mut self) -> Result<()> {
        self.ensure(Lifecycle::Mounted, "unmount")?;

        self.store.remove_entity(self.id, &self.maps.combined());
        self.lifecycle = Lifecycle::Unmounted;

        debug!(component = %self.display_name, view = %self.id, "view unmounted");
        Ok(())
    }

    /// Handle new props from the parent.
    ///
    /// Returns `false` without touching anything when no prop changed.
    pub fn on_props_update(&mut self, prev: &Props, next: Props) -> Result<bool> {
        self.ensure(Lifecycle::Mounted, "update props")?;

        let changed = changed_props(prev, &next);
        if changed.is_empty() {
            return Ok(false);
        }

        self.update_from_props(&changed, next)?;
        Ok(true)
    }

    /// Rerun trackers reading any changed prop and recompute the tags map.
    pub fn update_from_props<P: AsRef<str>>(&mut self, changed: &[P], props: Props) -> Result<DependencyDiff> {
        self.ensure(Lifecycle::Mounted, "update props")?;

        let tags = self.tags_dependency_map(&props)?;
        let rerun = self.rerun_matching(NO_CHANGES, changed, &props);
        Ok(self.update(props, rerun, Some(tags)))
    }

    /// Rerun trackers affected by changed state paths.
    ///
    /// With `force`, every tracker reruns and the tags map is recomputed,
    /// for when the dependency definitions themselves may have changed.
    pub fn update_from_state<S: AsRef<str>>(
        &mut self,
        changed: &[S],
        props: Props,
        force: bool,
    ) -> Result<DependencyDiff> {
        self.ensure(Lifecycle::Mounted, "update from state")?;

        if force {
            let tags = self.tags_dependency_map(&props)?;
            let rerun = self.rerun_all(&props);
            Ok(self.update(props, rerun, Some(tags)))
        } else {
            let rerun = self.rerun_matching(changed, NO_CHANGES, &props);
            Ok(self.update(props, rerun, None))
        }
    }

    /// Materialize the props to render with.
    ///
    /// Raw props win over derived props of the same key unless a merge
    /// function was configured.
    pub fn props(&self) -> Result<Props> {
        let getters = Getters::new(&self.state, &self.signal, &self.props);
        let mut derived = Props::with_capacity(self.dependencies.len());

        for (key, dependency) in self.dependencies.iter() {
            let value = match dependency {
                None => return Err(self.missing_dependency(key)),
                Some(Dependency::Computed(_)) => match self.trackers.get(key) {
                    Some(tracker) => PropValue::Data(tracker.value().clone()),
                    None => return Err(self.missing_dependency(key)),
                },
                Some(Dependency::Tag(tag)) => resolve_tag(tag, &getters, &self.display_name, key)?,
            };
            derived.insert(key.to_owned(), value);
        }

        self.warn_if_big();

        match &self.merge_props {
            Some(merge) => merge(derived, &self.props, &Resolver::new(getters, &self.display_name)),
            None => {
                let mut merged = derived;
                merged.extend(self.props.iter().map(|(key, value)| (key.clone(), value.clone())));
                Ok(merged)
            }
        }
    }

    /// Swap in the next maps and diff-register them.
    fn update(&mut self, props: Props, trackers_changed: bool, tags: Option<DependencyMap>) -> DependencyDiff {
        let next_maps = ViewDependencyMaps {
            trackers: if trackers_changed {
                TrackerMaps::collect(&self.trackers)
            } else {
                self.maps.trackers.clone()
            },
            tags: tags.unwrap_or_else(|| self.maps.tags.clone()),
        };

        let prev = self.maps.combined();
        let next = next_maps.combined();
        let diff = prev.diff(&next);
        self.store.update_entity(self.id, &prev, &next);

        trace!(
            component = %self.display_name,
            view = %self.id,
            added = ?diff.added,
            removed = ?diff.removed,
            "dependencies updated"
        );

        self.maps = next_maps;
        self.props = props;
        diff
    }

    fn rerun_matching<S, P>(&mut self, changed_state: &[S], changed_props: &[P], props: &Props) -> bool
    where
        S: AsRef<str>,
        P: AsRef<str>,
    {
        let mut rerun = false;
        for (key, tracker) in self.trackers.iter_mut() {
            if tracker.matches(changed_state, changed_props) {
                tracker.run(&self.state, props);
                trace!(component = %self.display_name, key = %key, "tracker rerun");
                rerun = true;
            }
        }
        rerun
    }

    fn rerun_all(&mut self, props: &Props) -> bool {
        for tracker in self.trackers.values_mut() {
            tracker.run(&self.state, props);
        }
        trace!(component = %self.display_name, trackers = self.trackers.len(), "forced tracker rerun");
        !self.trackers.is_empty()
    }

    /// Strict state paths of every state-dependency tag, against `props`.
    fn tags_dependency_map(&self, props: &Props) -> Result<DependencyMap> {
        let getters = Getters::new(&self.state, &self.signal, props);
        let mut map = DependencyMap::new();

        for (key, dependency) in self.dependencies.iter() {
            match dependency {
                None => return Err(self.missing_dependency(key)),
                Some(Dependency::Computed(_)) => {}
                Some(Dependency::Tag(tag)) => {
                    map.extend(tag_state_paths(tag, &getters, &self.display_name, key)?);
                }
            }
        }

        Ok(map)
    }

    fn warn_if_big(&self) {
        let Some(threshold) = self.options.big_components_warning else {
            return;
        };

        if !self.has_warned_big_component.get() && self.dependencies.len() >= threshold {
            warn!(
                component = %self.display_name,
                dependencies = self.dependencies.len(),
                threshold,
                "component has a lot of dependencies, consider refactoring or raising the warning threshold"
            );
            self.has_warned_big_component.set(true);
        }
    }

    fn ensure(&self, expected: Lifecycle, action: &'static str) -> Result<()> {
        if self.lifecycle == expected {
            Ok(())
        } else {
            Err(ViewError::InvalidTransition {
                component: self.display_name.clone(),
                action,
                state: self.lifecycle,
            })
        }
    }

    fn missing_dependency(&self, key: &str) -> ViewError {
        ViewError::MissingDependency {
            component: self.display_name.clone(),
            key: key.to_owned(),
        }
    }
}

impl fmt::Debug for ViewInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewInstance")
            .field("id", &self.id)
            .field("display_name", &self.display_name)
            .field("lifecycle", &self.lifecycle)
            .field("trackers", &self.trackers.len())
            .field("maps", &self.maps)
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
