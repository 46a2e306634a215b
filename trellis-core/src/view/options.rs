//! Per-view options and the observability hook.

use std::fmt;
use std::sync::Arc;

use super::{DependencyMap, ViewId};

/// Advisory observer of view registrations, such as a devtools bridge.
pub trait ObservabilityHook: Send + Sync {
    /// Called when a view registers its dependency map on mount.
    fn update_components_map(&self, view: ViewId, display_name: &str, map: &DependencyMap);
}

/// Options that do not affect dependency resolution.
#[derive(Clone, Default)]
pub struct ViewOptions {
    /// Warn once when a view has at least this many dependencies.
    pub big_components_warning: Option<usize>,

    pub devtools: Option<Arc<dyn ObservabilityHook>>,
}

impl ViewOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_big_components_warning(mut self, threshold: usize) -> Self {
        self.big_components_warning = Some(threshold);
        self
    }

    pub fn with_devtools(mut self, devtools: Arc<dyn ObservabilityHook>) -> Self {
        self.devtools = Some(devtools);
        self
    }
}

impl fmt::Debug for ViewOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewOptions")
            .field("big_components_warning", &self.big_components_warning)
            .field("devtools", &self.devtools.is_some())
            .finish()
    }
}
