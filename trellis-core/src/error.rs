//! Errors raised while resolving view dependencies.
//!
//! Every error here is fatal to the operation that raised it. The driver
//! receives it synchronously and the instance is left as it was before the
//! call.

use thiserror::Error;

use crate::tag::TagKind;
use crate::view::Lifecycle;

/// Errors produced by tag resolution, dependency registration and the
/// view lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    /// A key was declared without a dependency descriptor.
    #[error("there is no dependency assigned to prop `{key}` in component {component}")]
    MissingDependency { component: String, key: String },

    /// A tag has no path function.
    #[error("prop `{key}` in component {component} uses a tag without a path")]
    MissingTagPath { component: String, key: String },

    /// A signal or props tag has no value function.
    #[error("prop `{key}` in component {component} uses a {kind} tag without a value resolver")]
    MissingTagValue {
        component: String,
        key: String,
        kind: TagKind,
    },

    /// A state path contains a wildcard segment other than a trailing `*`.
    #[error("state path `{path}` is ambiguous, only a trailing `*` may enumerate children")]
    AmbiguousPath { path: String },

    /// A state path does not point at a value in the current state.
    #[error("state path `{path}` does not resolve to a value")]
    UnresolvedPath { path: String },

    /// The signal getter has nothing registered at the path.
    #[error("no signal registered at `{path}`")]
    SignalNotFound { path: String },

    /// A signal tag failed to resolve while materializing props.
    #[error("component {component}: there is no signal at `{path}`")]
    MissingSignal { component: String, path: String },

    /// A lifecycle method was called in the wrong state.
    #[error("component {component} cannot {action} while {state}")]
    InvalidTransition {
        component: String,
        action: &'static str,
        state: Lifecycle,
    },
}

/// Result alias used across the crate.
pub type Result<T, E = ViewError> = std::result::Result<T, E>;
