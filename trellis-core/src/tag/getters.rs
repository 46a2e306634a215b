//! Getters handed to tags and merge resolvers.

use std::sync::Arc;

use serde_json::Value;

use crate::error::{Result, ViewError};
use crate::props::{read_prop, PropValue, Props, Signal};

/// Synchronous read access to the shared state container.
pub type StateGetter = Arc<dyn Fn(&str) -> Option<Value> + Send + Sync>;

/// Synchronous lookup of a dispatchable signal.
pub type SignalGetter = Arc<dyn Fn(&str) -> Option<Signal> + Send + Sync>;

/// The state, signal and props access a tag resolves against.
#[derive(Clone, Copy)]
pub struct Getters<'a> {
    state: &'a StateGetter,
    signal: &'a SignalGetter,
    props: &'a Props,
}

impl<'a> Getters<'a> {
    pub fn new(state: &'a StateGetter, signal: &'a SignalGetter, props: &'a Props) -> Self {
        Self { state, signal, props }
    }

    /// Read state at `path`.
    pub fn state(&self, path: &str) -> Option<Value> {
        (self.state)(path)
    }

    /// Look up the signal at `path`.
    pub fn signal(&self, path: &str) -> Result<Signal> {
        (self.signal)(path).ok_or_else(|| ViewError::SignalNotFound { path: path.to_owned() })
    }

    /// Read a (possibly nested) prop.
    pub fn prop(&self, path: &str) -> Option<PropValue> {
        read_prop(self.props, path)
    }

    pub fn props(&self) -> &'a Props {
        self.props
    }

    pub(crate) fn state_getter(&self) -> &'a StateGetter {
        self.state
    }
}
