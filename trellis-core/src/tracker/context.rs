//! Tracking Context
//!
//! The tracking context is what a derivation reads through. Every state path
//! and prop key it touches is recorded in the context's own sets, which the
//! tracker collects once the derivation returns.

use indexmap::IndexSet;
use serde_json::Value;

use crate::props::{PropValue, Props};
use crate::tag::StateGetter;

/// Paths or keys read during a single tracker run, in first-read order.
pub type TrackFlatMap = IndexSet<String>;

/// Read access for a derivation, recording everything it touches.
pub struct TrackingContext<'a> {
    state: &'a StateGetter,
    props: &'a Props,
    state_reads: TrackFlatMap,
    props_reads: TrackFlatMap,
}

impl<'a> TrackingContext<'a> {
    pub(crate) fn new(state: &'a StateGetter, props: &'a Props) -> Self {
        Self {
            state,
            props,
            state_reads: TrackFlatMap::new(),
            props_reads: TrackFlatMap::new(),
        }
    }

    /// Read state at `path` and record the read.
    pub fn state(&mut self, path: &str) -> Option<Value> {
        self.state_reads.insert(path.to_owned());
        (self.state)(path)
    }

    /// Read the prop `key` and record the read.
    pub fn prop(&mut self, key: &str) -> Option<&'a PropValue> {
        self.props_reads.insert(key.to_owned());
        self.props.get(key)
    }

    /// Read the data of prop `key`, if it holds data.
    pub fn prop_data(&mut self, key: &str) -> Option<&'a Value> {
        self.prop(key).and_then(PropValue::as_data)
    }

    /// State paths recorded so far.
    pub fn state_reads(&self) -> &TrackFlatMap {
        &self.state_reads
    }

    /// Prop keys recorded so far.
    pub fn props_reads(&self) -> &TrackFlatMap {
        &self.props_reads
    }

    pub(crate) fn finish(self) -> (TrackFlatMap, TrackFlatMap) {
        (self.state_reads, self.props_reads)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;

    #[test]
    fn context_records_reads_once_in_order() {
        let state: StateGetter = Arc::new(|path: &str| (path == "a.b").then(|| json!(1)));
        let mut props = Props::new();
        props.insert("id".into(), PropValue::Data(json!(3)));

        let mut ctx = TrackingContext::new(&state, &props);
        assert_eq!(ctx.state("a.b"), Some(json!(1)));
        assert_eq!(ctx.state("c"), None);
        assert_eq!(ctx.state("a.b"), Some(json!(1)));
        assert_eq!(ctx.prop_data("id"), Some(&json!(3)));
        assert_eq!(ctx.prop("missing"), None);

        let (state_reads, props_reads) = ctx.finish();
        assert_eq!(state_reads.iter().collect::<Vec<_>>(), vec!["a.b", "c"]);
        assert_eq!(props_reads.iter().collect::<Vec<_>>(), vec!["id", "missing"]);
    }

    #[test]
    fn contexts_are_independent() {
        let state: StateGetter = Arc::new(|_: &str| -> Option<Value> { None });
        let props = Props::new();

        let mut first = TrackingContext::new(&state, &props);
        first.state("x");

        let second = TrackingContext::new(&state, &props);
        assert_eq!(first.state_reads().len(), 1);
        assert!(second.state_reads().is_empty());
        assert!(second.props_reads().is_empty());
    }
}
