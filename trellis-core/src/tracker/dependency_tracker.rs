//! Dependency Tracker
//!
//! A tracker caches the last value of a [`Compute`] together with the state
//! paths and prop keys that value was derived from.
//!
//! # How Trackers Work
//!
//! 1. The owner runs the tracker once when it is created, which seeds the
//!    value and both read sets.
//!
//! 2. When state or props change, the owner asks [`DependencyTracker::matches`]
//!    whether any of the changes touch what the tracker read.
//!
//! 3. On a hit the owner runs the tracker again. The read sets are rebuilt
//!    from scratch, so reads that no longer happen drop out.
//!
//! Running with identical getter output yields identical value and read sets.

use std::fmt::{self, Debug};

use serde_json::Value;

use super::compute::Compute;
use super::context::{TrackFlatMap, TrackingContext};
use crate::path::paths_overlap;
use crate::props::Props;
use crate::tag::StateGetter;

/// The outcome of a single tracker run.
#[derive(Debug, Clone, Copy)]
pub struct TrackerRun<'a> {
    pub value: &'a Value,
    pub state_track: &'a TrackFlatMap,
    pub props_track: &'a TrackFlatMap,
}

/// A computed value plus the reads it depends on.
pub struct DependencyTracker {
    compute: Compute,

    /// Value from the last run, null before the first one.
    value: Value,

    /// State paths read during the last run.
    state_track: TrackFlatMap,

    /// Prop keys read during the last run.
    props_track: TrackFlatMap,

    run_count: usize,
}

impl DependencyTracker {
    /// Create a tracker. The derivation does not run until [`run`](Self::run).
    pub fn new(compute: Compute) -> Self {
        Self {
            compute,
            value: Value::Null,
            state_track: TrackFlatMap::new(),
            props_track: TrackFlatMap::new(),
            run_count: 0,
        }
    }

    /// Run the derivation once, replacing the value and both read sets.
    pub fn run(&mut self, state: &StateGetter, props: &Props) -> TrackerRun<'_> {
        let mut ctx = TrackingContext::new(state, props);
        let value = self.compute.evaluate(&mut ctx);
        let (state_track, props_track) = ctx.finish();

        self.value = value;
        self.state_track = state_track;
        self.props_track = props_track;
        self.run_count += 1;

        TrackerRun {
            value: &self.value,
            state_track: &self.state_track,
            props_track: &self.props_track,
        }
    }

    /// Whether any of the changes touch what the last run read.
    pub fn matches<S, P>(&self, changed_state: &[S], changed_props: &[P]) -> bool
    where
        S: AsRef<str>,
        P: AsRef<str>,
    {
        let state_hit = changed_state.iter().any(|changed| {
            self.state_track
                .iter()
                .any(|read| paths_overlap(changed.as_ref(), read))
        });

        state_hit
            || changed_props
                .iter()
                .any(|key| self.props_track.contains(key.as_ref()))
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn state_track(&self) -> &TrackFlatMap {
        &self.state_track
    }

    pub fn props_track(&self) -> &TrackFlatMap {
        &self.props_track
    }

    /// Number of times the derivation has run.
    pub fn run_count(&self) -> usize {
        self.run_count
    }

    pub fn compute(&self) -> &Compute {
        &self.compute
    }
}

impl Debug for DependencyTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependencyTracker")
            .field("compute", &self.compute.id())
            .field("value", &self.value)
            .field("state_track", &self.state_track)
            .field("props_track", &self.props_track)
            .field("run_count", &self.run_count)
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::props::PropValue;
    use serde_json::json;
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Arc;

    const NONE: &[&str] = &[];

    fn state_of(tree: Value) -> StateGetter {
        Arc::new(move |path: &str| crate::path::read_path(&tree, path))
    }

    #[test]
    fn tracker_does_not_run_until_asked() {
        let call_count = Arc::new(AtomicI32::new(0));
        let call_count_clone = call_count.clone();

        let tracker = DependencyTracker::new(Compute::new(move |_| {
            call_count_clone.fetch_add(1, Ordering::SeqCst);
            json!(42)
        }));

        assert_eq!(call_count.load(Ordering::SeqCst), 0);
        assert_eq!(tracker.run_count(), 0);
        assert_eq!(tracker.value(), &Value::Null);
    }

    #[test]
    fn run_records_value_and_reads() {
        let state = state_of(json!({ "a": { "b": 2 }, "c": 3 }));
        let mut props = Props::new();
        props.insert("factor".into(), PropValue::Data(json!(10)));

        let mut tracker = DependencyTracker::new(Compute::new(|ctx| {
            let b = ctx.state("a.b").and_then(|v| v.as_i64()).unwrap_or(0);
            let factor = ctx.prop_data("factor").and_then(Value::as_i64).unwrap_or(1);
            json!(b * factor)
        }));

        let run = tracker.run(&state, &props);
        assert_eq!(run.value, &json!(20));
        assert!(run.state_track.contains("a.b"));
        assert!(run.props_track.contains("factor"));
        assert_eq!(tracker.run_count(), 1);
    }

    #[test]
    fn descendant_change_hits_ancestor_read() {
        let state = state_of(json!({ "a": { "b": { "x": 1 } }, "c": 0 }));
        let props = Props::new();

        let mut a = DependencyTracker::new(Compute::new(|ctx| ctx.state("a.b").unwrap_or_default()));
        let mut b = DependencyTracker::new(Compute::new(|ctx| ctx.state("c").unwrap_or_default()));
        a.run(&state, &props);
        b.run(&state, &props);

        assert!(a.matches(&["a.b.x"], NONE));
        assert!(!b.matches(&["a.b.x"], NONE));

        // Ancestor changes hit descendant reads too.
        assert!(a.matches(&["a"], NONE));
        assert!(!a.matches(&["a.c"], NONE));
    }

    #[test]
    fn prop_changes_match_exact_keys() {
        let state = state_of(json!({}));
        let mut props = Props::new();
        props.insert("id".into(), PropValue::Data(json!(1)));

        let mut tracker = DependencyTracker::new(Compute::new(|ctx| {
            ctx.prop_data("id").cloned().unwrap_or_default()
        }));
        tracker.run(&state, &props);

        assert!(tracker.matches(NONE, &["id"]));
        assert!(!tracker.matches(NONE, &["ids"]));
        assert!(!tracker.matches(&["id"], NONE));
    }

    #[test]
    fn rerun_replaces_read_sets() {
        let state = state_of(json!({ "flag": true, "x": 1, "y": 2, "z": 3 }));
        let flag = Arc::new(AtomicI32::new(0));
        let flag_clone = flag.clone();
        let props = Props::new();

        let mut tracker = DependencyTracker::new(Compute::new(move |ctx| {
            let value = if flag_clone.load(Ordering::SeqCst) == 0 {
                ctx.state("x");
                ctx.state("y")
            } else {
                ctx.state("y");
                ctx.state("z")
            };
            value.unwrap_or_default()
        }));

        tracker.run(&state, &props);
        assert_eq!(tracker.state_track().iter().collect::<Vec<_>>(), vec!["x", "y"]);

        flag.store(1, Ordering::SeqCst);
        tracker.run(&state, &props);
        assert_eq!(tracker.state_track().iter().collect::<Vec<_>>(), vec!["y", "z"]);
        assert!(!tracker.matches(&["x"], NONE));
        assert_eq!(tracker.run_count(), 2);
    }

    #[test]
    fn rerun_is_idempotent() {
        let state = state_of(json!({ "items": [1, 2] }));
        let props = Props::new();

        let mut tracker = DependencyTracker::new(Compute::new(|ctx| {
            ctx.state("items.length").unwrap_or_default()
        }));

        let first = {
            let run = tracker.run(&state, &props);
            (run.value.clone(), run.state_track.clone(), run.props_track.clone())
        };
        let run = tracker.run(&state, &props);

        assert_eq!(&first.0, run.value);
        assert_eq!(&first.1, run.state_track);
        assert_eq!(&first.2, run.props_track);
    }
}
