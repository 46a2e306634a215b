//! Computed Trackers
//!
//! A [`Compute`] wraps a derivation over state and props. A
//! [`DependencyTracker`] runs that derivation and records exactly which
//! state paths and prop keys it read, so it can later answer whether a given
//! set of changes affects it.
//!
//! # Tracking
//!
//! Reads are recorded through an explicit [`TrackingContext`] handed to the
//! derivation. Each run gets a fresh context; the recorded sets replace the
//! previous ones wholesale when the run completes.
//!
//! # Matching
//!
//! A changed state path hits a tracker when it overlaps any recorded path
//! by segment prefix in either direction: a change to `a.b.x` hits a
//! tracker that read `a.b`, and a change to `a` hits one that read `a.b`.
//! Prop keys match exactly.

mod compute;
mod context;
mod dependency_tracker;

pub use compute::Compute;
pub use context::{TrackFlatMap, TrackingContext};
pub use dependency_tracker::{DependencyTracker, TrackerRun};
