//! Computed dependency descriptors.

use std::fmt::{self, Debug};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde_json::Value;

use super::context::TrackingContext;

/// Counter for generating unique compute IDs.
static COMPUTE_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

fn next_compute_id() -> u64 {
    COMPUTE_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// A derivation over state and props.
///
/// # Example
///
/// ```rust,ignore
/// let count = Compute::new(|ctx| ctx.state("items.length").unwrap_or_default());
/// ```
#[derive(Clone)]
pub struct Compute {
    id: u64,
    derive: Arc<dyn Fn(&mut TrackingContext<'_>) -> Value + Send + Sync>,
}

impl Compute {
    pub fn new<F>(derive: F) -> Self
    where
        F: Fn(&mut TrackingContext<'_>) -> Value + Send + Sync + 'static,
    {
        Self {
            id: next_compute_id(),
            derive: Arc::new(derive),
        }
    }

    /// Get the compute's unique ID. Clones share it.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub(crate) fn evaluate(&self, ctx: &mut TrackingContext<'_>) -> Value {
        (self.derive)(ctx)
    }
}

impl Debug for Compute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Compute").field("id", &self.id).finish()
    }
}
