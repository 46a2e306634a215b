//! View identity.
//!
//! The subscription store keys its bookkeeping by [`ViewId`], so every bound
//! view instance gets a unique one when it is created.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Unique identifier for a view instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ViewId(u64);

impl ViewId {
    /// Generate a new unique view ID.
    ///
    /// Uses an atomic counter to ensure uniqueness across threads.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for ViewId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_ids_are_unique() {
        let id1 = ViewId::new();
        let id2 = ViewId::new();
        let id3 = ViewId::new();

        assert_ne!(id1, id2);
        assert_ne!(id2, id3);
        assert_ne!(id1, id3);
    }

    #[test]
    fn view_id_serializes_as_number() {
        let id = ViewId::new();
        assert_eq!(serde_json::to_string(&id).unwrap(), id.raw().to_string());
    }
}
