//! Failure statistics tracking.
//!
//! Thread-safe counters of prediction failures, one per [`ErrorKind`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use super::types::ErrorKind;

/// Thread-safe failure statistics.
///
/// Every error kind is initialized to zero on creation, so increments never
/// allocate and can be shared across tasks behind an `Arc`.
pub struct ProcessingStats {
    failures: HashMap<ErrorKind, AtomicUsize>,
}

impl ProcessingStats {
    pub fn new() -> Self {
        let mut failures = HashMap::new();
        for kind in ErrorKind::iter() {
            failures.insert(kind, AtomicUsize::new(0));
        }
        ProcessingStats { failures }
    }

    /// Increment the counter for a failure kind.
    pub fn increment_failure(&self, kind: ErrorKind) {
        if let Some(counter) = self.failures.get(&kind) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to increment failure counter for {:?} which is not in the map. \
                 This indicates a bug in ProcessingStats initialization.",
                kind
            );
        }
    }

    /// Get the count for a failure kind.
    pub fn get_failure_count(&self, kind: ErrorKind) -> usize {
        self.failures
            .get(&kind)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Total number of failures across all kinds.
    pub fn total_failures(&self) -> usize {
        self.failures
            .values()
            .map(|c| c.load(Ordering::SeqCst))
            .sum()
    }
}

impl Default for ProcessingStats {
    fn default() -> Self {
        Self::new()
    }
}
