//! Error handling and failure statistics.
//!
//! This module provides:
//! - The error taxonomy reported to callers ([`ErrorKind`])
//! - Typed errors for initialization, model loading, scoring and batches
//! - Per-kind failure counters ([`ProcessingStats`])
//!
//! Validation and trust-list decisions never escalate; only scorer faults and
//! load faults cross the collaborator boundary into this taxonomy.

mod stats;
mod types;

// Re-export public API
pub use stats::ProcessingStats;
pub use types::{
    BatchError, CharIndexError, ErrorKind, InitializationError, ModelLoadError, ScorerError,
};
