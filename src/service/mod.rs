//! Shared service state.
//!
//! The only mutable state shared between requests: the model lifecycle and the
//! prediction counters. Everything else in a request is call-local.

mod state;
mod status;

pub use state::{InitOutcome, LifecycleState, ServiceState};
pub use status::{FailureCounts, ServiceStatus};
