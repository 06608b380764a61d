//! Application configuration and constants.
//!
//! This module provides:
//! - Pipeline constants (maximum URL length, batch limits, trust-list defaults)
//! - The clap-derived [`Config`] and its validation

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{Config, ConfigValidationError, LogFormat, LogLevel};
