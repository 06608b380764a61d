//! Status snapshot served by `GET /status`.

use serde::Serialize;

use crate::error_handling::{ErrorKind, ProcessingStats};

/// Point-in-time view of the service.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatus {
    pub model_version: String,
    pub model_loaded: bool,
    /// Modification time of the scorer artifact (RFC 3339), if known.
    pub last_updated: Option<String>,
    pub total_predictions: u64,
    pub status: &'static str,
    pub failures: FailureCounts,
}

/// Prediction failures by kind since startup.
#[derive(Debug, Clone, Serialize)]
pub struct FailureCounts {
    pub total: usize,
    pub invalid_url: usize,
    pub url_too_long: usize,
    pub model_not_loaded: usize,
    pub model_error: usize,
}

impl FailureCounts {
    pub fn from_stats(stats: &ProcessingStats) -> Self {
        Self {
            total: stats.total_failures(),
            invalid_url: stats.get_failure_count(ErrorKind::InvalidUrl),
            url_too_long: stats.get_failure_count(ErrorKind::UrlTooLong),
            model_not_loaded: stats.get_failure_count(ErrorKind::ModelNotLoaded),
            model_error: stats.get_failure_count(ErrorKind::ModelError),
        }
    }
}
