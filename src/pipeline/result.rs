//! Per-URL and per-batch prediction results.

use chrono::Local;
use serde::Serialize;

use crate::config::{PHISHING_THRESHOLD, TRUSTED_CONFIDENCE};
use crate::error_handling::ErrorKind;

/// A URL that was classified.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub url: String,
    pub is_phishing: bool,
    /// Probability of the predicted class, in `[0, 1]`.
    pub confidence: f64,
    /// Local time the prediction was made (RFC 3339).
    pub prediction_time: String,
}

impl Prediction {
    /// Builds a prediction from a phishing probability.
    ///
    /// `p > 0.5` is phishing with confidence `p`; otherwise benign with
    /// confidence `1 - p`.
    pub fn from_probability(url: impl Into<String>, probability: f64) -> Self {
        let is_phishing = probability > PHISHING_THRESHOLD;
        Self {
            url: url.into(),
            is_phishing,
            confidence: if is_phishing {
                probability
            } else {
                1.0 - probability
            },
            prediction_time: now(),
        }
    }

    /// Benign verdict for a trust-list hit.
    pub fn trusted(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            is_phishing: false,
            confidence: TRUSTED_CONFIDENCE,
            prediction_time: now(),
        }
    }
}

/// A URL that could not be classified.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionFailure {
    pub url: String,
    pub error: ErrorKind,
    pub message: String,
}

/// Outcome for one URL.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PredictionResult {
    Success(Prediction),
    Failure(PredictionFailure),
}

impl PredictionResult {
    pub fn failure(url: impl Into<String>, error: ErrorKind, message: impl Into<String>) -> Self {
        PredictionResult::Failure(PredictionFailure {
            url: url.into(),
            error,
            message: message.into(),
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PredictionResult::Success(_))
    }

    pub fn url(&self) -> &str {
        match self {
            PredictionResult::Success(p) => &p.url,
            PredictionResult::Failure(f) => &f.url,
        }
    }

    /// The error kind, for failures.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            PredictionResult::Success(_) => None,
            PredictionResult::Failure(f) => Some(f.error),
        }
    }
}

/// Aggregate outcome of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    /// Every item failed (vacuously true for an empty batch).
    AllFailed,
    /// At least one item succeeded.
    PartialOrFullSuccess,
}

/// One result per input URL, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchResult {
    results: Vec<PredictionResult>,
}

impl BatchResult {
    pub fn new(results: Vec<PredictionResult>) -> Self {
        Self { results }
    }

    pub fn outcome(&self) -> BatchOutcome {
        if self.results.iter().all(|r| !r.is_success()) {
            BatchOutcome::AllFailed
        } else {
            BatchOutcome::PartialOrFullSuccess
        }
    }

    pub fn results(&self) -> &[PredictionResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn success_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.results.len() - self.success_count()
    }

    /// Splits into successes and failures, each in input order.
    pub fn partition(self) -> (Vec<Prediction>, Vec<PredictionFailure>) {
        let mut successes = Vec::new();
        let mut failures = Vec::new();
        for result in self.results {
            match result {
                PredictionResult::Success(p) => successes.push(p),
                PredictionResult::Failure(f) => failures.push(f),
            }
        }
        (successes, failures)
    }
}

fn now() -> String {
    Local::now().to_rfc3339()
}
