//! Configuration constants.
//!
//! This module defines the fixed parameters of the prediction pipeline and the
//! defaults used by [`Config`](super::Config).

/// Maximum URL length in characters.
///
/// URLs longer than this are rejected with `URL_TOO_LONG`. The same value is the
/// fixed length of every encoded sequence handed to the scorer, so changing it
/// requires a scorer trained for the new length.
pub const MAX_URL_LENGTH: usize = 200;

/// Largest request body the gateway buffers, in bytes.
///
/// Far above any well-formed request, so an oversized URL still reaches the
/// validator and reports `URL_TOO_LONG`. Bodies past this are `INVALID_REQUEST`.
pub const MAX_REQUEST_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Default upper bound on the number of URLs in one batch request.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 100;

/// Hard ceiling for `--max-batch-size`.
pub const MAX_BATCH_SIZE_LIMIT: usize = 10_000;

/// Default number of batch elements scored concurrently.
pub const DEFAULT_BATCH_CONCURRENCY: usize = 8;

/// Hard ceiling for `--batch-concurrency`.
pub const MAX_BATCH_CONCURRENCY: usize = 1024;

/// Confidence reported for URLs that hit the trust list.
///
/// Trust-listed URLs are never scored; they are reported as benign with this
/// fixed (low) confidence.
pub const TRUSTED_CONFIDENCE: f64 = 0.05;

/// Probability above which a URL is classified as phishing.
pub const PHISHING_THRESHOLD: f64 = 0.5;

/// Maximum error message length in characters.
/// Scorer and loader errors longer than this are truncated before they reach a response body.
pub const MAX_ERROR_MESSAGE_LENGTH: usize = 500;

/// Service name reported by `GET /`.
pub const SERVICE_NAME: &str = "URL phishing detection service";

/// Service version reported by `GET /`.
pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Model version reported when the artifact does not carry one.
pub const DEFAULT_MODEL_VERSION: &str = "1.0.0";

/// Default bind address.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default listening port.
pub const DEFAULT_PORT: u16 = 5000;

/// Default path of the trained scorer artifact.
pub const DEFAULT_MODEL_PATH: &str = "models/phishing_detector_model.json";

/// Default path of the character-index table.
pub const DEFAULT_CHAR_INDEX_PATH: &str = "data/processed/char_to_idx.json";

/// Versioned prefix under which the API routes are also mounted.
pub const API_PREFIX: &str = "/api/v1";

/// Domains exempted from scoring.
///
/// Matching is by substring anywhere in the URL, so `gov.cn` also matches
/// `notgov.cn.example.com`.
pub const DEFAULT_TRUSTED_DOMAINS: &[&str] = &[
    "bistu.edu.cn",
    "tsinghua.edu.cn",
    "pku.edu.cn",
    "moe.gov.cn",
    "gov.cn",
    "edu.cn",
];
