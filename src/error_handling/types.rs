//! Error type definitions.
//!
//! This module defines the error taxonomy reported to callers and the typed
//! errors returned by initialization, model loading and scoring.

use std::path::PathBuf;

use log::SetLoggerError;
use serde::{Serialize, Serializer};
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error reading the trust-list file.
    #[error("Trust list file {} could not be read: {source}", .path.display())]
    TrustListError {
        /// File that failed to read
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },
}

/// Error types for the character-index table.
#[derive(Error, Debug)]
pub enum CharIndexError {
    /// The table is not a JSON object of strings to integers.
    #[error("Character index is not a valid JSON object: {0}")]
    Json(#[from] serde_json::Error),

    /// A key is not exactly one character.
    #[error("Character index key {key:?} must be exactly one character")]
    InvalidKey {
        /// Offending key
        key: String,
    },

    /// A code is 0, which is reserved for unknown characters and padding.
    #[error("Character index code for {key:?} must be positive (0 is reserved)")]
    ReservedCode {
        /// Key mapped to 0
        key: char,
    },
}

/// Error types for scorer invocations.
///
/// Any of these becomes a `MODEL_ERROR` result for the URL being scored.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScorerError {
    /// A sequence element has no weight in the model.
    #[error("Character code {code} is outside the model vocabulary ({vocabulary} entries)")]
    CodeOutOfRange {
        /// Offending code
        code: u32,
        /// Size of the model vocabulary
        vocabulary: usize,
    },

    /// The scorer failed for any other reason.
    #[error("Inference failed: {0}")]
    Inference(String),
}

/// Error types for loading the model artifacts.
#[derive(Error, Debug)]
pub enum ModelLoadError {
    /// An artifact file could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        /// File that failed to read
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// The character-index table is malformed.
    #[error("Invalid character index: {0}")]
    CharIndex(#[from] CharIndexError),

    /// The scorer artifact is malformed.
    #[error("Invalid model artifact: {0}")]
    Artifact(String),
}

/// Error returned when a batch is rejected as a whole.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BatchError {
    /// The batch holds more URLs than allowed.
    #[error("Batch contains {size} URLs, exceeding the limit of {max}")]
    TooLarge {
        /// Number of URLs submitted
        size: usize,
        /// Configured maximum
        max: usize,
    },
}

impl BatchError {
    /// The taxonomy entry for this rejection.
    pub fn kind(&self) -> ErrorKind {
        match self {
            BatchError::TooLarge { .. } => ErrorKind::BatchTooLarge,
        }
    }
}

/// Error kinds reported to callers.
///
/// Every failure that leaves the service carries exactly one of these. None of
/// them is fatal to the serving process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorKind {
    /// Malformed request body
    InvalidRequest,
    /// URL fails the URL grammar
    InvalidUrl,
    /// URL exceeds the maximum length
    UrlTooLong,
    /// Batch exceeds the size cap
    BatchTooLarge,
    /// Scorer or character index not loaded yet
    ModelNotLoaded,
    /// Scorer invocation fault
    ModelError,
    /// Every item of a batch failed
    BatchFailed,
    /// Loading the model artifacts failed
    ModelLoadError,
    /// No such route
    NotFound,
    /// Route exists but not for this method
    MethodNotAllowed,
    /// Uncaught internal fault
    ServerError,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ErrorKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl ErrorKind {
    /// Wire code, as it appears in `error.code` of a response.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidRequest => "INVALID_REQUEST",
            ErrorKind::InvalidUrl => "INVALID_URL",
            ErrorKind::UrlTooLong => "URL_TOO_LONG",
            ErrorKind::BatchTooLarge => "BATCH_TOO_LARGE",
            ErrorKind::ModelNotLoaded => "MODEL_NOT_LOADED",
            ErrorKind::ModelError => "MODEL_ERROR",
            ErrorKind::BatchFailed => "BATCH_FAILED",
            ErrorKind::ModelLoadError => "MODEL_LOAD_ERROR",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            ErrorKind::ServerError => "SERVER_ERROR",
        }
    }

    /// HTTP status code used when this kind is the outcome of a request.
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorKind::InvalidRequest
            | ErrorKind::InvalidUrl
            | ErrorKind::UrlTooLong
            | ErrorKind::BatchTooLarge => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::MethodNotAllowed => 405,
            ErrorKind::ModelNotLoaded
            | ErrorKind::ModelError
            | ErrorKind::BatchFailed
            | ErrorKind::ModelLoadError
            | ErrorKind::ServerError => 500,
        }
    }
}
