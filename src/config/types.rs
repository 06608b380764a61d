//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::fmt;
use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    DEFAULT_BATCH_CONCURRENCY, DEFAULT_CHAR_INDEX_PATH, DEFAULT_HOST, DEFAULT_MAX_BATCH_SIZE,
    DEFAULT_MODEL_PATH, DEFAULT_PORT, DEFAULT_TRUSTED_DOMAINS, MAX_BATCH_CONCURRENCY,
    MAX_BATCH_SIZE_LIMIT,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// A configuration field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidationError {
    /// Name of the offending field (as spelled in the struct)
    pub field: &'static str,
    /// What is wrong and what would be accepted
    pub message: String,
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigValidationError {}

/// Service configuration.
///
/// Parsed from the command line (and `URL_SENTINEL_*` environment variables) by
/// the binary, or built programmatically from [`Config::default`].
///
/// # Examples
///
/// ```
/// use url_sentinel::Config;
///
/// let config = Config {
///     port: 8080,
///     max_batch_size: 50,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Parser)]
#[command(name = "url_sentinel", version, about = "Phishing URL detection service")]
pub struct Config {
    /// Address to bind the HTTP server to
    #[arg(long, env = "URL_SENTINEL_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "URL_SENTINEL_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Trained scorer artifact (JSON)
    #[arg(long, env = "URL_SENTINEL_MODEL_PATH", default_value = DEFAULT_MODEL_PATH)]
    pub model_path: PathBuf,

    /// Character-index table (JSON object of single character to positive integer)
    #[arg(long, env = "URL_SENTINEL_CHAR_INDEX_PATH", default_value = DEFAULT_CHAR_INDEX_PATH)]
    pub char_index_path: PathBuf,

    /// Maximum number of URLs accepted in one batch request
    #[arg(long, env = "URL_SENTINEL_MAX_BATCH_SIZE", default_value_t = DEFAULT_MAX_BATCH_SIZE)]
    pub max_batch_size: usize,

    /// Number of batch elements scored concurrently
    #[arg(long, env = "URL_SENTINEL_BATCH_CONCURRENCY", default_value_t = DEFAULT_BATCH_CONCURRENCY)]
    pub batch_concurrency: usize,

    /// Trusted domains (comma separated); any URL containing one is reported benign without scoring
    #[arg(
        long,
        env = "URL_SENTINEL_TRUSTED_DOMAINS",
        value_delimiter = ',',
        default_values_t = DEFAULT_TRUSTED_DOMAINS.iter().map(|d| d.to_string()).collect::<Vec<_>>()
    )]
    pub trusted_domains: Vec<String>,

    /// Extra trusted domains, one per line (blank lines and `#` comments ignored)
    #[arg(long, env = "URL_SENTINEL_TRUST_LIST_FILE")]
    pub trust_list_file: Option<PathBuf>,

    /// Do not load the model at startup; wait for `GET /init`
    #[arg(long, env = "URL_SENTINEL_LAZY_INIT")]
    pub lazy_init: bool,

    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            char_index_path: PathBuf::from(DEFAULT_CHAR_INDEX_PATH),
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            batch_concurrency: DEFAULT_BATCH_CONCURRENCY,
            trusted_domains: DEFAULT_TRUSTED_DOMAINS
                .iter()
                .map(|d| d.to_string())
                .collect(),
            trust_list_file: None,
            lazy_init: false,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}

impl Config {
    /// Checks field ranges that clap cannot express.
    ///
    /// Returns the first offending field.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.host.trim().is_empty() {
            return Err(ConfigValidationError {
                field: "host",
                message: "host must not be empty".to_string(),
            });
        }
        if self.port == 0 {
            return Err(ConfigValidationError {
                field: "port",
                message: "port must be greater than 0".to_string(),
            });
        }
        if self.max_batch_size == 0 || self.max_batch_size > MAX_BATCH_SIZE_LIMIT {
            return Err(ConfigValidationError {
                field: "max_batch_size",
                message: format!(
                    "max_batch_size must be greater than 0 and at most {} (got {})",
                    MAX_BATCH_SIZE_LIMIT, self.max_batch_size
                ),
            });
        }
        if self.batch_concurrency == 0 || self.batch_concurrency > MAX_BATCH_CONCURRENCY {
            return Err(ConfigValidationError {
                field: "batch_concurrency",
                message: format!(
                    "batch_concurrency must be greater than 0 and at most {} (got {})",
                    MAX_BATCH_CONCURRENCY, self.batch_concurrency
                ),
            });
        }
        if self.trust_list_file.is_none()
            && self.trusted_domains.iter().all(|d| d.trim().is_empty())
            && !self.trusted_domains.is_empty()
        {
            return Err(ConfigValidationError {
                field: "trusted_domains",
                message: "trusted_domains contains only empty entries".to_string(),
            });
        }
        Ok(())
    }

    /// Socket address string the server binds to. IPv6 literals are bracketed.
    pub fn bind_address(&self) -> String {
        match self.host.parse::<IpAddr>() {
            Ok(IpAddr::V6(ip)) => format!("[{}]:{}", ip, self.port),
            _ => format!("{}:{}", self.host, self.port),
        }
    }
}
