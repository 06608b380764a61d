//! Application initialization and resource setup.
//!
//! This module provides functions to initialize shared resources:
//! - Logger
//! - Trust list (CLI entries plus optional file)
//! - File-backed model loader
//! - Concurrency semaphore for batch scoring

mod logger;
mod model;

use std::sync::Arc;

use log::info;
use tokio::sync::Semaphore;

use crate::config::Config;
use crate::error_handling::InitializationError;
use crate::pipeline::TrustList;

// Re-export public API
pub use logger::init_logger_with;
pub use model::FileModelLoader;

/// Initializes a semaphore for controlling concurrency.
///
/// Creates a new semaphore with the specified permit count, shared by the
/// tasks of one batch.
pub fn init_semaphore(count: usize) -> Arc<Semaphore> {
    Arc::new(Semaphore::new(count))
}

/// Builds the trust list from `--trusted-domains` and `--trust-list-file`.
///
/// File entries are appended after the CLI entries; duplicates and blank
/// entries are dropped.
pub fn init_trust_list(config: &Config) -> Result<TrustList, InitializationError> {
    let mut trust_list = TrustList::new(&config.trusted_domains);
    if let Some(path) = &config.trust_list_file {
        let added = trust_list.extend_from_file(path)?;
        info!(
            "Loaded {} additional trusted domains from {}",
            added,
            path.display()
        );
    }
    info!("Trust list has {} entries", trust_list.len());
    Ok(trust_list)
}

/// Builds the file-backed loader for the configured artifact paths.
pub fn init_model_loader(config: &Config) -> FileModelLoader {
    FileModelLoader::new(&config.model_path, &config.char_index_path)
}
