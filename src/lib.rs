//! url_sentinel library: phishing URL classification behind an HTTP gateway.
//!
//! Each submitted URL is validated, checked against a trust list of known-good
//! domains, encoded into a fixed-length character sequence and scored by a
//! pluggable [`model::Scorer`]. Batches preserve input order and isolate
//! per-URL failures. [`service::ServiceState`] owns the model lifecycle and the
//! prediction counter shared by all request handlers.
//!
//! # Example
//!
//! ```no_run
//! use url_sentinel::{run_server, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     port: 8080,
//!     max_batch_size: 50,
//!     ..Default::default()
//! };
//!
//! run_server(config).await?;
//! # Ok(())
//! # }
//! ```
//!
//! The pipeline can also be used without the HTTP layer:
//!
//! ```no_run
//! use std::sync::Arc;
//! use url_sentinel::initialization::FileModelLoader;
//! use url_sentinel::pipeline::{PredictionPipeline, TrustList};
//! use url_sentinel::service::ServiceState;
//!
//! let loader = FileModelLoader::new("models/model.json", "data/char_to_idx.json");
//! let service = Arc::new(ServiceState::new(Arc::new(loader)));
//! service.init().expect("model artifacts should load");
//!
//! let pipeline = PredictionPipeline::new(TrustList::default(), service);
//! let result = pipeline.predict_one("https://oa.bistu.edu.cn/login");
//! assert!(result.is_success());
//! ```
//!
//! # Requirements
//!
//! [`run_server`] and batch prediction require a Tokio runtime.

pub mod config;
pub mod error_handling;
pub mod initialization;
pub mod model;
pub mod pipeline;
pub mod server;
pub mod service;
mod utils;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel};
pub use run::run_server;

mod run {
    use std::sync::Arc;

    use anyhow::{Context, Result};
    use log::{info, warn};

    use crate::config::Config;
    use crate::initialization::{init_model_loader, init_trust_list};
    use crate::pipeline::{BatchOrchestrator, PredictionPipeline};
    use crate::server::{start_server, AppState};
    use crate::service::ServiceState;

    /// Builds the service from `config` and serves HTTP until shutdown.
    ///
    /// Unless `lazy_init` is set, the model is loaded before the listener
    /// starts. A load failure is logged and the server starts anyway; `/init`
    /// retries the load.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the trust list file
    /// cannot be read, or the address cannot be bound.
    pub async fn run_server(config: Config) -> Result<()> {
        config.validate().context("Invalid configuration")?;

        info!(
            "Starting url_sentinel {} (max batch size {}, batch concurrency {})",
            crate::config::SERVICE_VERSION,
            config.max_batch_size,
            config.batch_concurrency
        );

        let trust_list = init_trust_list(&config).context("Failed to load trust list")?;
        let loader = init_model_loader(&config);
        let artifacts_present = loader.artifacts_present();
        let service = Arc::new(ServiceState::new(Arc::new(loader)));

        if config.lazy_init {
            info!("Lazy init enabled; the model loads on the first /init call");
        } else if !artifacts_present {
            warn!(
                "Model artifacts not found ({} / {}); the server will start and /init must be called once they exist",
                config.model_path.display(),
                config.char_index_path.display()
            );
        } else {
            let loading = Arc::clone(&service);
            match tokio::task::spawn_blocking(move || loading.init())
                .await
                .context("Model load task did not complete")?
            {
                Ok(_) => info!("Model loaded, starting server"),
                Err(e) => warn!(
                    "Model load failed: {}; the server will start and /init can retry",
                    e
                ),
            }
        }

        let pipeline = PredictionPipeline::new(trust_list, service);
        let batch = BatchOrchestrator::new(pipeline)
            .with_max_batch_size(config.max_batch_size)
            .with_concurrency(config.batch_concurrency);

        start_server(&config.bind_address(), AppState::new(batch)).await
    }
}
