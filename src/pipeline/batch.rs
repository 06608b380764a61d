//! Batch prediction.

use std::sync::Arc;

use futures::future::join_all;
use log::{info, warn};

use crate::config::{DEFAULT_BATCH_CONCURRENCY, DEFAULT_MAX_BATCH_SIZE};
use crate::error_handling::{BatchError, ErrorKind};
use crate::initialization::init_semaphore;

use super::predict::PredictionPipeline;
use super::result::{BatchOutcome, BatchResult, PredictionResult};

/// Applies a [`PredictionPipeline`] to a bounded list of URLs.
///
/// Oversized batches are rejected before any URL is looked at. Otherwise every
/// URL is attempted independently (no early abort) and the result holds one
/// entry per input, in input order, duplicates included.
#[derive(Clone)]
pub struct BatchOrchestrator {
    pipeline: PredictionPipeline,
    max_batch_size: usize,
    concurrency: usize,
}

impl BatchOrchestrator {
    pub fn new(pipeline: PredictionPipeline) -> Self {
        Self {
            pipeline,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            concurrency: DEFAULT_BATCH_CONCURRENCY,
        }
    }

    pub fn with_max_batch_size(mut self, max_batch_size: usize) -> Self {
        self.max_batch_size = max_batch_size;
        self
    }

    /// Number of URLs scored at once by [`BatchOrchestrator::predict_batch_concurrent`].
    /// Values below 1 are treated as 1.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }

    pub fn pipeline(&self) -> &PredictionPipeline {
        &self.pipeline
    }

    /// Checks the size cap without processing anything.
    pub fn check_size(&self, size: usize) -> Result<(), BatchError> {
        if size > self.max_batch_size {
            warn!(
                "Rejecting batch of {} URLs (limit {})",
                size, self.max_batch_size
            );
            return Err(BatchError::TooLarge {
                size,
                max: self.max_batch_size,
            });
        }
        Ok(())
    }

    /// Predicts every URL on the calling thread, in order.
    pub fn predict_batch<S: AsRef<str>>(&self, urls: &[S]) -> Result<BatchResult, BatchError> {
        self.check_size(urls.len())?;
        let results = urls
            .iter()
            .map(|url| self.pipeline.predict_one(url.as_ref()))
            .collect();
        Ok(self.finish(results))
    }

    /// Predicts URLs on the blocking pool, at most `concurrency` at a time.
    ///
    /// Completion order is unconstrained; the result is reassembled in input
    /// order.
    pub async fn predict_batch_concurrent(
        &self,
        urls: Vec<String>,
    ) -> Result<BatchResult, BatchError> {
        self.check_size(urls.len())?;
        let semaphore = init_semaphore(self.concurrency);

        let tasks = urls.into_iter().map(|url| {
            let pipeline = self.pipeline.clone();
            let semaphore = Arc::clone(&semaphore);
            async move {
                let _permit = semaphore.acquire_owned().await.ok();
                let task_url = url.clone();
                match tokio::task::spawn_blocking(move || pipeline.predict_one(&task_url)).await {
                    Ok(result) => result,
                    Err(e) => {
                        warn!("Prediction task for {} did not complete: {}", url, e);
                        PredictionResult::failure(
                            url,
                            ErrorKind::ServerError,
                            "Prediction task did not complete",
                        )
                    }
                }
            }
        });

        let results = join_all(tasks).await;
        Ok(self.finish(results))
    }

    fn finish(&self, results: Vec<PredictionResult>) -> BatchResult {
        let batch = BatchResult::new(results);
        let outcome = batch.outcome();
        info!(
            "Batch of {} URLs: {} succeeded, {} failed{}",
            batch.len(),
            batch.success_count(),
            batch.failure_count(),
            if outcome == BatchOutcome::AllFailed {
                " (all failed)"
            } else {
                ""
            }
        );
        batch
    }
}
