//! Process-wide service state: model lifecycle and prediction counters.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use log::{debug, error, info};

use crate::error_handling::{ErrorKind, ModelLoadError, ProcessingStats};
use crate::model::{LoadedModel, ModelLoader};

use super::status::{FailureCounts, ServiceStatus};

/// Observable lifecycle state.
///
/// `Uninitialized -> Loading -> Ready`, or `Loading -> Failed` on a load
/// error. `Failed` is not terminal: a later `init` retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    Loading,
    Ready,
    Failed,
}

impl LifecycleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::Uninitialized => "uninitialized",
            LifecycleState::Loading => "loading",
            LifecycleState::Ready => "ready",
            LifecycleState::Failed => "failed",
        }
    }
}

/// Result of a successful `init`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// The model was loaded by this call.
    Loaded,
    /// The model was already loaded; nothing was done.
    AlreadyLoaded,
}

enum ModelSlot {
    Uninitialized,
    Loading,
    Ready(Arc<LoadedModel>),
    Failed(String),
}

/// Shared service object handed to every request handler.
///
/// Holds the bound model behind a readers-writer lock (many concurrent
/// predictions, one exclusive swap on load) and the atomic prediction counter.
pub struct ServiceState {
    slot: RwLock<ModelSlot>,
    // Serializes init calls so two loads never race.
    load_lock: Mutex<()>,
    loader: Arc<dyn ModelLoader>,
    predictions: AtomicU64,
    stats: ProcessingStats,
}

impl ServiceState {
    /// Creates an uninitialized service; nothing is loaded until [`ServiceState::init`].
    pub fn new(loader: Arc<dyn ModelLoader>) -> Self {
        Self {
            slot: RwLock::new(ModelSlot::Uninitialized),
            load_lock: Mutex::new(()),
            loader,
            predictions: AtomicU64::new(0),
            stats: ProcessingStats::new(),
        }
    }

    /// Loads the model unless it is already loaded.
    ///
    /// Idempotent once `Ready`. Blocks while another `init` is in progress and
    /// then observes its outcome. A failure leaves the state `Failed`, from
    /// which a later call retries.
    pub fn init(&self) -> Result<InitOutcome, ModelLoadError> {
        let _guard = self.load_lock.lock().unwrap_or_else(PoisonError::into_inner);

        if self.is_ready() {
            debug!("Model already loaded, init is a no-op");
            return Ok(InitOutcome::AlreadyLoaded);
        }

        self.set_slot(ModelSlot::Loading);
        info!("Loading model artifacts");

        match self.loader.load() {
            Ok(model) => {
                info!(
                    "Model loaded: version {}, {} characters indexed",
                    model.version(),
                    model.char_index().len()
                );
                self.set_slot(ModelSlot::Ready(Arc::new(model)));
                Ok(InitOutcome::Loaded)
            }
            Err(e) => {
                error!("Model load failed: {}", e);
                self.set_slot(ModelSlot::Failed(e.to_string()));
                Err(e)
            }
        }
    }

    pub fn lifecycle(&self) -> LifecycleState {
        match &*self.read_slot() {
            ModelSlot::Uninitialized => LifecycleState::Uninitialized,
            ModelSlot::Loading => LifecycleState::Loading,
            ModelSlot::Ready(_) => LifecycleState::Ready,
            ModelSlot::Failed(_) => LifecycleState::Failed,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(&*self.read_slot(), ModelSlot::Ready(_))
    }

    /// The bound model, if `Ready`.
    ///
    /// The returned handle stays valid even if a reload swaps the slot.
    pub fn model(&self) -> Option<Arc<LoadedModel>> {
        match &*self.read_slot() {
            ModelSlot::Ready(model) => Some(Arc::clone(model)),
            _ => None,
        }
    }

    /// Message of the most recent load failure, while `Failed`.
    pub fn last_load_error(&self) -> Option<String> {
        match &*self.read_slot() {
            ModelSlot::Failed(message) => Some(message.clone()),
            _ => None,
        }
    }

    /// Counts one successful prediction.
    pub fn record_prediction(&self) {
        self.predictions.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts one failed prediction of the given kind.
    pub fn record_failure(&self, kind: ErrorKind) {
        self.stats.increment_failure(kind);
    }

    pub fn prediction_count(&self) -> u64 {
        self.predictions.load(Ordering::SeqCst)
    }

    pub fn stats(&self) -> &ProcessingStats {
        &self.stats
    }

    /// Status snapshot, or `None` while no model is loaded.
    pub fn status(&self) -> Option<ServiceStatus> {
        let model = self.model()?;
        Some(ServiceStatus {
            model_version: model.version().to_string(),
            model_loaded: true,
            last_updated: model.artifact_modified().map(|t| t.to_rfc3339()),
            total_predictions: self.prediction_count(),
            status: "active",
            failures: FailureCounts::from_stats(&self.stats),
        })
    }

    fn read_slot(&self) -> std::sync::RwLockReadGuard<'_, ModelSlot> {
        self.slot.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_slot(&self, slot: ModelSlot) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = slot;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CharIndex, EncodedSequence, Scorer};
    use crate::error_handling::ScorerError;
    use std::sync::atomic::AtomicUsize;

    fn model() -> LoadedModel {
        let scorer = |_: &EncodedSequence| -> Result<f64, ScorerError> { Ok(0.1) };
        let scorer: Arc<dyn Scorer> = Arc::new(scorer);
        LoadedModel::new(CharIndex::from_corpus(["http://"]), scorer)
    }

    #[test]
    fn test_starts_uninitialized() {
        let loader = || -> Result<LoadedModel, ModelLoadError> { Ok(model()) };
        let state = ServiceState::new(Arc::new(loader));
        assert_eq!(state.lifecycle(), LifecycleState::Uninitialized);
        assert!(state.model().is_none());
        assert!(state.status().is_none());
    }

    #[test]
    fn test_init_then_idempotent() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let loader = move || -> Result<LoadedModel, ModelLoadError> {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(model())
        };
        let state = ServiceState::new(Arc::new(loader));

        assert_eq!(state.init().unwrap(), InitOutcome::Loaded);
        assert_eq!(state.lifecycle(), LifecycleState::Ready);
        assert_eq!(state.init().unwrap(), InitOutcome::AlreadyLoaded);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_load_is_recoverable() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&attempts);
        let loader = move || -> Result<LoadedModel, ModelLoadError> {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(ModelLoadError::Artifact("corrupt".to_string()))
            } else {
                Ok(model())
            }
        };
        let state = ServiceState::new(Arc::new(loader));

        assert!(state.init().is_err());
        assert_eq!(state.lifecycle(), LifecycleState::Failed);
        assert!(state.last_load_error().unwrap().contains("corrupt"));

        assert_eq!(state.init().unwrap(), InitOutcome::Loaded);
        assert_eq!(state.lifecycle(), LifecycleState::Ready);
        assert!(state.last_load_error().is_none());
    }

    #[test]
    fn test_status_snapshot() {
        let loader = || -> Result<LoadedModel, ModelLoadError> { Ok(model().with_version("3.0.0")) };
        let state = ServiceState::new(Arc::new(loader));
        state.init().unwrap();
        state.record_prediction();
        state.record_prediction();
        state.record_failure(ErrorKind::InvalidUrl);

        let status = state.status().unwrap();
        assert!(status.model_loaded);
        assert_eq!(status.model_version, "3.0.0");
        assert_eq!(status.total_predictions, 2);
        assert_eq!(status.failures.invalid_url, 1);
        assert_eq!(status.failures.total, 1);
        assert!(status.last_updated.is_none());
    }

    #[test]
    fn test_concurrent_init_loads_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let loader = move || -> Result<LoadedModel, ModelLoadError> {
            counter.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(std::time::Duration::from_millis(20));
            Ok(model())
        };
        let state = ServiceState::new(Arc::new(loader));
        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| state.init().unwrap());
            }
        });
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(state.is_ready());
    }
}
