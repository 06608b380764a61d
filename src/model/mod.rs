//! Model-side collaborators of the prediction pipeline.
//!
//! - [`CharIndex`]: character to code lookup table
//! - [`encode`]: URL to fixed-length [`EncodedSequence`]
//! - [`Scorer`]: the opaque classifier contract, plus [`LogisticScorer`]
//! - [`LoadedModel`] / [`ModelLoader`]: the bundle bound by `init` and how it is produced

mod char_index;
mod encoder;
mod scorer;

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Local};

use crate::config::DEFAULT_MODEL_VERSION;
use crate::error_handling::ModelLoadError;

pub use char_index::{CharIndex, UNKNOWN_CODE};
pub use encoder::{encode, EncodedSequence};
pub use scorer::{LogisticScorer, Scorer};

/// Character index and scorer bound together by a successful load.
///
/// Read-only once constructed; a reload replaces the whole bundle.
#[derive(Clone)]
pub struct LoadedModel {
    char_index: CharIndex,
    scorer: Arc<dyn Scorer>,
    version: String,
    artifact_modified: Option<DateTime<Local>>,
}

impl LoadedModel {
    pub fn new(char_index: CharIndex, scorer: Arc<dyn Scorer>) -> Self {
        Self {
            char_index,
            scorer,
            version: DEFAULT_MODEL_VERSION.to_string(),
            artifact_modified: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_artifact_modified(mut self, modified: DateTime<Local>) -> Self {
        self.artifact_modified = Some(modified);
        self
    }

    pub fn char_index(&self) -> &CharIndex {
        &self.char_index
    }

    pub fn scorer(&self) -> &dyn Scorer {
        self.scorer.as_ref()
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Modification time of the scorer artifact, if known.
    pub fn artifact_modified(&self) -> Option<DateTime<Local>> {
        self.artifact_modified
    }
}

impl fmt::Debug for LoadedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedModel")
            .field("characters", &self.char_index.len())
            .field("version", &self.version)
            .field("artifact_modified", &self.artifact_modified)
            .finish()
    }
}

/// Produces a [`LoadedModel`]; called by the service's `init` operation.
pub trait ModelLoader: Send + Sync {
    fn load(&self) -> Result<LoadedModel, ModelLoadError>;
}

impl<F> ModelLoader for F
where
    F: Fn() -> Result<LoadedModel, ModelLoadError> + Send + Sync,
{
    fn load(&self) -> Result<LoadedModel, ModelLoadError> {
        self()
    }
}
