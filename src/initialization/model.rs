//! File-backed model loading.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Local};
use log::{debug, info};

use crate::error_handling::ModelLoadError;
use crate::model::{CharIndex, LoadedModel, LogisticScorer, ModelLoader, Scorer};

/// Loads the character index and the logistic scorer artifact from disk.
#[derive(Debug, Clone)]
pub struct FileModelLoader {
    model_path: PathBuf,
    char_index_path: PathBuf,
}

impl FileModelLoader {
    pub fn new(model_path: impl Into<PathBuf>, char_index_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            char_index_path: char_index_path.into(),
        }
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    pub fn char_index_path(&self) -> &Path {
        &self.char_index_path
    }

    /// Whether both artifact files exist.
    pub fn artifacts_present(&self) -> bool {
        self.model_path.exists() && self.char_index_path.exists()
    }
}

impl ModelLoader for FileModelLoader {
    fn load(&self) -> Result<LoadedModel, ModelLoadError> {
        debug!("Reading character index from {}", self.char_index_path.display());
        let char_index = CharIndex::from_json_str(&read(&self.char_index_path)?)?;

        debug!("Reading model artifact from {}", self.model_path.display());
        let scorer = LogisticScorer::from_json_str(&read(&self.model_path)?)?;

        if (char_index.max_code() as usize) >= scorer.vocabulary() {
            return Err(ModelLoadError::Artifact(format!(
                "character index uses codes up to {} but the model only has {} weights",
                char_index.max_code(),
                scorer.vocabulary()
            )));
        }

        let version = scorer.version().to_string();
        let scorer: Arc<dyn Scorer> = Arc::new(scorer);
        let mut model = LoadedModel::new(char_index, scorer).with_version(version);
        if let Some(modified) = modified_time(&self.model_path) {
            model = model.with_artifact_modified(modified);
        }
        info!(
            "Loaded model artifact {} ({} characters indexed)",
            self.model_path.display(),
            model.char_index().len()
        );
        Ok(model)
    }
}

fn read(path: &Path) -> Result<String, ModelLoadError> {
    std::fs::read_to_string(path).map_err(|source| ModelLoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn modified_time(path: &Path) -> Option<DateTime<Local>> {
    let modified = std::fs::metadata(path).and_then(|m| m.modified()).ok()?;
    Some(DateTime::<Local>::from(modified))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_from_files() {
        let index = write_temp(r#"{"h": 1, "t": 2, "p": 3}"#);
        let model = write_temp(r#"{"version": "1.2.3", "bias": 0.0, "weights": [0, 0.5, -0.5, 1]}"#);
        let loader = FileModelLoader::new(model.path(), index.path());

        assert!(loader.artifacts_present());
        let loaded = loader.load().unwrap();
        assert_eq!(loaded.version(), "1.2.3");
        assert_eq!(loaded.char_index().len(), 3);
        assert!(loaded.artifact_modified().is_some());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let index = write_temp(r#"{"h": 1}"#);
        let loader = FileModelLoader::new("/nonexistent/model.json", index.path());
        assert!(!loader.artifacts_present());
        assert!(matches!(loader.load(), Err(ModelLoadError::Io { .. })));
    }

    #[test]
    fn test_bad_char_index() {
        let index = write_temp(r#"{"hh": 1}"#);
        let model = write_temp(r#"{"bias": 0.0, "weights": [0, 1]}"#);
        let loader = FileModelLoader::new(model.path(), index.path());
        assert!(matches!(loader.load(), Err(ModelLoadError::CharIndex(_))));
    }

    #[test]
    fn test_vocabulary_mismatch() {
        let index = write_temp(r#"{"h": 1, "t": 5}"#);
        let model = write_temp(r#"{"bias": 0.0, "weights": [0, 1]}"#);
        let loader = FileModelLoader::new(model.path(), index.path());
        let err = loader.load().unwrap_err();
        assert!(err.to_string().contains("codes up to 5"));
    }
}
