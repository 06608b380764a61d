//! Scorer contract and the bundled logistic scorer.

use serde::Deserialize;

use crate::config::DEFAULT_MODEL_VERSION;
use crate::error_handling::{ModelLoadError, ScorerError};

use super::char_index::UNKNOWN_CODE;
use super::encoder::EncodedSequence;

/// Opaque classifier: encoded sequence in, phishing probability out.
///
/// Implementations must be safe to call from many threads at once. The
/// returned value is expected to lie in `[0, 1]`; anything else is treated as
/// a model fault by the pipeline.
pub trait Scorer: Send + Sync {
    fn score(&self, sequence: &EncodedSequence) -> Result<f64, ScorerError>;
}

impl<F> Scorer for F
where
    F: Fn(&EncodedSequence) -> Result<f64, ScorerError> + Send + Sync,
{
    fn score(&self, sequence: &EncodedSequence) -> Result<f64, ScorerError> {
        self(sequence)
    }
}

#[derive(Debug, Deserialize)]
struct LogisticArtifact {
    #[serde(default)]
    version: Option<String>,
    bias: f64,
    weights: Vec<f64>,
}

/// Bag-of-characters logistic model.
///
/// `p = sigmoid(bias + mean(weights[code]))` over the non-padding positions of
/// the sequence. An all-padding sequence scores `sigmoid(bias)`.
#[derive(Debug, Clone, PartialEq)]
pub struct LogisticScorer {
    version: String,
    bias: f64,
    weights: Vec<f64>,
}

impl LogisticScorer {
    pub fn new(bias: f64, weights: Vec<f64>) -> Result<Self, ModelLoadError> {
        if weights.is_empty() {
            return Err(ModelLoadError::Artifact(
                "weights must not be empty".to_string(),
            ));
        }
        if !bias.is_finite() || weights.iter().any(|w| !w.is_finite()) {
            return Err(ModelLoadError::Artifact(
                "bias and weights must be finite numbers".to_string(),
            ));
        }
        Ok(Self {
            version: DEFAULT_MODEL_VERSION.to_string(),
            bias,
            weights,
        })
    }

    /// Parses `{"version": "...", "bias": f64, "weights": [f64, ...]}`.
    pub fn from_json_str(json: &str) -> Result<Self, ModelLoadError> {
        let artifact: LogisticArtifact = serde_json::from_str(json)
            .map_err(|e| ModelLoadError::Artifact(e.to_string()))?;
        let mut scorer = Self::new(artifact.bias, artifact.weights)?;
        if let Some(version) = artifact.version {
            scorer.version = version;
        }
        Ok(scorer)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Number of codes the model has weights for.
    pub fn vocabulary(&self) -> usize {
        self.weights.len()
    }
}

impl Scorer for LogisticScorer {
    fn score(&self, sequence: &EncodedSequence) -> Result<f64, ScorerError> {
        let mut sum = 0.0;
        let mut count = 0usize;
        for &code in sequence.as_slice() {
            if code == UNKNOWN_CODE {
                continue;
            }
            let weight = self
                .weights
                .get(code as usize)
                .ok_or(ScorerError::CodeOutOfRange {
                    code,
                    vocabulary: self.weights.len(),
                })?;
            sum += weight;
            count += 1;
        }
        let logit = if count == 0 {
            self.bias
        } else {
            self.bias + sum / count as f64
        };
        Ok(sigmoid(logit))
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}
