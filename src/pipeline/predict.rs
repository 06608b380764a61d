//! Single-URL prediction.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use log::{debug, warn};

use crate::error_handling::ErrorKind;
use crate::model::encode;
use crate::service::ServiceState;
use crate::utils::{sanitize_and_truncate_error_message, truncate_chars};

use super::result::{Prediction, PredictionResult};
use super::trust_list::TrustList;
use super::validator::UrlValidator;

/// Validator, trust list and the shared service, wired in the fixed order
/// the pipeline runs them.
///
/// Cheap to clone; holds no request data.
#[derive(Clone)]
pub struct PredictionPipeline {
    validator: UrlValidator,
    trust_list: Arc<TrustList>,
    service: Arc<ServiceState>,
}

impl PredictionPipeline {
    pub fn new(trust_list: TrustList, service: Arc<ServiceState>) -> Self {
        Self {
            validator: UrlValidator::default(),
            trust_list: Arc::new(trust_list),
            service,
        }
    }

    pub fn service(&self) -> &Arc<ServiceState> {
        &self.service
    }

    pub fn trust_list(&self) -> &TrustList {
        &self.trust_list
    }

    /// Classifies one URL.
    ///
    /// In order:
    /// 1. validation (`URL_TOO_LONG`, `INVALID_URL`)
    /// 2. model presence (`MODEL_NOT_LOADED`)
    /// 3. trust list: benign with confidence 0.05, scorer not invoked
    /// 4. encode and score (`MODEL_ERROR` on any scorer fault)
    ///
    /// The prediction counter moves only on steps 3 and 4 succeeding.
    pub fn predict_one(&self, url: &str) -> PredictionResult {
        if let Err(e) = self.validator.validate(url) {
            debug!("Rejected URL ({}): {}", e.kind(), truncate_for_log(url));
            return self.fail(url, e.kind(), e.to_string());
        }

        let Some(model) = self.service.model() else {
            return self.fail(
                url,
                ErrorKind::ModelNotLoaded,
                "Model has not been loaded yet; call /init".to_string(),
            );
        };

        if let Some(entry) = self.trust_list.matching_entry(url) {
            debug!("Trust list hit on '{}': {}", entry, url);
            self.service.record_prediction();
            return PredictionResult::Success(Prediction::trusted(url));
        }

        let sequence = encode(url, model.char_index());
        let scored = catch_unwind(AssertUnwindSafe(|| model.scorer().score(&sequence)));

        let probability = match scored {
            Ok(Ok(p)) if (0.0..=1.0).contains(&p) => p,
            Ok(Ok(p)) => {
                warn!("Scorer returned out-of-range probability {} for {}", p, url);
                return self.fail(
                    url,
                    ErrorKind::ModelError,
                    format!("Model prediction failed: probability {} outside [0, 1]", p),
                );
            }
            Ok(Err(e)) => {
                warn!("Scorer failed for {}: {}", url, e);
                return self.fail(
                    url,
                    ErrorKind::ModelError,
                    format!("Model prediction failed: {}", e),
                );
            }
            Err(panic) => {
                let reason = panic_message(panic.as_ref());
                warn!("Scorer panicked for {}: {}", url, reason);
                return self.fail(
                    url,
                    ErrorKind::ModelError,
                    format!("Model prediction failed: {}", reason),
                );
            }
        };

        debug!("Scored {} -> {:.4}", url, probability);
        self.service.record_prediction();
        PredictionResult::Success(Prediction::from_probability(url, probability))
    }

    fn fail(&self, url: &str, kind: ErrorKind, message: String) -> PredictionResult {
        self.service.record_failure(kind);
        PredictionResult::failure(url, kind, sanitize_and_truncate_error_message(&message))
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "scorer panicked".to_string()
    }
}

fn truncate_for_log(url: &str) -> String {
    let short = truncate_chars(url, 50);
    if short.len() < url.len() {
        format!("{short}...")
    } else {
        short.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::{ModelLoadError, ScorerError};
    use crate::model::{CharIndex, EncodedSequence, LoadedModel, Scorer};

    fn pipeline_with(score: f64) -> PredictionPipeline {
        let loader = move || -> Result<LoadedModel, ModelLoadError> {
            let scorer = move |_: &EncodedSequence| -> Result<f64, ScorerError> { Ok(score) };
            let scorer: Arc<dyn Scorer> = Arc::new(scorer);
            Ok(LoadedModel::new(CharIndex::from_corpus(["http://a.b"]), scorer))
        };
        let service = Arc::new(ServiceState::new(Arc::new(loader)));
        service.init().unwrap();
        PredictionPipeline::new(TrustList::default(), service)
    }

    #[test]
    fn test_phishing_prediction() {
        let pipeline = pipeline_with(0.91);
        match pipeline.predict_one("http://verify123account.xyz") {
            PredictionResult::Success(p) => {
                assert!(p.is_phishing);
                assert!((p.confidence - 0.91).abs() < 1e-12);
            }
            other => panic!("expected success, got {other:?}"),
        }
        assert_eq!(pipeline.service().prediction_count(), 1);
    }

    #[test]
    fn test_out_of_range_probability_is_model_error() {
        let pipeline = pipeline_with(1.5);
        let result = pipeline.predict_one("http://example.com");
        assert_eq!(result.error_kind(), Some(ErrorKind::ModelError));
        assert_eq!(pipeline.service().prediction_count(), 0);

        let pipeline = pipeline_with(f64::NAN);
        let result = pipeline.predict_one("http://example.com");
        assert_eq!(result.error_kind(), Some(ErrorKind::ModelError));
    }

    #[test]
    fn test_failures_are_counted_by_kind() {
        let pipeline = pipeline_with(0.1);
        pipeline.predict_one("not a url");
        pipeline.predict_one(&"x".repeat(300));
        let stats = pipeline.service().stats();
        assert_eq!(stats.get_failure_count(ErrorKind::InvalidUrl), 1);
        assert_eq!(stats.get_failure_count(ErrorKind::UrlTooLong), 1);
    }

    #[test]
    fn test_truncate_for_log() {
        assert_eq!(truncate_for_log("short"), "short");
        let long = "a".repeat(80);
        assert_eq!(truncate_for_log(&long).len(), 53);
    }
}
