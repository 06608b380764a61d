// Shared test helpers: stub scorers, stub loaders and ready-made pipelines.
//
// This module provides common utilities used across multiple test files to reduce duplication.

#![allow(dead_code)] // Each test binary uses a different subset

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use url_sentinel::error_handling::{ModelLoadError, ScorerError};
use url_sentinel::model::{CharIndex, EncodedSequence, LoadedModel, ModelLoader, Scorer};
use url_sentinel::pipeline::{BatchOrchestrator, PredictionPipeline, TrustList};
use url_sentinel::server::{build_router, AppState};
use url_sentinel::service::ServiceState;

/// Scorer stub that returns a fixed outcome and records every invocation.
pub struct StubScorer {
    outcome: Result<f64, ScorerError>,
    calls: AtomicUsize,
}

impl StubScorer {
    pub fn returning(probability: f64) -> Arc<Self> {
        Arc::new(Self {
            outcome: Ok(probability),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            outcome: Err(ScorerError::Inference(message.to_string())),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Scorer for StubScorer {
    fn score(&self, _sequence: &EncodedSequence) -> Result<f64, ScorerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}

/// Loader that binds `scorer` with a character index built from a small corpus.
pub fn stub_loader(scorer: Arc<StubScorer>) -> Arc<dyn ModelLoader> {
    let loader = move || -> Result<LoadedModel, ModelLoadError> {
        let scorer: Arc<dyn Scorer> = scorer.clone();
        let index = CharIndex::from_corpus(["https://example.com/login?user=1"]);
        Ok(LoadedModel::new(index, scorer).with_version("test-1"))
    };
    Arc::new(loader)
}

/// Loader that always fails.
pub fn failing_loader(message: &'static str) -> Arc<dyn ModelLoader> {
    let loader =
        move || -> Result<LoadedModel, ModelLoadError> { Err(ModelLoadError::Artifact(message.to_string())) };
    Arc::new(loader)
}

/// Service with `scorer` bound and the model already loaded.
pub fn ready_service(scorer: Arc<StubScorer>) -> Arc<ServiceState> {
    let service = Arc::new(ServiceState::new(stub_loader(scorer)));
    service.init().expect("stub loader should not fail");
    service
}

/// Pipeline over a loaded stub model and the default trust list.
pub fn ready_pipeline(scorer: Arc<StubScorer>) -> PredictionPipeline {
    PredictionPipeline::new(TrustList::default(), ready_service(scorer))
}

/// Pipeline whose service has not been initialized.
pub fn uninitialized_pipeline(scorer: Arc<StubScorer>) -> PredictionPipeline {
    PredictionPipeline::new(
        TrustList::default(),
        Arc::new(ServiceState::new(stub_loader(scorer))),
    )
}

/// Router over `pipeline` with the given batch cap.
pub fn router_for(pipeline: PredictionPipeline, max_batch_size: usize) -> Router {
    let batch = BatchOrchestrator::new(pipeline)
        .with_max_batch_size(max_batch_size)
        .with_concurrency(4);
    build_router(AppState::new(batch))
}

/// Sends one request and returns the status and the JSON body (`Null` if empty).
pub async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => request.body(Body::empty()),
    }
    .expect("request should build");
    read(router, request).await
}

/// Sends a raw body, for malformed-input tests.
pub async fn send_raw(router: &Router, method: &str, uri: &str, body: &'static str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .expect("request should build");
    read(router, request).await
}

async fn read(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("router is infallible");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body should be JSON")
    };
    (status, value)
}
