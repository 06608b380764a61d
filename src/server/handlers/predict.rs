//! Prediction handlers.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use log::warn;
use serde_json::Value;

use super::super::types::{ApiError, AppState, BatchResponse, SuccessResponse};
use crate::error_handling::ErrorKind;
use crate::pipeline::{BatchOutcome, Prediction, PredictionResult};

/// Parses a request body as a JSON object.
///
/// Done by hand rather than with the `Json` extractor so that every malformed
/// body gets the `INVALID_REQUEST` envelope.
fn parse_object(body: &Bytes) -> Result<serde_json::Map<String, Value>, ApiError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ApiError::invalid_request(
            "Request body must be a JSON object",
        )),
        Err(e) => Err(ApiError::invalid_request(format!(
            "Request body is not valid JSON: {}",
            e
        ))),
    }
}

/// `POST /predict` with body `{"url": "..."}`.
pub async fn predict_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SuccessResponse<Prediction>>, ApiError> {
    let body = parse_object(&body)?;
    let url = match body.get("url") {
        Some(Value::String(url)) => url.clone(),
        Some(_) => return Err(ApiError::invalid_request("The `url` field must be a string")),
        None => {
            return Err(ApiError::invalid_request(
                "Request body must contain a `url` field",
            ))
        }
    };

    let pipeline = state.pipeline.clone();
    let result = tokio::task::spawn_blocking(move || pipeline.predict_one(&url))
        .await
        .map_err(|e| {
            warn!("Prediction task did not complete: {}", e);
            ApiError::new(ErrorKind::ServerError, "Internal server error")
        })?;

    match result {
        PredictionResult::Success(prediction) => Ok(Json(SuccessResponse::new(prediction))),
        PredictionResult::Failure(failure) => Err(failure.into()),
    }
}

/// `POST /predict/batch` with body `{"urls": ["...", ...]}`.
///
/// Responds 200 with successes in `data` and failures in `errors` when at
/// least one URL succeeded, otherwise `BATCH_FAILED` with per-URL `details`.
pub async fn batch_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<BatchResponse>, ApiError> {
    let body = parse_object(&body)?;
    let Some(Value::Array(items)) = body.get("urls") else {
        return Err(ApiError::invalid_request(
            "Request body must contain a `urls` array",
        ));
    };

    state.batch.check_size(items.len())?;

    let urls = items
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect::<Option<Vec<String>>>()
        .ok_or_else(|| ApiError::invalid_request("Every element of `urls` must be a string"))?;

    let batch = state.batch.predict_batch_concurrent(urls).await?;

    if batch.outcome() == BatchOutcome::AllFailed {
        let (_, failures) = batch.partition();
        return Err(
            ApiError::new(ErrorKind::BatchFailed, "All URL predictions failed")
                .with_details(failures),
        );
    }

    let (data, failures) = batch.partition();
    Ok(Json(BatchResponse {
        success: true,
        data,
        errors: if failures.is_empty() {
            None
        } else {
            Some(failures)
        },
    }))
}
