//! Response envelopes and shared handler state.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::error_handling::{BatchError, ErrorKind};
use crate::pipeline::{BatchOrchestrator, Prediction, PredictionFailure, PredictionPipeline};
use crate::service::ServiceState;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: PredictionPipeline,
    pub batch: BatchOrchestrator,
}

impl AppState {
    pub fn new(batch: BatchOrchestrator) -> Self {
        Self {
            pipeline: batch.pipeline().clone(),
            batch,
        }
    }

    pub fn service(&self) -> &Arc<ServiceState> {
        self.pipeline.service()
    }
}

/// `{"success": true, "data": ...}`
#[derive(Debug, Serialize)]
pub struct SuccessResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> SuccessResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// `{"success": true, "message": ...}`, returned by `/init`.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: &'static str,
}

/// Batch response with at least one success.
///
/// `errors` serializes as `null` when every URL succeeded.
#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub success: bool,
    pub data: Vec<Prediction>,
    pub errors: Option<Vec<PredictionFailure>>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: ErrorKind,
    pub message: String,
}

/// `{"success": false, "error": {"code", "message"}}`, plus per-URL
/// `details` for a failed batch.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorBody,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<PredictionFailure>>,
}

/// An error outcome of a request, rendered as the error envelope with the
/// status code of its kind.
#[derive(Debug)]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
    pub details: Option<Vec<PredictionFailure>>,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Vec<PredictionFailure>) -> Self {
        self.details = Some(details);
        self
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidRequest, message)
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.kind.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl From<PredictionFailure> for ApiError {
    fn from(failure: PredictionFailure) -> Self {
        Self::new(failure.error, failure.message)
    }
}

impl From<BatchError> for ApiError {
    fn from(e: BatchError) -> Self {
        Self::new(e.kind(), e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            success: false,
            error: ErrorBody {
                code: self.kind,
                message: self.message,
            },
            details: self.details,
        };
        (status, Json(body)).into_response()
    }
}

/// Service metadata served at `/`.
#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub status: &'static str,
    pub model_status: IndexModelStatus,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Debug, Serialize)]
pub struct IndexModelStatus {
    pub loaded: bool,
    pub state: &'static str,
    pub predictions_made: u64,
}

#[derive(Debug, Serialize)]
pub struct EndpointInfo {
    pub method: &'static str,
    pub path: &'static str,
    pub description: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_status_follows_kind() {
        assert_eq!(
            ApiError::invalid_request("x").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::new(ErrorKind::ModelNotLoaded, "x").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::new(ErrorKind::NotFound, "x").status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_error_envelope_shape() {
        let body = ErrorResponse {
            success: false,
            error: ErrorBody {
                code: ErrorKind::UrlTooLong,
                message: "too long".to_string(),
            },
            details: None,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["error"]["code"], "URL_TOO_LONG");
        assert!(value.get("details").is_none());
    }

    #[test]
    fn test_batch_response_null_errors() {
        let body = BatchResponse {
            success: true,
            data: vec![],
            errors: None,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert!(value["errors"].is_null());
        assert!(value.as_object().unwrap().contains_key("errors"));
    }
}
