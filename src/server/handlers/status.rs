//! Status, init and index handlers.

use axum::extract::State;
use axum::Json;
use log::{info, warn};

use super::super::types::{
    ApiError, AppState, EndpointInfo, IndexModelStatus, IndexResponse, MessageResponse,
    SuccessResponse,
};
use crate::config::{SERVICE_NAME, SERVICE_VERSION};
use crate::error_handling::ErrorKind;
use crate::service::{InitOutcome, ServiceStatus};
use crate::utils::sanitize_and_truncate_error_message;

/// `GET /status`: model status, or `MODEL_NOT_LOADED` before init.
pub async fn status_handler(
    State(state): State<AppState>,
) -> Result<Json<SuccessResponse<ServiceStatus>>, ApiError> {
    state
        .service()
        .status()
        .map(|status| Json(SuccessResponse::new(status)))
        .ok_or_else(|| ApiError::new(ErrorKind::ModelNotLoaded, "Model has not been loaded yet"))
}

/// `GET /init`: loads the model unless already loaded.
pub async fn init_handler(
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    let service = state.service().clone();
    let outcome = tokio::task::spawn_blocking(move || service.init())
        .await
        .map_err(|e| {
            warn!("Model init task did not complete: {}", e);
            ApiError::new(ErrorKind::ServerError, "Internal server error")
        })?;

    match outcome {
        Ok(InitOutcome::AlreadyLoaded) => Ok(Json(MessageResponse {
            success: true,
            message: "Model already loaded",
        })),
        Ok(InitOutcome::Loaded) => {
            info!("Model loaded via /init");
            Ok(Json(MessageResponse {
                success: true,
                message: "Model loaded successfully",
            }))
        }
        Err(e) => Err(ApiError::new(
            ErrorKind::ModelLoadError,
            sanitize_and_truncate_error_message(&format!("Model loading failed: {}", e)),
        )),
    }
}

/// `GET /`: service metadata and the endpoint list.
pub async fn index_handler(State(state): State<AppState>) -> Json<IndexResponse> {
    let service = state.service();
    Json(IndexResponse {
        name: SERVICE_NAME,
        version: SERVICE_VERSION,
        status: "running",
        model_status: IndexModelStatus {
            loaded: service.is_ready(),
            state: service.lifecycle().as_str(),
            predictions_made: service.prediction_count(),
        },
        endpoints: endpoints(),
    })
}

fn endpoints() -> Vec<EndpointInfo> {
    vec![
        EndpointInfo {
            method: "GET",
            path: "/",
            description: "Service information (this page)",
        },
        EndpointInfo {
            method: "GET",
            path: "/api/v1/init",
            description: "Load the model if it is not loaded yet",
        },
        EndpointInfo {
            method: "POST",
            path: "/api/v1/predict",
            description: "Classify one URL; body {\"url\": string}",
        },
        EndpointInfo {
            method: "POST",
            path: "/api/v1/predict/batch",
            description: "Classify several URLs; body {\"urls\": [string]}",
        },
        EndpointInfo {
            method: "GET",
            path: "/api/v1/status",
            description: "Model status and prediction count (also /api/v1/model/status)",
        },
    ]
}
