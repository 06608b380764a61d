//! HTTP gateway.
//!
//! Endpoints (served at the root and under `/api/v1`):
//! - `POST /predict` - classify one URL
//! - `POST /predict/batch` - classify a list of URLs
//! - `GET /status` - model status (`/api/v1/model/status` is an alias)
//! - `GET /init` - load the model if needed
//! - `GET /` - service metadata
//!
//! Every response body is JSON; errors use the `{success: false, error}`
//! envelope, including unknown routes, wrong methods, oversized bodies and
//! handler panics.

mod handlers;
mod shutdown;
mod types;

use axum::extract::DefaultBodyLimit;
use axum::middleware::map_response;
use axum::routing::{get, post};
use axum::Router;
use log::info;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;

use crate::config::{API_PREFIX, MAX_REQUEST_BODY_BYTES};
use handlers::{
    batch_handler, index_handler, init_handler, not_found_handler, panic_response,
    predict_handler, rewrite_rejections, status_handler,
};
pub use shutdown::shutdown_signal;
pub use types::{ApiError, AppState};

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/predict", post(predict_handler))
        .route("/predict/batch", post(batch_handler))
        .route("/status", get(status_handler))
        .route("/init", get(init_handler))
}

/// Builds the application router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .merge(api_routes())
        .nest(
            API_PREFIX,
            api_routes().route("/model/status", get(status_handler)),
        )
        .fallback(not_found_handler)
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(map_response(rewrite_rejections))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds `bind_address` and serves until a shutdown signal arrives.
pub async fn start_server(bind_address: &str, state: AppState) -> Result<(), anyhow::Error> {
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(bind_address)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind server to {}: {}", bind_address, e))?;

    info!("Server listening on http://{}/", bind_address);
    info!("  - Predict: POST http://{}{}/predict", bind_address, API_PREFIX);
    info!("  - Batch:   POST http://{}{}/predict/batch", bind_address, API_PREFIX);
    info!("  - Status:  GET  http://{}{}/status", bind_address, API_PREFIX);
    info!("  - Init:    GET  http://{}{}/init", bind_address, API_PREFIX);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    info!("Server stopped");
    Ok(())
}
