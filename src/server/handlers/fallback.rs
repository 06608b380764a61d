//! Responses for requests no handler answers itself: unknown paths, wrong
//! methods, bodies over the size limit, and handler panics.

use std::any::Any;

use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use log::{debug, error};

use super::super::types::ApiError;
use crate::config::MAX_REQUEST_BODY_BYTES;
use crate::error_handling::ErrorKind;

/// Unmatched routes.
pub async fn not_found_handler(uri: Uri) -> ApiError {
    debug!("No route for {}", uri.path());
    ApiError::new(ErrorKind::NotFound, "The requested resource was not found")
}

/// Replaces axum's plain rejections with the error envelope.
///
/// A 405 keeps its `Allow` header. A 413 from the body limit becomes
/// `INVALID_REQUEST`.
pub async fn rewrite_rejections(response: Response) -> Response {
    match response.status() {
        StatusCode::METHOD_NOT_ALLOWED => {
            let allow = response.headers().get(header::ALLOW).cloned();
            let mut rewritten =
                ApiError::new(ErrorKind::MethodNotAllowed, "The request method is not allowed")
                    .into_response();
            if let Some(allow) = allow {
                rewritten.headers_mut().insert(header::ALLOW, allow);
            }
            rewritten
        }
        StatusCode::PAYLOAD_TOO_LARGE => {
            debug!("Rejected request body over {} bytes", MAX_REQUEST_BODY_BYTES);
            ApiError::invalid_request(format!(
                "Request body exceeds the {} byte limit",
                MAX_REQUEST_BODY_BYTES
            ))
            .into_response()
        }
        _ => response,
    }
}

/// Turns a handler panic into a `SERVER_ERROR` response.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    error!("Request handler panicked: {}", detail);
    ApiError::new(ErrorKind::ServerError, "Internal server error").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_response_is_server_error() {
        let response = panic_response(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_rewrite_keeps_other_statuses() {
        let response = StatusCode::NO_CONTENT.into_response();
        let response = rewrite_rejections(response).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_rewrite_keeps_allow_header() {
        let response = (
            StatusCode::METHOD_NOT_ALLOWED,
            [(header::ALLOW, "POST")],
        )
            .into_response();
        let response = rewrite_rejections(response).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[header::ALLOW], "POST");
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
    }

    #[tokio::test]
    async fn test_rewrite_payload_too_large() {
        let response = (StatusCode::PAYLOAD_TOO_LARGE, "length limit exceeded").into_response();
        let response = rewrite_rejections(response).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
    }
}
