//! Error handler for converting AppError to HTTP responses.
//!
//! Implements the IntoResponse trait for AppError with consistent status
//! code mapping and error message sanitization. Upstream failures surface
//! their message so callers can see why a forward was rejected; internal
//! and configuration errors are sanitized.

use axum::{
    Json,
    body::{Body, to_bytes},
    extract::Request,
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{error, warn};

use super::RequestId;
use crate::api::dto::ErrorResponse;
use crate::error::AppError;

/// Largest error body that gets buffered for request-id injection.
const ERROR_BODY_LIMIT: usize = 64 * 1024;

impl IntoResponse for AppError {
    /// Converts an AppError into an HTTP response.
    ///
    /// # Status Code Mapping
    /// - Validation → 400 BAD_REQUEST
    /// - BadRequest → 400 BAD_REQUEST
    /// - Unauthorized → 401 UNAUTHORIZED
    /// - Upstream → 500 INTERNAL_SERVER_ERROR
    /// - Configuration → 500 INTERNAL_SERVER_ERROR
    /// - Internal → 500 INTERNAL_SERVER_ERROR
    fn into_response(self) -> Response {
        let (status, error_response) = match &self {
            AppError::Validation { field, reason } => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(
                    "VALIDATION_ERROR",
                    &format!("Validation failed for {}: {}", field, reason),
                ),
            ),
            AppError::BadRequest { message } => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("BAD_REQUEST", message),
            ),
            AppError::Unauthorized { message } => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse::new("UNAUTHORIZED", message),
            ),
            AppError::Upstream { service, message, .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new(
                    "UPSTREAM_ERROR",
                    &format!("{} request failed: {}", service, message),
                ),
            ),
            AppError::Configuration { key, .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new(
                    "CONFIGURATION_ERROR",
                    &format!("Configuration error: {}", key),
                ),
            ),
            AppError::Internal { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new("INTERNAL_ERROR", "An internal error occurred"),
            ),
        };

        if status.is_server_error() {
            error!(error = %self, code = %error_response.code, "Request failed");
        } else {
            warn!(error = %self, code = %error_response.code, "Request rejected");
        }

        (status, Json(error_response)).into_response()
    }
}

/// Middleware that stamps the request ID into JSON error bodies.
///
/// Error responses render as [`ErrorResponse`] without request context;
/// this layer runs inside the request-id middleware and fills in the
/// `request_id` field so error bodies correlate with the `x-request-id`
/// header and the log entries. Non-error and non-JSON responses pass
/// through untouched.
pub async fn error_correlation_middleware(request: Request, next: Next) -> Response {
    let request_id = request.extensions().get::<RequestId>().map(|r| r.0.clone());
    let response = next.run(request).await;

    let Some(request_id) = request_id else {
        return response;
    };
    if !response.status().is_client_error() && !response.status().is_server_error() {
        return response;
    }
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));
    if !is_json {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match to_bytes(body, ERROR_BODY_LIMIT).await {
        Ok(bytes) => bytes,
        Err(_) => return Response::from_parts(parts, Body::empty()),
    };

    let decorated = match serde_json::from_slice::<ErrorResponse>(&bytes) {
        Ok(error_response) if error_response.request_id.is_none() => {
            let error_response = error_response.with_request_id(&request_id);
            serde_json::to_vec(&error_response).unwrap_or_else(|_| bytes.to_vec())
        }
        _ => bytes.to_vec(),
    };

    // Stale length from the original body.
    parts.headers.remove(header::CONTENT_LENGTH);
    Response::from_parts(parts, Body::from(decorated))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(error: AppError) -> StatusCode {
        error.into_response().status()
    }

    #[test]
    fn test_bad_request_maps_to_400() {
        let error = AppError::BadRequest {
            message: "invalid JSON body".to_string(),
        };
        assert_eq!(status_of(error), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_validation_maps_to_400() {
        let error = AppError::Validation {
            field: "keyword".to_string(),
            reason: "must not be empty".to_string(),
        };
        assert_eq!(status_of(error), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unauthorized_maps_to_401() {
        let error = AppError::Unauthorized {
            message: "token expired".to_string(),
        };
        assert_eq!(status_of(error), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_upstream_maps_to_500() {
        let error = AppError::Upstream {
            service: "mattermost".to_string(),
            message: "webhook returned 500".to_string(),
            source: None,
        };
        assert_eq!(status_of(error), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_internal_maps_to_500() {
        let error = AppError::Internal {
            source: anyhow::anyhow!("boom"),
        };
        assert_eq!(status_of(error), StatusCode::INTERNAL_SERVER_ERROR);
    }

    mod correlation {
        use axum::{Router, middleware, routing::get};
        use serde_json::Value as JsonValue;
        use tower::util::ServiceExt;

        use super::super::*;
        use crate::api::middleware::request_id_middleware;
        use crate::error::AppResult;

        async fn failing() -> AppResult<Json<()>> {
            Err(AppError::BadRequest {
                message: "invalid JSON body".to_string(),
            })
        }

        async fn succeeding() -> Json<serde_json::Value> {
            Json(serde_json::json!({ "status": "ok" }))
        }

        fn app() -> Router {
            Router::new()
                .route("/fail", get(failing))
                .route("/ok", get(succeeding))
                .layer(middleware::from_fn(error_correlation_middleware))
                .layer(middleware::from_fn(request_id_middleware))
        }

        async fn body_value(response: Response) -> JsonValue {
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            serde_json::from_slice(&bytes).unwrap()
        }

        #[tokio::test]
        async fn test_error_body_carries_provided_request_id() {
            let response = app()
                .oneshot(
                    Request::builder()
                        .uri("/fail")
                        .header("x-request-id", "req-abc-123")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let error = body_value(response).await;
            assert_eq!(error["code"], "BAD_REQUEST");
            assert_eq!(error["request_id"], "req-abc-123");
        }

        #[tokio::test]
        async fn test_error_body_matches_response_header() {
            let response = app()
                .oneshot(Request::builder().uri("/fail").body(Body::empty()).unwrap())
                .await
                .unwrap();

            let header_id = response
                .headers()
                .get("x-request-id")
                .unwrap()
                .to_str()
                .unwrap()
                .to_string();
            let error = body_value(response).await;
            assert_eq!(error["request_id"], header_id);
        }

        #[tokio::test]
        async fn test_success_body_is_untouched() {
            let response = app()
                .oneshot(Request::builder().uri("/ok").body(Body::empty()).unwrap())
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK);
            let body = body_value(response).await;
            assert_eq!(body["status"], "ok");
            assert!(body.get("request_id").is_none());
        }
    }
}
