//! Router configuration for the two services.
//!
//! Each service gets its own router so a process only exposes the routes
//! of the service it was started as.

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;

use crate::api::handlers::{gateway, relay};
use crate::api::middleware::{
    error_correlation_middleware, logging_middleware, request_id_middleware,
};
use crate::state::{GatewayState, RelayState};

/// Creates the notification relay router.
///
/// # Routes
/// - `GET /` - liveness envelope
/// - `POST /push`, `POST /webhook` - JSON body push
/// - `POST /{device_key}` - JSON body push, key in the path
/// - `GET /{device_key}` - query-parameter push
/// - `GET /{device_key}/{title}` - title in the path
/// - `GET /{device_key}/{title}/{*body}` - title and body in the path
///
/// Middleware is applied in reverse order of declaration, so request IDs
/// are assigned before the logging middleware reads them.
pub fn relay_router(state: RelayState) -> Router {
    Router::new()
        .route("/", get(relay::service_status))
        .route("/push", post(relay::push_json))
        .route("/webhook", post(relay::push_json))
        .route(
            "/{device_key}",
            get(relay::push_query).post(relay::push_device_json),
        )
        .route("/{device_key}/{title}", get(relay::push_path_title))
        .route("/{device_key}/{title}/{*body}", get(relay::push_path_body))
        .layer(middleware::from_fn(error_correlation_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

/// Creates the cloud gateway router.
///
/// # Routes
/// - `GET /` - embedded form page
/// - `POST /search` - form-encoded keyword search
/// - `POST /add` - JSON add-resource request
/// - `GET /health` - liveness envelope
/// - `GET /token-status` - cached login token debug view
///
/// CORS is open so the form page can be served from elsewhere during
/// development.
pub fn gateway_router(state: GatewayState) -> Router {
    Router::new()
        .route("/", get(gateway::index))
        .route("/search", post(gateway::search))
        .route("/add", post(gateway::add))
        .route("/health", get(gateway::health))
        .route("/token-status", get(gateway::token_status))
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn(error_correlation_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
