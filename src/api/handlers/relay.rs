//! Handlers for the notification relay service.
//!
//! Accepts Bark-style pushes in every shape the clients send them: JSON
//! bodies on `/push` and `/webhook`, per-device JSON on `/{device_key}`,
//! and GET pushes with the title/body in query parameters or path segments.
//! Inputs are merged with JSON body over path segments over query
//! parameters, formatted into Markdown, and forwarded to Mattermost.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
};
use tracing::debug;

use crate::api::dto::{NotificationRequest, PushAck, ServiceStatus};
use crate::error::{AppError, AppResult};
use crate::services::build_message;
use crate::state::RelayState;

/// GET / - liveness envelope.
pub async fn service_status() -> Json<ServiceStatus> {
    Json(ServiceStatus::running("bark-mattermost-relay"))
}

/// POST /push and POST /webhook - JSON body push.
pub async fn push_json(
    State(state): State<RelayState>,
    Query(query): Query<NotificationRequest>,
    body: Bytes,
) -> AppResult<Json<PushAck>> {
    let request = parse_body(&body)?.merge_over(query);
    dispatch(&state, request).await
}

/// POST /{device_key} - JSON body push with the device key in the path.
pub async fn push_device_json(
    State(state): State<RelayState>,
    Path(device_key): Path<String>,
    Query(query): Query<NotificationRequest>,
    body: Bytes,
) -> AppResult<Json<PushAck>> {
    let request = parse_body(&body)?.merge_over(from_path(device_key, None, None).merge_over(query));
    dispatch(&state, request).await
}

/// GET /{device_key} - push with everything in query parameters.
pub async fn push_query(
    State(state): State<RelayState>,
    Path(device_key): Path<String>,
    Query(query): Query<NotificationRequest>,
) -> AppResult<Json<PushAck>> {
    let request = from_path(device_key, None, None).merge_over(query);
    dispatch(&state, request).await
}

/// GET /{device_key}/{title} - title in the path.
pub async fn push_path_title(
    State(state): State<RelayState>,
    Path((device_key, title)): Path<(String, String)>,
    Query(query): Query<NotificationRequest>,
) -> AppResult<Json<PushAck>> {
    let request = from_path(device_key, Some(title), None).merge_over(query);
    dispatch(&state, request).await
}

/// GET /{device_key}/{title}/{*body} - title and body in the path. The body
/// segment may itself contain slashes.
pub async fn push_path_body(
    State(state): State<RelayState>,
    Path((device_key, title, body)): Path<(String, String, String)>,
    Query(query): Query<NotificationRequest>,
) -> AppResult<Json<PushAck>> {
    let request = from_path(device_key, Some(title), Some(body)).merge_over(query);
    dispatch(&state, request).await
}

/// Parses a JSON request body into a notification, treating an empty body
/// as an empty notification. Malformed JSON is a client error.
fn parse_body(body: &Bytes) -> AppResult<NotificationRequest> {
    if body.is_empty() {
        return Ok(NotificationRequest::default());
    }
    serde_json::from_slice(body).map_err(|e| AppError::BadRequest {
        message: format!("invalid JSON body: {}", e),
    })
}

fn from_path(
    device_key: String,
    title: Option<String>,
    body: Option<String>,
) -> NotificationRequest {
    NotificationRequest {
        device_key: Some(device_key),
        title,
        body,
        ..Default::default()
    }
}

/// Formats the merged notification and forwards it.
///
/// A notification with no renderable content acknowledges without an
/// outbound call.
async fn dispatch(state: &RelayState, request: NotificationRequest) -> AppResult<Json<PushAck>> {
    let Some(message) = build_message(&request) else {
        debug!("notification carries no content, skipping forward");
        return Ok(Json(PushAck::ok("nothing to forward")));
    };

    let target = state.mattermost.resolve_target(request.device_key.as_deref())?;
    state.mattermost.forward(&target, &message).await?;

    Ok(Json(PushAck::ok("forwarded")))
}
