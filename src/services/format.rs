//! Notification message assembly.
//!
//! Turns a normalized [`NotificationRequest`] into the Markdown text payload
//! accepted by Mattermost incoming webhooks. Fields are rendered in a fixed
//! order; a field contributes a line only when it is present and non-empty.

use crate::api::dto::NotificationRequest;

/// Priority markers, keyed by the Bark interruption level.
const MARKER_ACTIVE: &str = "🔴 High priority";
const MARKER_TIME_SENSITIVE: &str = "🟡 Time sensitive";
const MARKER_PASSIVE: &str = "⚪ Low priority";
const MARKER_OTHER: &str = "🔔 Notification";

/// Message payload for the outbound webhook call.
///
/// Built deterministically from a [`NotificationRequest`]; absence (a `None`
/// from [`build_message`]) means there is nothing to send and the delivery is
/// a no-op, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub text: String,
}

/// Maps an interruption level to its priority marker line.
fn priority_marker(level: &str) -> &'static str {
    match level {
        "active" => MARKER_ACTIVE,
        "timeSensitive" => MARKER_TIME_SENSITIVE,
        "passive" => MARKER_PASSIVE,
        _ => MARKER_OTHER,
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

/// Builds the outbound Markdown message from a notification request.
///
/// Line order: priority marker, bold title, body, link, badge, copy payload
/// (inline code), sound, group tag. Returns `None` when no field produces a
/// line, which signals "skip send".
pub fn build_message(req: &NotificationRequest) -> Option<OutboundMessage> {
    let mut lines: Vec<String> = Vec::new();

    if let Some(level) = non_empty(&req.level) {
        lines.push(priority_marker(level).to_string());
    }
    if let Some(title) = non_empty(&req.title) {
        lines.push(format!("**{}**", title));
    }
    if let Some(body) = non_empty(&req.body) {
        lines.push(body.to_string());
    }
    if let Some(url) = non_empty(&req.url) {
        lines.push(format!("🔗 [{}]({})", url, url));
    }
    if let Some(badge) = non_empty(&req.badge) {
        lines.push(format!("🔢 Badge: {}", badge));
    }
    if let Some(copy) = non_empty(&req.copy) {
        lines.push(format!("📋 `{}`", copy));
    }
    if let Some(sound) = non_empty(&req.sound) {
        lines.push(format!("🔊 {}", sound));
    }
    if let Some(group) = non_empty(&req.group) {
        lines.push(format!("#{}", group));
    }

    if lines.is_empty() {
        return None;
    }

    Some(OutboundMessage {
        text: lines.join("\n"),
    })
}
