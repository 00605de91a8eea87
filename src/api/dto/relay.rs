//! Notification relay DTOs.

use jiff::Timestamp;
use serde::{Deserialize, Deserializer, Serialize};

/// A normalized inbound push notification.
///
/// All fields are optional strings; the same struct deserializes from query
/// parameters and from JSON bodies. Numeric and boolean JSON values for
/// `badge`, `autoCopy` and `isArchive` are coerced to strings, since Bark
/// clients send them both ways.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationRequest {
    pub title: Option<String>,
    pub body: Option<String>,
    pub url: Option<String>,
    pub group: Option<String>,
    pub icon: Option<String>,
    pub level: Option<String>,
    #[serde(deserialize_with = "de_opt_scalar")]
    pub badge: Option<String>,
    #[serde(deserialize_with = "de_opt_scalar")]
    pub auto_copy: Option<String>,
    pub copy: Option<String>,
    pub sound: Option<String>,
    #[serde(deserialize_with = "de_opt_scalar")]
    pub is_archive: Option<String>,
    pub device_key: Option<String>,
}

fn pick(over: Option<String>, base: Option<String>) -> Option<String> {
    match over {
        Some(value) if !value.is_empty() => Some(value),
        _ => base,
    }
}

impl NotificationRequest {
    /// Merges `self` over `base`: a field from `self` wins when it is present
    /// and non-empty, otherwise the base value is kept.
    ///
    /// Canonical input-shape precedence is JSON body over path segments over
    /// query parameters; callers build the chain in that order.
    pub fn merge_over(self, base: Self) -> Self {
        Self {
            title: pick(self.title, base.title),
            body: pick(self.body, base.body),
            url: pick(self.url, base.url),
            group: pick(self.group, base.group),
            icon: pick(self.icon, base.icon),
            level: pick(self.level, base.level),
            badge: pick(self.badge, base.badge),
            auto_copy: pick(self.auto_copy, base.auto_copy),
            copy: pick(self.copy, base.copy),
            sound: pick(self.sound, base.sound),
            is_archive: pick(self.is_archive, base.is_archive),
            device_key: pick(self.device_key, base.device_key),
        }
    }
}

/// Accepts a string, number or boolean and yields its string form.
fn de_opt_scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Int(i64),
        Float(f64),
        Bool(bool),
    }

    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|scalar| match scalar {
        Scalar::Text(text) => text,
        Scalar::Int(n) => n.to_string(),
        Scalar::Float(f) => f.to_string(),
        Scalar::Bool(b) => b.to_string(),
    }))
}

/// Relay success envelope: `{code, message, timestamp}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushAck {
    pub code: u16,
    pub message: String,
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
}

impl PushAck {
    pub fn ok(message: &str) -> Self {
        Self {
            code: 200,
            message: message.to_string(),
            timestamp: Timestamp::now().as_millisecond(),
        }
    }
}

/// Liveness envelope for the service root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub status: String,
    pub service: String,
}

impl ServiceStatus {
    pub fn running(service: &str) -> Self {
        Self {
            status: "running".to_string(),
            service: service.to_string(),
        }
    }
}
