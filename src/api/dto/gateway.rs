//! Search/add gateway DTOs.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Form-encoded search request from the web front end.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub keyword: String,
}

/// JSON add-resource request from the web front end.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddRequest {
    pub local_path: String,
    pub share_code: String,
    pub share_access_code: String,
}

/// Uniform gateway envelope: `{success, message?, results?}`.
///
/// Upstream and client errors are surfaced through this envelope with
/// HTTP 200, matching the contract the form page expects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<JsonValue>>,
}

impl ApiResponse {
    /// Success envelope carrying search results.
    pub fn results(results: Vec<JsonValue>) -> Self {
        Self {
            success: true,
            message: None,
            results: Some(results),
        }
    }

    /// Success envelope carrying a message.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            results: None,
        }
    }

    /// Failure envelope carrying a message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            results: None,
        }
    }
}

/// Debug view of the token cache for `GET /token-status`.
#[derive(Debug, Clone, Serialize)]
pub struct TokenStatus {
    /// Credential mode: `static` or `login`
    pub mode: &'static str,
    pub cached: bool,
    /// RFC 3339 expiry of the cached token, when one is present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
}

impl TokenStatus {
    pub fn new(mode: &'static str, expires_at: Option<Timestamp>) -> Self {
        Self {
            mode,
            cached: expires_at.is_some(),
            expires_at: expires_at.map(|t| t.to_string()),
        }
    }
}
