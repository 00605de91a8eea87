//! Mattermost incoming webhook client.
//!
//! Resolves the outbound target (fixed URL or per-device `/hooks/{key}`) and
//! posts the assembled Markdown message. Failures are surfaced to the caller;
//! there are no retries.

use std::time::Duration;

use serde_json::json;

use crate::config::RelayConfig;
use crate::error::{AppError, AppResult};
use crate::external::client::build_http_client;
use crate::services::OutboundMessage;

#[derive(Clone)]
pub struct MattermostClient {
    http: reqwest::Client,
    config: RelayConfig,
}

impl MattermostClient {
    /// Creates a new client with the relay's outbound timeout.
    pub fn new(config: RelayConfig) -> Self {
        let http = build_http_client(Duration::from_secs(config.timeout_secs));
        Self { http, config }
    }

    fn make_error(message: impl Into<String>, source: Option<anyhow::Error>) -> AppError {
        AppError::Upstream {
            service: "mattermost".into(),
            message: message.into(),
            source,
        }
    }

    /// Resolves the outbound webhook URL for a request.
    ///
    /// Per-device routing applies when a base URL is configured and the
    /// request carries a non-empty device key; otherwise the fixed webhook
    /// URL is used. Neither configured is a configuration error.
    pub fn resolve_target(&self, device_key: Option<&str>) -> AppResult<String> {
        if let Some(base) = self.config.base_url.as_deref().filter(|b| !b.is_empty())
            && let Some(key) = device_key.filter(|k| !k.is_empty())
        {
            return Ok(format!("{}/hooks/{}", base.trim_end_matches('/'), key));
        }

        if let Some(url) = self.config.webhook_url.as_deref().filter(|u| !u.is_empty()) {
            return Ok(url.to_string());
        }

        Err(AppError::Configuration {
            key: "relay.webhook_url".to_string(),
            source: anyhow::anyhow!("no outbound webhook target configured"),
        })
    }

    /// Posts the message to the resolved webhook URL.
    pub async fn forward(&self, target: &str, message: &OutboundMessage) -> AppResult<()> {
        let resp = self
            .http
            .post(target)
            .header("Content-Type", "application/json")
            .json(&json!({ "text": message.text }))
            .send()
            .await
            .map_err(|e: reqwest::Error| {
                Self::make_error(format!("webhook request failed: {}", e), Some(e.into()))
            })?;

        resp.error_for_status().map_err(|e: reqwest::Error| {
            Self::make_error(format!("webhook HTTP error: {}", e), Some(e.into()))
        })?;

        Ok(())
    }
}
