//! Cloud-search API client.
//!
//! Posts a fixed-shape keyword query and extracts the provider-specific
//! result list from the upstream envelope.

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;
use serde_json::{Value as JsonValue, json};

use crate::config::GatewayConfig;
use crate::error::{AppError, AppResult};
use crate::external::client::build_http_client;

/// Cloud provider filter sent with every query and used to pick the
/// result bucket out of the response.
const PROVIDER: &str = "tianyi";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<SearchData>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchData {
    #[serde(default)]
    merged_by_type: HashMap<String, Vec<JsonValue>>,
}

#[derive(Clone)]
pub struct SearchClient {
    http: reqwest::Client,
    config: GatewayConfig,
}

impl SearchClient {
    pub fn new(config: GatewayConfig) -> Self {
        let http = build_http_client(Duration::from_secs(config.timeout_secs));
        Self { http, config }
    }

    fn make_error(message: impl Into<String>, source: Option<anyhow::Error>) -> AppError {
        AppError::Upstream {
            service: "search".into(),
            message: message.into(),
            source,
        }
    }

    /// Runs a keyword search and returns the provider's result list.
    ///
    /// An upstream `code != 0` envelope is an error carrying the upstream
    /// message; a success envelope without the provider bucket yields an
    /// empty list.
    pub async fn search(&self, keyword: &str) -> AppResult<Vec<JsonValue>> {
        let payload = json!({
            "kw": keyword,
            "cloud_types": [PROVIDER],
        });

        let resp = self
            .http
            .post(&self.config.search_api_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e: reqwest::Error| {
                Self::make_error(format!("search request failed: {}", e), Some(e.into()))
            })?
            .error_for_status()
            .map_err(|e: reqwest::Error| {
                Self::make_error(format!("search HTTP error: {}", e), Some(e.into()))
            })?;

        let data: SearchResponse = resp.json().await.map_err(|e: reqwest::Error| {
            Self::make_error(format!("search response invalid JSON: {}", e), Some(e.into()))
        })?;

        if data.code != 0 {
            let message = data
                .message
                .unwrap_or_else(|| format!("search API error code: {}", data.code));
            return Err(Self::make_error(message, None));
        }

        Ok(data
            .data
            .unwrap_or_default()
            .merged_by_type
            .remove(PROVIDER)
            .unwrap_or_default())
    }
}
