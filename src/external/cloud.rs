//! Cloud-drive add API client with token acquisition.
//!
//! The add endpoint requires an Authorization header. Depending on
//! configuration the credential is either a static token or a bearer token
//! obtained from a login endpoint and cached until shortly before its
//! server-declared expiry.

use std::sync::Arc;
use std::time::Duration;

use jiff::{SignedDuration, Timestamp};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{Value as JsonValue, json};

use crate::config::GatewayConfig;
use crate::error::{AppError, AppResult};
use crate::external::client::build_http_client;
use crate::services::{IssuedToken, TokenCache};

/// Authorization source for the add API.
#[derive(Debug, Clone)]
enum Credential {
    /// Token sent verbatim from configuration
    Static(String),
    /// Username/password exchanged for a bearer token at the login endpoint
    Login { username: String, password: String },
}

/// An add-resource task as submitted by the form page.
#[derive(Debug, Clone)]
pub struct AddTask {
    pub local_path: String,
    pub share_code: String,
    pub share_access_code: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    token_type: Option<String>,
    access_token: Option<String>,
    #[serde(default)]
    expires_in: i64,
}

#[derive(Clone)]
pub struct CloudDriveClient {
    http: reqwest::Client,
    config: GatewayConfig,
    credential: Credential,
    tokens: Arc<TokenCache>,
}

impl CloudDriveClient {
    pub fn new(config: GatewayConfig) -> Self {
        let http = build_http_client(Duration::from_secs(config.timeout_secs));
        let credential = match config.auth_token.as_deref().filter(|t| !t.is_empty()) {
            Some(token) => Credential::Static(token.to_string()),
            None => Credential::Login {
                username: config.username.clone().unwrap_or_default(),
                password: config.password.clone().unwrap_or_default(),
            },
        };
        Self {
            http,
            config,
            credential,
            tokens: Arc::new(TokenCache::new()),
        }
    }

    fn make_error(message: impl Into<String>, source: Option<anyhow::Error>) -> AppError {
        AppError::Upstream {
            service: "cloud-drive".into(),
            message: message.into(),
            source,
        }
    }

    /// Credential mode label for the token-status debug endpoint.
    pub fn credential_mode(&self) -> &'static str {
        match self.credential {
            Credential::Static(_) => "static",
            Credential::Login { .. } => "login",
        }
    }

    /// Expiry of the cached token, when one is present.
    pub async fn token_status(&self) -> Option<Timestamp> {
        self.tokens.status().await
    }

    /// Submits an add-resource request and returns the success message.
    ///
    /// A response carrying an `id` field means the resource was accepted;
    /// anything else surfaces the upstream message as a failure. A 401
    /// invalidates the cached token so the next request logs in again.
    pub async fn add(&self, task: &AddTask) -> AppResult<String> {
        let authorization = self.authorization().await?;

        let payload = json!({
            "localPath": task.local_path,
            "protocol": "share",
            "cloudToken": 1,
            "shareCode": task.share_code,
            "shareAccessCode": task.share_access_code,
        });

        let resp = self
            .http
            .post(&self.config.add_api_url)
            .header("Authorization", &authorization)
            .json(&payload)
            .send()
            .await
            .map_err(|e: reqwest::Error| {
                Self::make_error(format!("add request failed: {}", e), Some(e.into()))
            })?;

        if resp.status() == StatusCode::UNAUTHORIZED {
            self.tokens.invalidate().await;
            return Err(Self::make_error("add rejected: authorization expired", None));
        }

        let resp = resp.error_for_status().map_err(|e: reqwest::Error| {
            Self::make_error(format!("add HTTP error: {}", e), Some(e.into()))
        })?;

        let body: JsonValue = resp.json().await.map_err(|e: reqwest::Error| {
            Self::make_error(format!("add response invalid JSON: {}", e), Some(e.into()))
        })?;

        match body.get("id") {
            Some(id) => Ok(format!("Resource added, id: {}", id)),
            None => {
                let message = body
                    .get("message")
                    .and_then(|m| m.as_str())
                    .unwrap_or("add request failed");
                Err(Self::make_error(message.to_string(), None))
            }
        }
    }

    /// Resolves the Authorization header value for the add call.
    async fn authorization(&self) -> AppResult<String> {
        match &self.credential {
            Credential::Static(token) => Ok(token.clone()),
            Credential::Login { .. } => self.tokens.get_or_refresh(|| self.login()).await,
        }
    }

    /// Exchanges the configured username/password for a bearer token.
    ///
    /// The cached expiry is the server-declared TTL minus the configured
    /// safety margin.
    async fn login(&self) -> AppResult<IssuedToken> {
        let (username, password) = match &self.credential {
            Credential::Login { username, password } => (username, password),
            Credential::Static(_) => {
                return Err(Self::make_error("login attempted with static credential", None));
            }
        };

        let login_url = self.config.login_api_url.as_deref().ok_or_else(|| {
            AppError::Configuration {
                key: "gateway.login_api_url".to_string(),
                source: anyhow::anyhow!("login endpoint not configured"),
            }
        })?;

        let resp = self
            .http
            .post(login_url)
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .map_err(|e: reqwest::Error| {
                Self::make_error(format!("login request failed: {}", e), Some(e.into()))
            })?
            .error_for_status()
            .map_err(|e: reqwest::Error| {
                Self::make_error(format!("login HTTP error: {}", e), Some(e.into()))
            })?;

        let data: LoginResponse = resp.json().await.map_err(|e: reqwest::Error| {
            Self::make_error(format!("login response invalid JSON: {}", e), Some(e.into()))
        })?;

        let (token_type, access_token) = match (data.token_type, data.access_token) {
            (Some(t), Some(a)) if !a.is_empty() => (t, a),
            _ => return Err(Self::make_error("login response missing token", None)),
        };

        let ttl = data.expires_in - self.config.token_ttl_margin_secs;
        let expires_at = Timestamp::now() + SignedDuration::from_secs(ttl);

        tracing::info!(expires_in = data.expires_in, "login token acquired");

        Ok(IssuedToken {
            value: format!("{} {}", token_type, access_token),
            expires_at,
        })
    }
}
