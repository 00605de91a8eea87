//! Configuration settings structures for hookrelay
//!
//! This module defines all configuration structures that can be loaded from
//! TOML files and environment variables.

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;
use crate::logger::LoggerConfig;

// ============================================================================
// Default value functions
// ============================================================================

fn default_app_name() -> String {
    "hookrelay".to_string()
}

fn default_app_version() -> String {
    crate::pkg_version().to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_relay_timeout() -> u64 {
    10
}

fn default_gateway_timeout() -> u64 {
    30
}

fn default_token_ttl_margin() -> i64 {
    300
}

// ============================================================================
// Application Configuration
// ============================================================================

/// Application basic information configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Application name
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Application version
    #[serde(default = "default_app_version")]
    pub version: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            version: default_app_version(),
        }
    }
}

// ============================================================================
// Server Configuration
// ============================================================================

/// Axum HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    /// Get the full server address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

// ============================================================================
// Relay Configuration
// ============================================================================

/// Notification relay configuration.
///
/// The relay supports two outbound target modes:
/// - a single fixed webhook URL (`webhook_url`)
/// - per-device routing (`base_url` + `/hooks/` + device key)
///
/// Environment overrides: `HOOKRELAY_RELAY__WEBHOOK_URL`,
/// `HOOKRELAY_RELAY__BASE_URL`, `HOOKRELAY_RELAY__TIMEOUT_SECS`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Fixed Mattermost incoming webhook URL
    #[serde(default)]
    pub webhook_url: Option<String>,

    /// Mattermost base URL for per-device webhook routing
    #[serde(default)]
    pub base_url: Option<String>,

    /// Outbound webhook call timeout in seconds
    #[serde(default = "default_relay_timeout")]
    pub timeout_secs: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            base_url: None,
            timeout_secs: default_relay_timeout(),
        }
    }
}

impl RelayConfig {
    /// Validates the relay configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let has_fixed = self.webhook_url.as_deref().is_some_and(|u| !u.is_empty());
        let has_base = self.base_url.as_deref().is_some_and(|u| !u.is_empty());
        if !has_fixed && !has_base {
            return Err(ConfigError::validation(
                "relay.webhook_url",
                "either relay.webhook_url or relay.base_url must be set",
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Gateway Configuration
// ============================================================================

/// Search/add gateway configuration.
///
/// Credentials for the add API are either a static `auth_token` or a
/// username/password pair exchanged for a bearer token at `login_api_url`.
///
/// Environment overrides: `HOOKRELAY_GATEWAY__SEARCH_API_URL`,
/// `HOOKRELAY_GATEWAY__ADD_API_URL`, `HOOKRELAY_GATEWAY__AUTH_TOKEN`,
/// `HOOKRELAY_GATEWAY__LOGIN_API_URL`, `HOOKRELAY_GATEWAY__USERNAME`,
/// `HOOKRELAY_GATEWAY__PASSWORD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Upstream cloud-search API endpoint
    #[serde(default)]
    pub search_api_url: String,

    /// Upstream add-resource API endpoint
    #[serde(default)]
    pub add_api_url: String,

    /// Login endpoint for dynamic bearer token acquisition
    #[serde(default)]
    pub login_api_url: Option<String>,

    /// Static authorization token (sent verbatim in the Authorization header)
    #[serde(default)]
    pub auth_token: Option<String>,

    /// Login username for dynamic token acquisition
    #[serde(default)]
    pub username: Option<String>,

    /// Login password for dynamic token acquisition
    #[serde(default)]
    pub password: Option<String>,

    /// Upstream call timeout in seconds
    #[serde(default = "default_gateway_timeout")]
    pub timeout_secs: u64,

    /// Safety margin subtracted from the server-declared token TTL, in seconds
    #[serde(default = "default_token_ttl_margin")]
    pub token_ttl_margin_secs: i64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            search_api_url: String::new(),
            add_api_url: String::new(),
            login_api_url: None,
            auth_token: None,
            username: None,
            password: None,
            timeout_secs: default_gateway_timeout(),
            token_ttl_margin_secs: default_token_ttl_margin(),
        }
    }
}

impl GatewayConfig {
    /// Whether the gateway is configured for dynamic token login
    pub fn uses_login(&self) -> bool {
        self.auth_token.as_deref().is_none_or(|t| t.is_empty())
    }

    /// Validates the gateway configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search_api_url.is_empty() {
            return Err(ConfigError::validation(
                "gateway.search_api_url",
                "search API URL must be set",
            ));
        }
        if self.add_api_url.is_empty() {
            return Err(ConfigError::validation(
                "gateway.add_api_url",
                "add API URL must be set",
            ));
        }

        if self.uses_login() {
            let complete = self.login_api_url.as_deref().is_some_and(|u| !u.is_empty())
                && self.username.as_deref().is_some_and(|u| !u.is_empty())
                && self.password.as_deref().is_some_and(|p| !p.is_empty());
            if !complete {
                return Err(ConfigError::validation(
                    "gateway.auth_token",
                    "either gateway.auth_token or the full login_api_url/username/password triple must be set",
                ));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Root Settings
// ============================================================================

/// Root configuration structure aggregating all sections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Application metadata
    #[serde(default)]
    pub application: ApplicationConfig,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Logger settings
    #[serde(default)]
    pub logger: LoggerConfig,

    /// Notification relay settings
    #[serde(default)]
    pub relay: RelayConfig,

    /// Search/add gateway settings
    #[serde(default)]
    pub gateway: GatewayConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.server.address(), "127.0.0.1:3000");
        assert_eq!(settings.relay.timeout_secs, 10);
        assert_eq!(settings.gateway.timeout_secs, 30);
        assert_eq!(settings.gateway.token_ttl_margin_secs, 300);
        assert_eq!(settings.application.name, "hookrelay");
    }

    #[test]
    fn test_relay_validate_requires_target() {
        let config = RelayConfig::default();
        assert!(config.validate().is_err());

        let config = RelayConfig {
            webhook_url: Some("https://mm.example.com/hooks/key".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        let config = RelayConfig {
            base_url: Some("https://mm.example.com".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_gateway_validate_requires_urls() {
        let config = GatewayConfig {
            auth_token: Some("token".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_gateway_validate_static_token() {
        let config = GatewayConfig {
            search_api_url: "https://api.example.com/search".to_string(),
            add_api_url: "https://api.example.com/add".to_string(),
            auth_token: Some("token".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        assert!(!config.uses_login());
    }

    #[test]
    fn test_gateway_validate_login_triple() {
        let mut config = GatewayConfig {
            search_api_url: "https://api.example.com/search".to_string(),
            add_api_url: "https://api.example.com/add".to_string(),
            login_api_url: Some("https://api.example.com/login".to_string()),
            username: Some("user".to_string()),
            ..Default::default()
        };
        // Missing password
        assert!(config.validate().is_err());

        config.password = Some("secret".to_string());
        assert!(config.validate().is_ok());
        assert!(config.uses_login());
    }

    #[test]
    fn test_settings_deserialize_empty() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
    }
}
