//! Shared per-service application state.

use crate::config::{GatewayConfig, RelayConfig};
use crate::external::cloud::CloudDriveClient;
use crate::external::mattermost::MattermostClient;
use crate::external::search::SearchClient;

/// State for the notification relay service.
#[derive(Clone)]
pub struct RelayState {
    pub mattermost: MattermostClient,
}

impl RelayState {
    pub fn new(config: RelayConfig) -> Self {
        Self {
            mattermost: MattermostClient::new(config),
        }
    }
}

/// State for the cloud gateway service.
#[derive(Clone)]
pub struct GatewayState {
    pub search: SearchClient,
    pub cloud: CloudDriveClient,
}

impl GatewayState {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            search: SearchClient::new(config.clone()),
            cloud: CloudDriveClient::new(config),
        }
    }
}
