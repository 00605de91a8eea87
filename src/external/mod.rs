//! Clients for the upstream HTTP APIs the two services forward to.

pub mod client;
pub mod cloud;
pub mod mattermost;
pub mod search;
