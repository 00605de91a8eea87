//! Hookrelay Library
//!
//! Core library modules for the hookrelay push relay services.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod external;
pub mod logger;
pub mod server;
pub mod services;
pub mod state;

pub use state::{GatewayState, RelayState};

pub fn pkg_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
