//! Command line interface.
//!
//! One binary, one subcommand per service. CLI flags override the
//! corresponding configuration file and environment settings.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Settings;
use crate::server::ServiceKind;

/// HTTP relays for push notifications and cloud drive tasks
#[derive(Parser, Debug)]
#[command(name = "hookrelay", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to a configuration file (overrides the config directory)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity to debug
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the Bark-to-Mattermost notification relay
    Relay {
        /// Bind address override
        #[arg(long)]
        host: Option<String>,

        /// Port override
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Run the cloud search/add gateway
    Gateway {
        /// Bind address override
        #[arg(long)]
        host: Option<String>,

        /// Port override
        #[arg(short, long)]
        port: Option<u16>,
    },
}

impl Cli {
    /// Which service this invocation starts.
    pub fn service_kind(&self) -> ServiceKind {
        match self.command {
            Commands::Relay { .. } => ServiceKind::Relay,
            Commands::Gateway { .. } => ServiceKind::Gateway,
        }
    }

    /// Applies CLI overrides on top of the loaded settings.
    pub fn apply_overrides(&self, settings: &mut Settings) {
        let (host, port) = match &self.command {
            Commands::Relay { host, port } => (host, port),
            Commands::Gateway { host, port } => (host, port),
        };

        if let Some(host) = host {
            settings.server.host = host.clone();
        }
        if let Some(port) = port {
            settings.server.port = *port;
        }
        if self.verbose {
            settings.logger.level = "debug".to_string();
        } else if self.quiet {
            settings.logger.level = "error".to_string();
        }
    }
}
