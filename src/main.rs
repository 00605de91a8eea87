use clap::Parser;

use hookrelay::cli::Cli;
use hookrelay::config::ConfigLoader;
use hookrelay::logger::init_logger;
use hookrelay::server::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let loader = match cli.config.clone() {
        Some(file) => ConfigLoader::with_file(file),
        None => ConfigLoader::new()?,
    };
    let mut settings = loader.load()?;
    cli.apply_overrides(&mut settings);

    init_logger(&settings.logger)?;

    Server::new(settings, cli.service_kind()).run().await
}
