//! Strictly Tables - game server binary

#![warn(missing_docs)]

use anyhow::Result;
use clap::Parser;
use strictly_server::cli::{Cli, Command};
use strictly_server::{GameKind, ServerConfig};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            config,
            host,
            port,
            no_color,
        } => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
                )
                .init();

            let config = match config {
                Some(path) => ServerConfig::from_file(path)?,
                None => ServerConfig::default(),
            }
            .with_overrides(host, port, no_color);
            run_server(config).await
        }
        Command::Games => {
            list_games();
            Ok(())
        }
    }
}

/// Run the TCP game server
#[instrument(skip(config))]
async fn run_server(config: ServerConfig) -> Result<()> {
    info!(addr = %config.bind_address(), "Starting Strictly Tables server");
    strictly_server::serve(config).await
}

fn list_games() {
    for kind in GameKind::all() {
        println!("{:<8} {} [{}]", kind, kind.display_name(), kind.tags().join(" "));
    }
}
