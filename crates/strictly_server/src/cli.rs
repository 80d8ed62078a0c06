//! Command-line interface for strictly_server.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Strictly Tables - multi-table text game server
#[derive(Parser, Debug)]
#[command(name = "strictly_server")]
#[command(about = "Multi-table text-protocol game server", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the game server
    Serve {
        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Host to bind to (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,

        /// Strip color markup instead of sending ANSI escapes
        #[arg(long)]
        no_color: bool,
    },

    /// List the games this server hosts
    Games,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_flags() {
        let cli = Cli::parse_from(["strictly_server", "serve", "--port", "4000", "--no-color"]);
        match cli.command {
            Command::Serve {
                config,
                host,
                port,
                no_color,
            } => {
                assert!(config.is_none());
                assert!(host.is_none());
                assert_eq!(port, Some(4000));
                assert!(no_color);
            }
            Command::Games => panic!("expected serve"),
        }
    }

    #[test]
    fn test_games() {
        let cli = Cli::parse_from(["strictly_server", "games"]);
        assert!(matches!(cli.command, Command::Games));
    }
}
