//! Strictly Tables server
//!
//! Hosts many tables of turn-based games at once. Players connect over a
//! line-oriented TCP protocol, open tables, watch them and play.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod connection;
pub mod directory;
pub mod error;
pub mod games;
pub mod host;

pub use config::{ConfigError, ServerConfig};
pub use connection::{Flow, Session, run, serve};
pub use directory::{Outbox, PlayerDirectory, TableChannel};
pub use error::HostError;
pub use games::{AnyGame, GameKind};
pub use host::{GameHost, Table};
