//! Startup error types

use std::net::{AddrParseError, SocketAddr};

/// Failures that stop the server before it starts serving.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid listen address '{addr}': {source}")]
    InvalidAddress {
        addr: String,
        #[source]
        source: AddrParseError,
    },
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),
    #[error("failed to initialise logger: {0}")]
    Logger(#[source] std::io::Error),
}
