//! Stub service error types

use std::net::SocketAddr;
use thiserror::Error;
use volley_config::ConfigError;

/// Errors raised while starting or running the stub service
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid bind address '{address}': {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to load TLS certificate '{cert_file}' with key '{key_file}': {source}")]
    Tls {
        cert_file: String,
        key_file: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Listener stopped unexpectedly: {0}")]
    Io(#[from] std::io::Error),

    #[error("Listener task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for server operations
pub type ServerResult<T> = Result<T, ServerError>;
