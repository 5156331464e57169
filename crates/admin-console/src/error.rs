//! Error types for the console clients and binary.

use sync_framework::{GatewayError, SyncError};
use thiserror::Error;

/// Errors surfaced to console screens and the CLI.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConsoleError {
    /// The requested record does not exist on the server.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The API rejected the credentials; the session has to be renewed.
    #[error("Not authorized: {0}")]
    Unauthorized(String),

    /// Any other failure talking to the API or to a collection actor.
    #[error("{0}")]
    Communication(String),

    /// The configuration file or environment is unusable.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<String> for ConsoleError {
    fn from(msg: String) -> Self {
        ConsoleError::Communication(msg)
    }
}

impl From<SyncError> for ConsoleError {
    fn from(e: SyncError) -> Self {
        match e {
            SyncError::Gateway(GatewayError::NotFound(msg)) => ConsoleError::NotFound(msg),
            SyncError::Gateway(GatewayError::Unauthorized(msg)) => ConsoleError::Unauthorized(msg),
            other => ConsoleError::Communication(other.to_string()),
        }
    }
}
