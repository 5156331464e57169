//! # Framework Errors
//!
//! This module defines the common error types used throughout the sync framework.
//! Every failure reaching a caller is one of these variants, and its `Display`
//! output is the message a screen shows to the user.

use crate::gateway::GatewayError;

/// Errors that can occur within the sync framework itself.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum SyncError {
    #[error("Collection actor closed")]
    ActorClosed,
    #[error("Collection actor dropped response channel")]
    ActorDropped,
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error("Unexpected response payload: {0}")]
    Decode(String),
    #[error("{operation} is not supported for {resource}")]
    Unsupported {
        resource: &'static str,
        operation: &'static str,
    },
}

impl SyncError {
    /// Failures caused by the remote side rather than the local plumbing.
    pub fn is_remote(&self) -> bool {
        matches!(self, SyncError::Gateway(_) | SyncError::Decode(_))
    }
}
