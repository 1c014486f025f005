//! Error types used throughout the network core

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{EXPIRED_SENTINEL, MSG_GENERIC_REJECTION};

/// Main error type for BeaconLink
///
/// Every failure that crosses the dispatcher or controller boundary is
/// converted into one of these variants; raw transport errors never reach
/// the state machine.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum BeaconLinkError {
    /// Empty or invalid endpoint, missing username, bad settings
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connectivity probe failed
    #[error("Server unreachable: {0}")]
    Unreachable(String),

    /// HTTP 4xx, never retried
    #[error("Request rejected ({status}): {message}")]
    ClientRejected { status: u16, message: String },

    /// HTTP 5xx or transport failure after the retry budget ran out
    #[error("Transient failure: {0}")]
    Transient(String),

    /// 2xx response that did not carry the expected payload
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// No valid cached token; callers re-authenticate instead of surfacing it
    #[error("Expired")]
    TokenExpired,

    /// Superseded by a reconfiguration
    #[error("Operation cancelled")]
    Cancelled,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl BeaconLinkError {
    /// Build a client rejection, falling back to a generic message for empty bodies
    pub fn rejected(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        let message =
            if body.trim().is_empty() { MSG_GENERIC_REJECTION.to_string() } else { body };
        Self::ClientRejected { status, message }
    }

    /// Whether retrying the same request may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient(_))
    }

    /// Whether the server refused the bearer token
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::ClientRejected { status: 401, .. })
    }

    /// Human-readable text for a failure banner
    pub fn user_message(&self) -> String {
        match self {
            Self::Config(msg)
            | Self::Unreachable(msg)
            | Self::Transient(msg)
            | Self::MalformedResponse(msg)
            | Self::Storage(msg)
            | Self::Internal(msg) => msg.clone(),
            Self::ClientRejected { message, .. } => message.clone(),
            Self::TokenExpired => EXPIRED_SENTINEL.to_string(),
            Self::Cancelled => "Cancelled".to_string(),
        }
    }
}

/// Result type alias for BeaconLink operations
pub type Result<T> = std::result::Result<T, BeaconLinkError>;
