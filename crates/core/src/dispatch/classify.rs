//! Status classification and dispatch errors

use std::fmt;
use std::time::Duration;

use beaconlink_common::{ErrorClassification, ErrorSeverity};
use beaconlink_domain::BeaconLinkError;
use thiserror::Error;

use crate::transport::TransportError;

/// How the dispatcher treats an HTTP status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// Handed back to the caller as a response
    Completed,
    /// 4xx, returned immediately
    Terminal,
    /// 5xx, retried within the budget
    Retryable,
}

pub fn classify_status(status: u16) -> StatusClass {
    match status {
        400..=499 => StatusClass::Terminal,
        500..=599 => StatusClass::Retryable,
        _ => StatusClass::Completed,
    }
}

/// Why a single attempt failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptError {
    Status(u16),
    Transport(TransportError),
}

impl fmt::Display for AttemptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(status) => write!(f, "server returned HTTP {status}"),
            Self::Transport(err) => write!(f, "{err}"),
        }
    }
}

/// Final failure of one dispatched call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// 4xx; `body` is the server's response text, possibly empty
    #[error("Server rejected request (HTTP {status})")]
    ClientRejected { status: u16, body: String },

    #[error("Request failed after {attempts} attempts: {last_error}")]
    Exhausted { attempts: u32, last_error: AttemptError },

    #[error("Request cancelled")]
    Cancelled,

    /// Transport failure that retrying cannot fix
    #[error("Request could not be sent: {0}")]
    Invalid(TransportError),
}

impl ErrorClassification for DispatchError {
    fn is_retryable(&self) -> bool {
        matches!(self, Self::Exhausted { .. })
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Cancelled => ErrorSeverity::Info,
            Self::Exhausted { .. } => ErrorSeverity::Warning,
            Self::ClientRejected { .. } | Self::Invalid(_) => ErrorSeverity::Error,
        }
    }

    fn is_critical(&self) -> bool {
        false
    }

    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

impl From<DispatchError> for BeaconLinkError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::ClientRejected { status, body } => Self::rejected(status, body),
            DispatchError::Exhausted { .. } => Self::Transient(err.to_string()),
            DispatchError::Cancelled => Self::Cancelled,
            DispatchError::Invalid(inner) => Self::Config(inner.to_string()),
        }
    }
}
