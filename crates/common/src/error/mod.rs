//! Common error types and classification for BeaconLink crates
//!
//! Two building blocks are shared across the workspace:
//!
//! 1. **`CommonError`**: configuration and validation failures that show up
//!    in more than one crate.
//! 2. **`ErrorClassification`**: a uniform way to ask any error whether it is
//!    retryable, how severe it is, and whether a specific delay is suggested.
//!
//! Module-specific errors should compose with `CommonError` rather than
//! duplicate its variants:
//!
//! ```rust,ignore
//! #[derive(Debug, Error)]
//! pub enum DispatchError {
//!     #[error("Server rejected request ({status}): {message}")]
//!     ClientRejected { status: u16, message: String },
//!
//!     #[error(transparent)]
//!     Common(#[from] CommonError),
//! }
//! ```
//!
//! ## ErrorSeverity Levels
//!
//! | Level | Use Case |
//! |-------|----------|
//! | **Info** | Expected conditions (cancelled work, empty results) |
//! | **Warning** | Degraded but operational (transient network failures) |
//! | **Error** | Failure requiring attention (rejected requests, bad config) |
//! | **Critical** | Internal invariant violated |

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Errors shared by several BeaconLink crates
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommonError {
    /// Configuration-related errors
    #[error("{}", format_config(.message, .field.as_deref()))]
    Config { message: String, field: Option<String> },

    /// Validation errors
    #[error("Validation failed for '{field}': {message}")]
    Validation { field: String, message: String },
}

fn format_config(message: &str, field: Option<&str>) -> String {
    match field {
        Some(field) => format!("Configuration error in field '{field}': {message}"),
        None => format!("Configuration error: {message}"),
    }
}

impl CommonError {
    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into(), field: None }
    }

    /// Create a configuration error for a specific field
    pub fn config_field<S: Into<String>, F: Into<String>>(field: F, message: S) -> Self {
        Self::Config { message: message.into(), field: Some(field.into()) }
    }

    /// Create a validation error
    pub fn validation<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self::Validation { field: field.into(), message: message.into() }
    }
}

/// Result alias for operations returning [`CommonError`]
pub type CommonResult<T> = Result<T, CommonError>;

/// Standard interface for classifying errors by their characteristics
pub trait ErrorClassification {
    /// Check if this error is retryable
    ///
    /// Retryable errors are transient issues that may succeed if attempted
    /// again, such as timeouts, refused connections or 5xx responses.
    fn is_retryable(&self) -> bool;

    /// Get the error severity level
    fn severity(&self) -> ErrorSeverity;

    /// Check if this is a critical error requiring immediate attention
    fn is_critical(&self) -> bool;

    /// Get the suggested retry delay if applicable
    fn retry_after(&self) -> Option<Duration>;
}

/// Error severity levels for monitoring and alerting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Informational, typically for debugging
    Info,
    /// Warning, should be monitored but not critical
    Warning,
    /// Error, requires attention and action
    Error,
    /// Critical, immediate action required
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}
