//! Transport port interface

use async_trait::async_trait;
use thiserror::Error;

use super::{ApiRequest, ApiResponse};

/// Failure below the HTTP status level
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request timed out: {0}")]
    Timeout(String),

    /// Refused connections, DNS failures, TLS handshake failures
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("I/O error: {0}")]
    Io(String),

    /// The request could not be built, e.g. an unparsable URL
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl TransportError {
    /// Whether sending the same request again may succeed
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::InvalidRequest(_))
    }
}

/// Executes exactly one HTTP exchange, without retries
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` to `base_url` + normalized `request.path`
    ///
    /// Any HTTP status, including 4xx and 5xx, is a successful exchange.
    async fn execute(
        &self,
        base_url: &str,
        request: &ApiRequest,
    ) -> Result<ApiResponse, TransportError>;
}
