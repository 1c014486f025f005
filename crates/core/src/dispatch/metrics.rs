//! Per-call retry bookkeeping

use std::time::Duration;

use super::classify::AttemptError;

/// One failed attempt of a dispatched call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryAttempt {
    /// 1-based attempt number
    pub attempt_number: u32,
    pub last_error: AttemptError,
    /// Backoff slept after this attempt, zero when no retry followed
    pub delay: Duration,
}

/// Metrics collected while dispatching a single call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchMetrics {
    /// Number of attempts made
    pub attempts: u32,
    /// Total backoff across all retries
    pub total_delay: Duration,
    /// Failed attempts in order
    pub history: Vec<RetryAttempt>,
}

impl DispatchMetrics {
    /// Retries performed after the first attempt
    pub fn retries(&self) -> u32 {
        self.attempts.saturating_sub(1)
    }

    pub fn last_error(&self) -> Option<&AttemptError> {
        self.history.last().map(|attempt| &attempt.last_error)
    }
}
