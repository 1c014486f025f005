//! Bounded retry loop over a transport

use std::sync::Arc;
use std::time::Duration;

use beaconlink_common::{BackoffPolicy, Sleeper, TokioSleeper};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use super::classify::{classify_status, AttemptError, DispatchError, StatusClass};
use super::metrics::{DispatchMetrics, RetryAttempt};
use crate::transport::{ApiRequest, ApiResponse, Transport};

/// Sends a request, retrying transient failures with exponential backoff
///
/// Attempts of one call are strictly sequential: attempt *n+1* starts only
/// after attempt *n* completed and its backoff elapsed. Separate calls share
/// nothing but the transport and may run concurrently.
pub struct RetryingDispatcher {
    transport: Arc<dyn Transport>,
    sleeper: Arc<dyn Sleeper>,
    policy: BackoffPolicy,
}

impl RetryingDispatcher {
    /// Create a dispatcher that sleeps on the tokio timer
    pub fn new(transport: Arc<dyn Transport>, policy: BackoffPolicy) -> Self {
        Self { transport, sleeper: Arc::new(TokioSleeper), policy }
    }

    /// Replace the sleeper, e.g. with a recording double in tests
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn policy(&self) -> &BackoffPolicy {
        &self.policy
    }

    /// Dispatch without cancellation
    pub async fn execute(
        &self,
        base_url: &str,
        request: &ApiRequest,
    ) -> Result<ApiResponse, DispatchError> {
        let (result, _) =
            self.execute_with_metrics(base_url, request, &CancellationToken::new()).await;
        result
    }

    /// Dispatch, giving up as soon as `cancel` fires
    pub async fn execute_cancellable(
        &self,
        base_url: &str,
        request: &ApiRequest,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse, DispatchError> {
        let (result, _) = self.execute_with_metrics(base_url, request, cancel).await;
        result
    }

    /// Dispatch and report every failed attempt
    ///
    /// The result of an attempt that completes after `cancel` fired is
    /// discarded.
    #[instrument(skip(self, request, cancel), fields(method = %request.method, path = %request.path))]
    pub async fn execute_with_metrics(
        &self,
        base_url: &str,
        request: &ApiRequest,
        cancel: &CancellationToken,
    ) -> (Result<ApiResponse, DispatchError>, DispatchMetrics) {
        let mut metrics = DispatchMetrics::default();
        let mut retries = 0_u32;

        loop {
            metrics.attempts += 1;
            let attempt = metrics.attempts;

            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!(attempt, "Dispatch cancelled during request");
                    return (Err(DispatchError::Cancelled), metrics);
                }
                outcome = self.transport.execute(base_url, request) => outcome,
            };

            let error = match outcome {
                Ok(response) => match classify_status(response.status) {
                    StatusClass::Completed => {
                        debug!(attempt, status = response.status, "Request completed");
                        return (Ok(response), metrics);
                    }
                    StatusClass::Terminal => {
                        warn!(attempt, status = response.status, "Request rejected by server");
                        let ApiResponse { status, body } = response;
                        return (Err(DispatchError::ClientRejected { status, body }), metrics);
                    }
                    StatusClass::Retryable => AttemptError::Status(response.status),
                },
                Err(err) if !err.is_retryable() => {
                    warn!(attempt, error = %err, "Request cannot be sent");
                    return (Err(DispatchError::Invalid(err)), metrics);
                }
                Err(err) => AttemptError::Transport(err),
            };

            if !self.policy.should_retry(retries) {
                warn!(attempts = attempt, error = %error, "Retry budget exhausted");
                metrics.history.push(RetryAttempt {
                    attempt_number: attempt,
                    last_error: error.clone(),
                    delay: Duration::ZERO,
                });
                return (Err(DispatchError::Exhausted { attempts: attempt, last_error: error }), metrics);
            }

            retries += 1;
            let delay = self.policy.delay_for_retry(retries);
            warn!(attempt, error = %error, delay_ms = delay_millis(delay), "Transient failure, retrying");
            metrics.history.push(RetryAttempt { attempt_number: attempt, last_error: error, delay });
            metrics.total_delay += delay;

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!(attempt, "Dispatch cancelled during backoff");
                    return (Err(DispatchError::Cancelled), metrics);
                }
                _ = self.sleeper.sleep(delay) => {}
            }
        }
    }
}

fn delay_millis(delay: Duration) -> u64 {
    u64::try_from(delay.as_millis()).unwrap_or(u64::MAX)
}
