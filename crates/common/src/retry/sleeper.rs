// Sleep abstraction for retry loops
use std::time::Duration;

use async_trait::async_trait;

/// Waits between retry attempts
///
/// Retry loops sleep through this trait so tests can record the requested
/// delays instead of waiting for them.
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Suspend the current task for `duration`
    async fn sleep(&self, duration: Duration);
}

/// Sleeper backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        if duration.is_zero() {
            return;
        }
        tokio::time::sleep(duration).await;
    }
}
