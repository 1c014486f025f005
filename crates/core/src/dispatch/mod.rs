//! Retrying request dispatch
//!
//! [`RetryingDispatcher`] wraps a [`Transport`](crate::transport::Transport)
//! with a bounded retry loop. 4xx responses are terminal, 5xx responses and
//! transport failures are retried with exponential backoff.

pub mod classify;
pub mod dispatcher;
pub mod metrics;

pub use classify::{classify_status, AttemptError, DispatchError, StatusClass};
pub use dispatcher::RetryingDispatcher;
pub use metrics::{DispatchMetrics, RetryAttempt};
