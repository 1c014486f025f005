// Exponential backoff schedule
use std::time::Duration;

use crate::error::{CommonError, CommonResult};
use crate::retry::constants::{
    DEFAULT_BASE_DELAY, DEFAULT_MAX_DELAY, DEFAULT_MAX_RETRIES, MAX_BACKOFF_EXPONENT,
    MAX_MAX_RETRIES,
};

/// Delay before retry number `retry` (1-based) for the given base delay.
///
/// `retry == 0` denotes the initial attempt and never waits. Retry *r*
/// waits `base * 2^(r-1)`, so a 500 ms base yields 500, 1000, 2000 ms.
pub fn backoff_delay(base_delay: Duration, retry: u32) -> Duration {
    if retry == 0 {
        return Duration::ZERO;
    }

    let base_millis = u64::try_from(base_delay.as_millis()).unwrap_or(u64::MAX);
    let exponent = (retry - 1).min(MAX_BACKOFF_EXPONENT);
    let multiplier = 2_u64.saturating_pow(exponent);

    Duration::from_millis(base_millis.saturating_mul(multiplier))
}

/// Bounded exponential backoff without jitter
///
/// Deterministic on purpose: callers and tests can predict every delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    max_retries: u32,
    base_delay: Duration,
    max_delay: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
        }
    }
}

impl BackoffPolicy {
    /// Create a policy with validation
    pub fn new(max_retries: u32, base_delay: Duration) -> CommonResult<Self> {
        Self::default().with_max_retries(max_retries)?.with_base_delay(base_delay)
    }

    /// Set the number of retries performed after the first attempt
    pub fn with_max_retries(mut self, retries: u32) -> CommonResult<Self> {
        if retries > MAX_MAX_RETRIES {
            return Err(CommonError::config_field(
                "max_retries",
                format!("must be at most {MAX_MAX_RETRIES}, got {retries}"),
            ));
        }
        self.max_retries = retries;
        Ok(self)
    }

    /// Set the base delay for exponential backoff
    pub fn with_base_delay(mut self, delay: Duration) -> CommonResult<Self> {
        if delay > self.max_delay {
            return Err(CommonError::config_field(
                "base_delay",
                format!("base_delay ({delay:?}) cannot be greater than max_delay ({:?})", self.max_delay),
            ));
        }
        self.base_delay = delay;
        Ok(self)
    }

    /// Set the maximum delay cap
    pub fn with_max_delay(mut self, delay: Duration) -> CommonResult<Self> {
        if delay < self.base_delay {
            return Err(CommonError::config_field(
                "max_delay",
                format!("max_delay ({delay:?}) cannot be less than base_delay ({:?})", self.base_delay),
            ));
        }
        self.max_delay = delay;
        Ok(self)
    }

    /// Delay to wait before retry number `retry` (1-based), capped at `max_delay`
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        backoff_delay(self.base_delay, retry).min(self.max_delay)
    }

    /// Whether another retry is allowed after `retries_done` retries
    pub fn should_retry(&self, retries_done: u32) -> bool {
        retries_done < self.max_retries
    }

    /// Retries allowed after the first attempt
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Total attempts including the first one
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Base delay of the schedule
    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Full delay schedule, one entry per retry
    pub fn schedule(&self) -> Vec<Duration> {
        (1..=self.max_retries).map(|retry| self.delay_for_retry(retry)).collect()
    }
}
