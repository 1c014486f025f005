//! Time abstraction for testability
//!
//! Provides a trait-based approach to time operations that allows for
//! deterministic testing without relying on actual time passage.

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

/// Wall clock source for token expiry checks
pub trait Clock: Send + Sync {
    /// Current wall clock time as a UTC timestamp
    fn utc_now(&self) -> DateTime<Utc>;
}

/// Real system clock implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn utc_now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Mock clock for deterministic testing
///
/// Clones share the same elapsed counter, so a clock handed to a component
/// can still be advanced from the test body.
#[derive(Debug, Clone)]
pub struct MockClock {
    elapsed: Arc<Mutex<Duration>>,
    base_system_time: SystemTime,
}

impl MockClock {
    /// Create a mock clock starting at the current real time
    pub fn new() -> Self {
        Self::with_system_time(SystemTime::now())
    }

    /// Create a mock clock whose wall clock starts at `at`
    pub fn at(at: DateTime<Utc>) -> Self {
        Self::with_system_time(SystemTime::from(at))
    }

    fn with_system_time(base_system_time: SystemTime) -> Self {
        Self { elapsed: Arc::new(Mutex::new(Duration::ZERO)), base_system_time }
    }

    /// Advance the mock clock by a duration
    pub fn advance(&self, duration: Duration) {
        *self.elapsed.lock() += duration;
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn utc_now(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from(self.base_system_time + *self.elapsed.lock())
    }
}
