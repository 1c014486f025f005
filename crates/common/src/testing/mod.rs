//! Deterministic doubles for time-dependent code
//!
//! `SystemClock` is the production clock; `MockClock` and `RecordingSleeper`
//! let tests drive expiry checks and backoff schedules without waiting.

pub mod sleeper;
pub mod time;

pub use sleeper::RecordingSleeper;
pub use time::{Clock, MockClock, SystemClock};
