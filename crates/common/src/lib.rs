//! Modular common utilities shared across BeaconLink crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: errors, error classification, input validation
//! - `runtime`: backoff policy, async sleeping, wall clocks
//! - `test-utils`: deterministic doubles (`MockClock`, `RecordingSleeper`)

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod error;
#[cfg(feature = "foundation")]
pub mod validation;

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod retry;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod testing;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "foundation")]
pub use error::{CommonError, CommonResult, ErrorClassification, ErrorSeverity};
#[cfg(feature = "runtime")]
pub use retry::{backoff_delay, BackoffPolicy, Sleeper, TokioSleeper};
#[cfg(feature = "runtime")]
pub use testing::time::{Clock, SystemClock};
#[cfg(feature = "foundation")]
pub use validation::{is_valid_address, validate_port, ValidationError};
