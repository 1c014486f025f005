// Retry building blocks: exponential backoff policy and sleeping
//
// The retry loop itself lives next to the transport it drives
// (beaconlink-core's dispatcher); this module only provides the pure
// delay schedule and the sleep abstraction it is decoupled through.

pub mod backoff;
pub mod constants;
pub mod sleeper;

pub use backoff::{backoff_delay, BackoffPolicy};
pub use sleeper::{Sleeper, TokioSleeper};
