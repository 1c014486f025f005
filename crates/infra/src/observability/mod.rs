//! Logging setup
//!
//! Library code only emits `tracing` events; the embedding binary calls
//! [`init_tracing`] once to install a subscriber.

pub mod logging;

pub use logging::{init_tracing, LogFormat};
