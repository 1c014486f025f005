//! # BeaconLink Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - The reqwest HTTP transport
//! - The typed control server API client
//! - Configuration loading from environment and files
//! - In-memory settings store and network oracle
//! - Tracing subscriber setup
//!
//! ## Architecture
//! - Implements traits defined in `beaconlink-core`
//! - Depends on `beaconlink-common`, `beaconlink-domain` and `beaconlink-core`
//! - Contains all "impure" code (I/O)

pub mod api;
pub mod config;
pub(crate) mod errors;
pub mod http;
pub mod network;
pub mod observability;
pub mod store;

// Re-export commonly used items
pub use api::ApiClient;
pub use http::{HttpTransport, HttpTransportBuilder};
pub use network::NetworkCore;
pub use observability::{init_tracing, LogFormat};
pub use store::{MemoryConfigStore, StaticNetworkMonitor};
