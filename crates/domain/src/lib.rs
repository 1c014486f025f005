//! # BeaconLink Domain
//!
//! Data types shared by the BeaconLink network core.
//!
//! This crate contains:
//! - Endpoint, credential, token and connection-state types
//! - Server API payloads (login, connections)
//! - The `BeaconLinkError` taxonomy and `Result` alias
//! - Client configuration structures and constants
//!
//! ## Architecture
//! - No dependencies on other BeaconLink crates
//! - Only external dependencies allowed
//! - Pure data structures, no I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
