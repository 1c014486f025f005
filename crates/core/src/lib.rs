//! # BeaconLink Core
//!
//! Network and authentication logic with no HTTP code of its own.
//!
//! This crate contains:
//! - Endpoint resolution from raw settings
//! - The retrying request dispatcher and its error classification
//! - The bearer token store and the authentication state machine
//! - Port interfaces (traits) for the transport, settings store and
//!   network-availability oracle
//!
//! ## Architecture Principles
//! - Only depends on `beaconlink-common` and `beaconlink-domain`
//! - All I/O goes through traits implemented in `beaconlink-infra`
//! - Time and sleeping are injected, so tests never wait

pub mod auth;
pub mod dispatch;
pub mod endpoint;
pub mod session;
pub mod transport;

pub use auth::ports::{ConfigStore, NetworkMonitor};
pub use auth::{AuthenticationController, TokenStore};
pub use dispatch::{
    AttemptError, DispatchError, DispatchMetrics, RetryAttempt, RetryingDispatcher,
};
pub use endpoint::EndpointResolver;
pub use session::ApiSession;
pub use transport::{ApiRequest, ApiResponse, HttpMethod, Transport, TransportError};
