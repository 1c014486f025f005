//! Bearer token lifecycle and the authentication state machine

pub mod controller;
pub mod ports;
pub mod token_store;

pub use controller::AuthenticationController;
pub use ports::{ConfigStore, NetworkMonitor};
pub use token_store::TokenStore;
