//! Domain data types

pub mod auth;
pub mod connections;
pub mod endpoint;
pub mod settings;
pub mod state;

pub use auth::{AuthToken, Credentials, LoginRequest, LoginResponse};
pub use connections::{Beacon, ConnectionFilter, ConnectionResponse, Session};
pub use endpoint::{Scheme, ServerEndpoint};
pub use settings::ConfigKey;
pub use state::{AuthSnapshot, ConnectionState};
