//! Protocol and configuration constants
//!
//! Paths and markers of the control server's HTTP contract, plus the
//! defaults used when configuration leaves a value unset.

// Server contract
pub const PING_PATH: &str = "/ping";
pub const PONG_MARKER: &str = "pong";
pub const LOGIN_PATH: &str = "/api/login";
pub const CONNECTIONS_PATH: &str = "/api/connections";
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";
pub const BEARER_PREFIX: &str = "Bearer ";

/// Sentinel reported by authenticated calls made without a valid token
pub const EXPIRED_SENTINEL: &str = "Expired";

// Scheme inference
pub const HTTP_PORT: u16 = 80;
pub const HTTPS_PORT: u16 = 443;
pub const SCHEME_SEPARATOR: &str = "://";

// Transport defaults
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 15_000;
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 15_000;

// Retry defaults
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_BASE_DELAY_MS: u64 = 500;
pub const MAX_RETRIES_LIMIT: u32 = 10;

// User-facing failure messages
pub const MSG_EMPTY_USERNAME: &str = "Username is empty";
pub const MSG_NO_TOKEN: &str = "Login failed: Server did not return a token";
pub const MSG_PARSE_FAILURE: &str = "Error parsing server response";
pub const MSG_NO_NETWORK: &str = "No network connection available";
pub const MSG_SERVER_UNREACHABLE: &str = "Unable to reach server";
pub const MSG_GENERIC_REJECTION: &str = "Request rejected by server";
