//! Authentication state machine states

use serde::{Deserialize, Serialize};

use crate::impl_wire_name_conversions;

/// State of the connectivity-then-authentication flow
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    #[default]
    Unchecked,
    CheckingConnectivity,
    Unreachable,
    Authenticating,
    Authenticated,
    AuthFailed,
}

impl_wire_name_conversions!(ConnectionState {
    Unchecked => "unchecked",
    CheckingConnectivity => "checking_connectivity",
    Unreachable => "unreachable",
    Authenticating => "authenticating",
    Authenticated => "authenticated",
    AuthFailed => "auth_failed",
});

impl ConnectionState {
    /// States a user-triggered retry may leave
    pub fn can_retry(&self) -> bool {
        matches!(self, Self::Unreachable | Self::AuthFailed)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated)
    }
}

/// Published view of the controller
///
/// `generation` increases on every reconfiguration; `message` carries the
/// human-readable reason for `Unreachable` and `AuthFailed`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSnapshot {
    pub state: ConnectionState,
    pub generation: u64,
    pub message: Option<String>,
}
