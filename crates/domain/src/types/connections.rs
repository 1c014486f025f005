//! `GET /api/connections` payloads

use serde::{Deserialize, Serialize};

use crate::impl_wire_name_conversions;

/// Beacon reported by the control server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beacon {
    pub hostname: String,
    pub address: String,
    pub operating_system: String,
}

/// Interactive session reported by the control server
///
/// Sessions may carry several addresses in server-defined shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub hostname: String,
    #[serde(default)]
    pub address: Vec<serde_json::Value>,
    #[serde(default)]
    pub operating_system: Option<String>,
}

/// Connections listing; missing arrays default to empty
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectionResponse {
    #[serde(default)]
    pub beacons: Vec<Beacon>,
    #[serde(default)]
    pub sessions: Vec<Session>,
}

impl ConnectionResponse {
    pub fn is_empty(&self) -> bool {
        self.beacons.is_empty() && self.sessions.is_empty()
    }
}

/// Server-side filter for the connections listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionFilter {
    #[default]
    All,
    Beacons,
    Sessions,
}

impl_wire_name_conversions!(ConnectionFilter {
    All => "all",
    Beacons => "beacons",
    Sessions => "sessions",
});

impl ConnectionFilter {
    /// Value of the `filter` query parameter, `None` for an unfiltered listing
    pub fn query_value(&self) -> Option<&'static str> {
        match self {
            Self::All => None,
            other => Some(other.as_str()),
        }
    }
}
