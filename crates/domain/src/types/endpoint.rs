//! Resolved server endpoint

use serde::{Deserialize, Serialize};

use crate::impl_wire_name_conversions;

/// URL scheme of a resolved endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Http,
    Https,
}

impl_wire_name_conversions!(Scheme {
    Http => "http",
    Https => "https",
});

/// Canonical base URL of the control server plus its parsed parts
///
/// Immutable once built; a configuration change produces a new value.
/// `scheme` is `None` when the operator supplied an explicit scheme other
/// than http/https; `port` is `None` when neither the URL nor its scheme
/// determine one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerEndpoint {
    base_url: String,
    scheme: Option<Scheme>,
    host: String,
    port: Option<u16>,
}

impl ServerEndpoint {
    pub fn new(
        base_url: impl Into<String>,
        scheme: Option<Scheme>,
        host: impl Into<String>,
        port: Option<u16>,
    ) -> Self {
        Self { base_url: base_url.into(), scheme, host: host.into(), port }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn scheme(&self) -> Option<Scheme> {
        self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    pub fn is_secure(&self) -> bool {
        matches!(self.scheme, Some(Scheme::Https))
    }
}

impl std::fmt::Display for ServerEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.base_url)
    }
}
