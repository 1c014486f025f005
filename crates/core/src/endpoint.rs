//! Endpoint resolution from raw settings
//!
//! Pure functions: no I/O, re-run whenever the settings change.

use beaconlink_common::validate_port;
use beaconlink_domain::constants::{HTTPS_PORT, HTTP_PORT, SCHEME_SEPARATOR};
use beaconlink_domain::{BeaconLinkError, Result, Scheme, ServerEndpoint};
use url::Url;

/// Builds the canonical base URL of the control server
#[derive(Debug, Clone, Copy, Default)]
pub struct EndpointResolver;

impl EndpointResolver {
    /// Resolve a raw base string and port
    ///
    /// Rules, first match wins:
    /// 1. a base containing `://` is used verbatim and the port is ignored
    /// 2. port 80 gives `http://<base>`
    /// 3. port 443 gives `https://<base>`
    /// 4. any other port gives `https://<base>:<port>`
    ///
    /// # Errors
    /// `BeaconLinkError::Config` for an empty base, or for port 0 when the
    /// base carries no scheme.
    pub fn resolve(base: &str, port: u16) -> Result<ServerEndpoint> {
        if base.trim().is_empty() {
            return Err(BeaconLinkError::Config("Server address is empty".to_string()));
        }

        if let Some((scheme, rest)) = base.split_once(SCHEME_SEPARATOR) {
            return Ok(Self::explicit(base, scheme, rest));
        }

        let (scheme, base_url) = match port {
            0 => {
                return Err(BeaconLinkError::Config(
                    "port must be between 1 and 65535, got 0".to_string(),
                ))
            }
            HTTP_PORT => (Scheme::Http, format!("http://{base}")),
            HTTPS_PORT => (Scheme::Https, format!("https://{base}")),
            other => (Scheme::Https, format!("https://{base}:{other}")),
        };

        Ok(ServerEndpoint::new(base_url, Some(scheme), base, Some(port)))
    }

    /// Resolve settings-store values, where the port arrives as text
    ///
    /// A missing or blank port defaults to 443.
    pub fn resolve_raw(base: Option<&str>, port: Option<&str>) -> Result<ServerEndpoint> {
        let port = match port.map(str::trim).filter(|p| !p.is_empty()) {
            None => HTTPS_PORT,
            Some(raw) => {
                let parsed = raw.parse::<i64>().map_err(|_| {
                    BeaconLinkError::Config(format!("port must be a number, got '{raw}'"))
                })?;
                validate_port(parsed).map_err(|e| BeaconLinkError::Config(e.to_string()))?
            }
        };
        Self::resolve(base.unwrap_or_default(), port)
    }

    fn explicit(base: &str, scheme: &str, rest: &str) -> ServerEndpoint {
        let parsed_scheme = scheme.parse::<Scheme>().ok();
        match Url::parse(base) {
            Ok(url) => ServerEndpoint::new(
                base,
                parsed_scheme,
                url.host_str().unwrap_or_default(),
                url.port_or_known_default(),
            ),
            Err(_) => {
                let authority = rest.split('/').next().unwrap_or_default();
                let host = authority.split(':').next().unwrap_or_default();
                ServerEndpoint::new(base, parsed_scheme, host, None)
            }
        }
    }
}

/// Ensure a request path starts with `/`
pub fn normalize_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

/// Concatenate a base URL and a request path
///
/// A single trailing `/` on the base is dropped so `https://host/` and
/// `/ping` do not produce a double slash.
pub fn join_url(base_url: &str, path: &str) -> String {
    let base = base_url.strip_suffix('/').unwrap_or(base_url);
    format!("{base}{}", normalize_path(path))
}
