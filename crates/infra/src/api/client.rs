//! Typed client for the control server API
//!
//! Every call goes through [`ApiSession`], so it carries the cached bearer
//! token, is retried by the dispatcher and fails with
//! `BeaconLinkError::TokenExpired` when no valid token is available.

use beaconlink_core::{ApiRequest, ApiSession};
use beaconlink_domain::constants::CONNECTIONS_PATH;
use beaconlink_domain::{ConnectionFilter, ConnectionResponse, Result};
use tracing::{info, instrument};

/// API client over an authenticated session
#[derive(Clone)]
pub struct ApiClient {
    session: ApiSession,
}

impl ApiClient {
    pub fn new(session: ApiSession) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &ApiSession {
        &self.session
    }

    /// List beacons and sessions known to the server
    ///
    /// # Errors
    ///
    /// `TokenExpired` without a valid token, `ClientRejected` for a 4xx,
    /// `Transient` once retries are exhausted and `MalformedResponse` when
    /// the body is not the expected JSON document.
    #[instrument(skip(self))]
    pub async fn fetch_connections(&self, filter: ConnectionFilter) -> Result<ConnectionResponse> {
        let mut request = ApiRequest::get(CONNECTIONS_PATH);
        if let Some(value) = filter.query_value() {
            request = request.with_query("filter", value);
        }

        let connections: ConnectionResponse = self.session.get_json(request).await?;
        info!(
            beacons = connections.beacons.len(),
            sessions = connections.sessions.len(),
            "Fetched connections"
        );
        Ok(connections)
    }
}
