use std::time::Duration;

use async_trait::async_trait;
use beaconlink_core::endpoint::join_url;
use beaconlink_core::{ApiRequest, ApiResponse, HttpMethod, Transport, TransportError};
use beaconlink_domain::constants::BEARER_PREFIX;
use beaconlink_domain::{BeaconLinkError, ClientConfig, TrustPolicy};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client as ReqwestClient, Method, Url};
use tracing::{debug, warn};

use crate::errors::IntoTransportError;

/// reqwest-backed transport performing one exchange per call.
///
/// Retries live in the dispatcher; this type never repeats a request.
#[derive(Clone)]
pub struct HttpTransport {
    client: ReqwestClient,
    trust: TrustPolicy,
}

impl HttpTransport {
    /// Start building a new transport.
    pub fn builder() -> HttpTransportBuilder {
        HttpTransportBuilder::default()
    }

    /// Transport with the TLS policy and timeouts of `config`.
    pub fn from_config(config: &ClientConfig) -> Result<Self, BeaconLinkError> {
        Self::builder()
            .trust_policy(config.tls)
            .connect_timeout(config.timeouts.connect_timeout())
            .read_timeout(config.timeouts.read_timeout())
            .build()
    }

    pub fn trust_policy(&self) -> TrustPolicy {
        self.trust
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(
        &self,
        base_url: &str,
        request: &ApiRequest,
    ) -> Result<ApiResponse, TransportError> {
        let target = join_url(base_url, &request.path);
        let url = Url::parse(&target)
            .map_err(|e| TransportError::InvalidRequest(format!("{target}: {e}")))?;

        let method = match request.method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
        };
        debug!(%method, path = %request.path, "sending HTTP request");

        let mut builder = self.client.request(method.clone(), url);
        if let Some(content_type) = &request.content_type {
            builder = builder.header(CONTENT_TYPE, content_type.as_str());
        }
        if let Some(token) = &request.bearer {
            builder = builder.header(AUTHORIZATION, format!("{BEARER_PREFIX}{token}"));
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await.map_err(|err| {
            warn!(%method, path = %request.path, error = %err, "HTTP request failed");
            err.into_transport()
        })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(IntoTransportError::into_transport)?;
        debug!(%method, path = %request.path, status, "received HTTP response");

        Ok(ApiResponse { status, body })
    }
}

/// Builder for [`HttpTransport`].
#[derive(Debug)]
pub struct HttpTransportBuilder {
    connect_timeout: Duration,
    read_timeout: Duration,
    trust: TrustPolicy,
    user_agent: Option<String>,
}

impl Default for HttpTransportBuilder {
    fn default() -> Self {
        let defaults = ClientConfig::default();
        Self {
            connect_timeout: defaults.timeouts.connect_timeout(),
            read_timeout: defaults.timeouts.read_timeout(),
            trust: TrustPolicy::default(),
            user_agent: None,
        }
    }
}

impl HttpTransportBuilder {
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Deadline for the response once the request is sent
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// `TrustAny` disables certificate and hostname verification.
    pub fn trust_policy(mut self, trust: TrustPolicy) -> Self {
        self.trust = trust;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn build(self) -> Result<HttpTransport, BeaconLinkError> {
        let mut builder = ReqwestClient::builder()
            .connect_timeout(self.connect_timeout)
            .timeout(self.read_timeout)
            .no_proxy();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        if self.trust.accepts_invalid_certs() {
            warn!("TLS certificate verification disabled");
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder
            .build()
            .map_err(|e| BeaconLinkError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(HttpTransport { client, trust: self.trust })
    }
}
