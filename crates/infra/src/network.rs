//! Composition root wiring the adapters into the core services

use std::sync::Arc;

use beaconlink_common::BackoffPolicy;
use beaconlink_core::{
    ApiSession, AuthenticationController, ConfigStore, NetworkMonitor, RetryingDispatcher,
    TokenStore, Transport,
};
use beaconlink_domain::{
    AuthSnapshot, BeaconLinkError, ClientConfig, ConfigKey, ConnectionState, Result,
};
use tokio::sync::watch;
use tracing::info;

use crate::api::ApiClient;
use crate::http::HttpTransport;
use crate::store::{MemoryConfigStore, StaticNetworkMonitor};

/// The assembled network core
///
/// Holds one controller and one API client sharing a dispatcher and token
/// store.
pub struct NetworkCore {
    config: ClientConfig,
    store: Arc<dyn ConfigStore>,
    controller: Arc<AuthenticationController>,
    api: ApiClient,
}

impl NetworkCore {
    /// Build with an in-memory settings store seeded from `config`
    ///
    /// # Errors
    /// `BeaconLinkError::Config` when `config` fails validation or the HTTP
    /// client cannot be built.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let store = Arc::new(MemoryConfigStore::from_config(&config));
        Self::with_ports(config, store, Arc::new(StaticNetworkMonitor::default()))
    }

    /// Build over an external settings store and network oracle
    ///
    /// The store's endpoint keys are used as they are; `config.endpoint` is
    /// only consulted by [`NetworkCore::from_config`].
    pub fn with_ports(
        config: ClientConfig,
        store: Arc<dyn ConfigStore>,
        network: Arc<dyn NetworkMonitor>,
    ) -> Result<Self> {
        let transport = Arc::new(HttpTransport::from_config(&config)?);
        Self::with_transport(config, transport, store, network)
    }

    /// Build over any transport
    pub fn with_transport(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        store: Arc<dyn ConfigStore>,
        network: Arc<dyn NetworkMonitor>,
    ) -> Result<Self> {
        config.validate()?;
        let policy = BackoffPolicy::new(config.retry.max_retries, config.retry.base_delay())
            .map_err(|e| BeaconLinkError::Config(e.to_string()))?;

        let dispatcher = Arc::new(RetryingDispatcher::new(transport, policy));
        let controller = Arc::new(
            AuthenticationController::new(
                dispatcher,
                Arc::new(TokenStore::new()),
                Arc::clone(&store),
                network,
            )
            .with_probe(config.probe.clone()),
        );
        let api = ApiClient::new(ApiSession::new(Arc::clone(&controller)));

        info!(
            tls = %config.tls,
            max_retries = config.retry.max_retries,
            "Network core assembled"
        );
        Ok(Self { config, store, controller, api })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn ConfigStore> {
        &self.store
    }

    pub fn controller(&self) -> &Arc<AuthenticationController> {
        &self.controller
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthSnapshot> {
        self.controller.subscribe()
    }

    /// Save the endpoint and restart the flow against it
    ///
    /// # Errors
    /// Settings store failures, or the endpoint resolution failure.
    pub async fn set_endpoint(&self, host: &str, port: u16) -> Result<()> {
        self.store.set(ConfigKey::EndpointHost, Some(host)).await?;
        self.store.set(ConfigKey::EndpointPort, Some(&port.to_string())).await?;
        self.controller.reconfigure().await.map(|_| ())
    }

    /// Run the connectivity and login flow
    pub async fn connect(&self) -> ConnectionState {
        self.controller.activate().await
    }
}
