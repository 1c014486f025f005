//! Shared helpers for `beaconlink-infra` integration tests.
//!
//! Starts a wiremock control server and assembles a `NetworkCore` pointed
//! at it with a short backoff.

#![allow(dead_code)]

use std::sync::Arc;

use beaconlink_domain::{ClientConfig, ConfigKey};
use beaconlink_infra::{MemoryConfigStore, NetworkCore, StaticNetworkMonitor};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const LOGIN_BODY: &str = r#"{"token":"tok-1","expires":"2099-01-01T00:00:00Z"}"#;

pub const CONNECTIONS_BODY: &str = r#"{
    "beacons": [
        {"hostname": "ws-01", "address": "10.0.0.21", "operating_system": "windows"}
    ],
    "sessions": [
        {"hostname": "ws-02", "address": ["10.0.0.22", 4444], "operating_system": null}
    ]
}"#;

/// Core wired to `server` through the given store
pub struct TestCore {
    pub core: NetworkCore,
    pub store: Arc<MemoryConfigStore>,
    pub network: Arc<StaticNetworkMonitor>,
}

/// Retry config small enough for real sleeps in tests
pub fn fast_config() -> ClientConfig {
    let mut config = ClientConfig::default();
    config.retry.max_retries = 2;
    config.retry.base_delay_ms = 1;
    config.timeouts.read_ms = 2_000;
    config
}

/// Store with the server URI as endpoint and operator credentials
pub fn store_for(server: &MockServer) -> Arc<MemoryConfigStore> {
    let store = Arc::new(MemoryConfigStore::new());
    store.insert(ConfigKey::EndpointHost, server.uri());
    store.insert(ConfigKey::Username, "operator");
    store.insert(ConfigKey::Password, "hunter2");
    store
}

pub fn core_for(server: &MockServer) -> TestCore {
    let store = store_for(server);
    let network = Arc::new(StaticNetworkMonitor::default());
    let core = NetworkCore::with_ports(fast_config(), store.clone(), network.clone())
        .expect("network core");
    TestCore { core, store, network }
}

pub async fn mount_pong(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_string("pong"))
        .mount(server)
        .await;
}

pub async fn mount_login(server: &MockServer, status: u16, body: &str) {
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

pub async fn requests_to(server: &MockServer, route: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path() == route)
        .count()
}
