//! Shared test helpers for `beaconlink-core` integration tests.
//!
//! A scripted transport, an in-memory settings store and a switchable
//! network oracle, wired into a controller whose sleeps are recorded.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use beaconlink_common::testing::{MockClock, RecordingSleeper};
use beaconlink_common::BackoffPolicy;
use beaconlink_core::{
    ApiRequest, ApiResponse, AuthenticationController, ConfigStore, NetworkMonitor,
    RetryingDispatcher, TokenStore, Transport, TransportError,
};
use beaconlink_domain::{BeaconLinkError, ConfigKey, ProbeConfig, Result};
use parking_lot::Mutex;
use tokio::sync::Notify;

/// What the scripted server does with the next request to a path
#[derive(Debug, Clone)]
pub enum Step {
    Respond(u16, String),
    Fail(TransportError),
    /// Never answer; only cancellation ends the attempt
    Hang,
    /// Answer once the gate is opened
    Gated(Arc<Gate>, u16, String),
}

/// One-shot rendezvous between a test and a blocked call
#[derive(Debug, Default)]
pub struct Gate {
    arrived: Notify,
    release: Notify,
}

impl Gate {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Wait until the blocked call reached the gate
    pub async fn wait_arrived(&self) {
        self.arrived.notified().await;
    }

    pub fn open(&self) {
        self.release.notify_one();
    }

    async fn pass(&self) {
        self.arrived.notify_one();
        self.release.notified().await;
    }
}

#[derive(Debug, Clone)]
pub struct Recorded {
    pub base_url: String,
    pub request: ApiRequest,
}

/// Transport answering from per-path scripts
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<String, VecDeque<Step>>>,
    requests: Mutex<Vec<Recorded>>,
    arrived: Notify,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push(&self, path: &str, step: Step) -> &Self {
        self.routes.lock().entry(path.to_string()).or_default().push_back(step);
        self
    }

    pub fn respond(&self, path: &str, status: u16, body: &str) -> &Self {
        self.push(path, Step::Respond(status, body.to_string()))
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().clone()
    }

    pub fn count(&self, path: &str) -> usize {
        self.requests.lock().iter().filter(|r| r.request.path == path).count()
    }

    /// Wait until at least one request reached the transport
    pub async fn wait_for_request(&self) {
        self.arrived.notified().await;
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(
        &self,
        base_url: &str,
        request: &ApiRequest,
    ) -> std::result::Result<ApiResponse, TransportError> {
        self.requests
            .lock()
            .push(Recorded { base_url: base_url.to_string(), request: request.clone() });
        let step = self.routes.lock().get_mut(&request.path).and_then(VecDeque::pop_front);
        self.arrived.notify_one();

        match step {
            Some(Step::Respond(status, body)) => Ok(ApiResponse::new(status, body)),
            Some(Step::Fail(err)) => Err(err),
            Some(Step::Hang) => std::future::pending().await,
            Some(Step::Gated(gate, status, body)) => {
                gate.pass().await;
                Ok(ApiResponse::new(status, body))
            }
            None => Err(TransportError::Connect(format!("no script for {}", request.path))),
        }
    }
}

/// Settings store backed by a map
#[derive(Default)]
pub struct InMemoryStore {
    values: Mutex<HashMap<ConfigKey, String>>,
    fail_writes: AtomicBool,
    held: Mutex<Option<(ConfigKey, Arc<Gate>)>>,
}

impl InMemoryStore {
    pub fn with(self, key: ConfigKey, value: &str) -> Self {
        self.values.lock().insert(key, value.to_string());
        self
    }

    pub fn endpoint(host: &str, port: &str) -> Self {
        Self::default().with(ConfigKey::EndpointHost, host).with(ConfigKey::EndpointPort, port)
    }

    pub fn value(&self, key: ConfigKey) -> Option<String> {
        self.values.lock().get(&key).cloned()
    }

    pub fn put(&self, key: ConfigKey, value: &str) {
        self.values.lock().insert(key, value.to_string());
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// The next read of `key` takes its value, then waits for `gate`
    pub fn hold_next_read(&self, key: ConfigKey, gate: Arc<Gate>) {
        *self.held.lock() = Some((key, gate));
    }
}

#[async_trait]
impl ConfigStore for InMemoryStore {
    async fn get(&self, key: ConfigKey) -> Result<Option<String>> {
        let value = self.values.lock().get(&key).cloned();
        let gate = {
            let mut held = self.held.lock();
            if matches!(held.as_ref(), Some((held_key, _)) if *held_key == key) {
                held.take().map(|(_, gate)| gate)
            } else {
                None
            }
        };
        if let Some(gate) = gate {
            gate.pass().await;
        }
        Ok(value)
    }

    async fn set(&self, key: ConfigKey, value: Option<&str>) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(BeaconLinkError::Storage("read-only store".into()));
        }
        let mut values = self.values.lock();
        match value {
            Some(value) => values.insert(key, value.to_string()),
            None => values.remove(&key),
        };
        Ok(())
    }
}

/// Network oracle that can be switched off mid-test
pub struct SwitchableNetwork(AtomicBool);

impl SwitchableNetwork {
    pub fn up() -> Arc<Self> {
        Arc::new(Self(AtomicBool::new(true)))
    }

    pub fn set(&self, available: bool) {
        self.0.store(available, Ordering::SeqCst);
    }
}

impl NetworkMonitor for SwitchableNetwork {
    fn is_network_available(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub struct Harness {
    pub transport: Arc<ScriptedTransport>,
    pub store: Arc<InMemoryStore>,
    pub network: Arc<SwitchableNetwork>,
    pub sleeper: RecordingSleeper,
    pub clock: MockClock,
    pub controller: Arc<AuthenticationController>,
}

pub const VALID_LOGIN: &str = r#"{"token":"abc","expires":"2099-01-01T00:00:00Z"}"#;
pub const EXPIRED_LOGIN: &str = r#"{"token":"abc","expires":"2000-01-01T00:00:00Z"}"#;

/// Controller over `store` with default retry policy and recorded sleeps
pub fn harness(store: InMemoryStore) -> Harness {
    harness_with_probe(store, ProbeConfig::default())
}

pub fn harness_with_probe(store: InMemoryStore, probe: ProbeConfig) -> Harness {
    let transport = ScriptedTransport::new();
    let store = Arc::new(store);
    let network = SwitchableNetwork::up();
    let sleeper = RecordingSleeper::new();
    let clock = MockClock::new();

    let dispatcher = RetryingDispatcher::new(transport.clone(), BackoffPolicy::default())
        .with_sleeper(Arc::new(sleeper.clone()));
    let tokens = TokenStore::with_clock(Arc::new(clock.clone()));
    let controller = AuthenticationController::new(
        Arc::new(dispatcher),
        Arc::new(tokens),
        store.clone(),
        network.clone(),
    )
    .with_probe(probe);

    Harness { transport, store, network, sleeper, clock, controller: Arc::new(controller) }
}

/// Store with endpoint `10.0.0.5:8443` and operator credentials
pub fn configured_store() -> InMemoryStore {
    InMemoryStore::endpoint("10.0.0.5", "8443")
        .with(ConfigKey::Username, "operator")
        .with(ConfigKey::Password, "hunter2")
}
