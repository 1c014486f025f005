//! In-process implementations of the settings and network ports

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use beaconlink_core::{ConfigStore, NetworkMonitor};
use beaconlink_domain::{ClientConfig, ConfigKey, Result};
use parking_lot::RwLock;
use tracing::debug;

/// Settings store held in memory
///
/// Used when the embedding application has no persistent store of its own,
/// and by tests.
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    values: RwLock<BTreeMap<ConfigKey, String>>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with the endpoint of `config`
    ///
    /// An empty host leaves both endpoint keys unset.
    pub fn from_config(config: &ClientConfig) -> Self {
        let store = Self::new();
        if !config.endpoint.host.trim().is_empty() {
            store.insert(ConfigKey::EndpointHost, config.endpoint.host.clone());
            store.insert(ConfigKey::EndpointPort, config.endpoint.port.to_string());
        }
        store
    }

    /// Synchronous write
    pub fn insert(&self, key: ConfigKey, value: impl Into<String>) {
        self.values.write().insert(key, value.into());
    }

    /// Synchronous read
    pub fn value(&self, key: ConfigKey) -> Option<String> {
        self.values.read().get(&key).cloned()
    }
}

#[async_trait]
impl ConfigStore for MemoryConfigStore {
    async fn get(&self, key: ConfigKey) -> Result<Option<String>> {
        Ok(self.value(key))
    }

    async fn set(&self, key: ConfigKey, value: Option<&str>) -> Result<()> {
        let mut values = self.values.write();
        match value {
            Some(v) => {
                values.insert(key, v.to_string());
            }
            None => {
                values.remove(&key);
            }
        }
        if key.is_secret() {
            debug!(%key, cleared = value.is_none(), "Settings value updated");
        } else {
            debug!(%key, value = ?value, "Settings value updated");
        }
        Ok(())
    }
}

/// Network oracle with a settable answer
#[derive(Debug)]
pub struct StaticNetworkMonitor {
    available: AtomicBool,
}

impl StaticNetworkMonitor {
    pub fn new(available: bool) -> Self {
        Self { available: AtomicBool::new(available) }
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::Release);
    }
}

impl Default for StaticNetworkMonitor {
    fn default() -> Self {
        Self::new(true)
    }
}

impl NetworkMonitor for StaticNetworkMonitor {
    fn is_network_available(&self) -> bool {
        self.available.load(Ordering::Acquire)
    }
}
