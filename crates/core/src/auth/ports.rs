//! Port interfaces for the settings store and network oracle

use async_trait::async_trait;
use beaconlink_domain::{ConfigKey, Result};

/// External key-value settings store
///
/// Holds endpoint, credential and token fields. Each key is independently
/// nullable; `set(key, None)` clears it.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Read a value, `None` when unset
    async fn get(&self, key: ConfigKey) -> Result<Option<String>>;

    /// Write or clear a value
    async fn set(&self, key: ConfigKey, value: Option<&str>) -> Result<()>;
}

/// Answers whether the device currently has any network
pub trait NetworkMonitor: Send + Sync {
    fn is_network_available(&self) -> bool;
}
