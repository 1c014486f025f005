//! Settings store and network oracle adapters

pub mod memory;

pub use memory::{MemoryConfigStore, StaticNetworkMonitor};
