//! Configuration loader
//!
//! Loads the client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If `BEACONLINK_HOST` is absent, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! Whatever the source, the result is checked with
//! [`ClientConfig::validate`] before it is returned.
//!
//! ## Environment Variables
//! - `BEACONLINK_HOST`: Server address (required for the environment source)
//! - `BEACONLINK_PORT`: Server port, 1-65535 (default 443)
//! - `BEACONLINK_TLS`: `verify` or `trust-any` (default `verify`)
//! - `BEACONLINK_CONNECT_TIMEOUT_MS`: Connect timeout (default 15000)
//! - `BEACONLINK_READ_TIMEOUT_MS`: Read timeout (default 15000)
//! - `BEACONLINK_MAX_RETRIES`: Retries after the first attempt (default 3)
//! - `BEACONLINK_BASE_DELAY_MS`: First backoff delay (default 500)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./beaconlink.json` or `./beaconlink.toml` (current working directory)
//! 2. `./config.json` or `./config.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use beaconlink_common::validate_port;
use beaconlink_domain::{BeaconLinkError, ClientConfig, Result, TrustPolicy};

pub const ENV_HOST: &str = "BEACONLINK_HOST";
pub const ENV_PORT: &str = "BEACONLINK_PORT";
pub const ENV_TLS: &str = "BEACONLINK_TLS";
pub const ENV_CONNECT_TIMEOUT_MS: &str = "BEACONLINK_CONNECT_TIMEOUT_MS";
pub const ENV_READ_TIMEOUT_MS: &str = "BEACONLINK_READ_TIMEOUT_MS";
pub const ENV_MAX_RETRIES: &str = "BEACONLINK_MAX_RETRIES";
pub const ENV_BASE_DELAY_MS: &str = "BEACONLINK_BASE_DELAY_MS";

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `BeaconLinkError::Config` if neither source yields a valid
/// configuration.
pub fn load() -> Result<ClientConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// Only `BEACONLINK_HOST` is required; unset optional variables keep their
/// defaults.
///
/// # Errors
/// Returns `BeaconLinkError::Config` if the host is missing or a variable
/// has an invalid value.
pub fn load_from_env() -> Result<ClientConfig> {
    from_lookup(|key| std::env::var(key).ok())
}

/// Build a configuration from any variable source
fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<ClientConfig> {
    let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    let mut config = ClientConfig::default();
    config.endpoint.host = var(ENV_HOST).ok_or_else(|| {
        BeaconLinkError::Config(format!("Missing required environment variable: {ENV_HOST}"))
    })?;

    if let Some(raw) = var(ENV_PORT) {
        let port = parse_var::<i64>(ENV_PORT, &raw)?;
        config.endpoint.port =
            validate_port(port).map_err(|e| BeaconLinkError::Config(format!("{ENV_PORT}: {e}")))?;
    }
    if let Some(raw) = var(ENV_TLS) {
        config.tls = raw.parse::<TrustPolicy>().map_err(|e| {
            BeaconLinkError::Config(format!("Invalid {ENV_TLS} value '{raw}': {e}"))
        })?;
    }
    if let Some(raw) = var(ENV_CONNECT_TIMEOUT_MS) {
        config.timeouts.connect_ms = parse_var(ENV_CONNECT_TIMEOUT_MS, &raw)?;
    }
    if let Some(raw) = var(ENV_READ_TIMEOUT_MS) {
        config.timeouts.read_ms = parse_var(ENV_READ_TIMEOUT_MS, &raw)?;
    }
    if let Some(raw) = var(ENV_MAX_RETRIES) {
        config.retry.max_retries = parse_var(ENV_MAX_RETRIES, &raw)?;
    }
    if let Some(raw) = var(ENV_BASE_DELAY_MS) {
        config.retry.base_delay_ms = parse_var(ENV_BASE_DELAY_MS, &raw)?;
    }

    config.validate()?;
    Ok(config)
}

fn parse_var<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>()
        .map_err(|e| BeaconLinkError::Config(format!("Invalid {key} value '{raw}': {e}")))
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `BeaconLinkError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - A value fails validation
pub fn load_from_file(path: Option<PathBuf>) -> Result<ClientConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(BeaconLinkError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            BeaconLinkError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| BeaconLinkError::Config(format!("Failed to read config file: {e}")))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

/// Parse configuration from string content, format chosen by extension
fn parse_config(contents: &str, path: &Path) -> Result<ClientConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| BeaconLinkError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| BeaconLinkError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(BeaconLinkError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let names = ["beaconlink.json", "beaconlink.toml", "config.json", "config.toml"];
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(names.iter().map(|name| cwd.join(name)));
        candidates.push(cwd.join("../config.json"));
        candidates.push(cwd.join("../config.toml"));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(names.iter().map(|name| exe_dir.join(name)));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}
