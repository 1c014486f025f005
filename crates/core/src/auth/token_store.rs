//! In-memory bearer token holder

use std::sync::Arc;

use beaconlink_common::{Clock, SystemClock};
use beaconlink_domain::AuthToken;
use parking_lot::RwLock;
use tracing::debug;

/// Holds the current bearer token and its expiry
///
/// Writes are atomic with respect to the reads used to attach the
/// `Authorization` header. Persistence is handled by the caller.
pub struct TokenStore {
    token: RwLock<Option<AuthToken>>,
    clock: Arc<dyn Clock>,
}

impl TokenStore {
    /// Create an empty store checking expiry against the system clock
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self { token: RwLock::new(None), clock }
    }

    /// Current token, valid or not
    pub fn get(&self) -> Option<AuthToken> {
        self.token.read().clone()
    }

    /// Replace the token
    pub fn set(&self, value: impl Into<String>, expires_at: impl Into<String>) {
        self.replace(AuthToken::new(value, expires_at));
    }

    pub fn replace(&self, token: AuthToken) {
        debug!(expires_at = %token.expires_at(), "Storing bearer token");
        *self.token.write() = Some(token);
    }

    /// Non-empty value, parseable expiry, expiry strictly in the future
    pub fn is_valid(&self) -> bool {
        self.valid_token().is_some()
    }

    /// The token, only if it is currently valid
    pub fn valid_token(&self) -> Option<AuthToken> {
        let now = self.clock.utc_now();
        self.token.read().as_ref().filter(|token| token.is_valid_at(now)).cloned()
    }

    pub fn invalidate(&self) {
        if self.token.write().take().is_some() {
            debug!("Bearer token invalidated");
        }
    }

    /// Clear the token only if it is still `rejected`
    ///
    /// Returns `false` when another login already replaced it.
    pub fn invalidate_if(&self, rejected: &AuthToken) -> bool {
        let mut token = self.token.write();
        if token.as_ref() != Some(rejected) {
            return false;
        }
        *token = None;
        debug!("Bearer token invalidated");
        true
    }
}

impl Default for TokenStore {
    fn default() -> Self {
        Self::new()
    }
}
