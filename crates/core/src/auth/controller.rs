//! Connectivity-then-authentication state machine
//!
//! ```text
//! Unchecked ──activate──▶ CheckingConnectivity ──probe fails──▶ Unreachable
//!                               │                                   │
//!                               ├─ valid cached token ─▶ Authenticated
//!                               └─ no valid token ─▶ Authenticating ─┬─▶ Authenticated
//!                                                                    └─▶ AuthFailed
//! Unreachable | AuthFailed ──retry──▶ CheckingConnectivity
//! ```
//!
//! Runs are serialized. Every state and token write is tagged with the
//! generation it started in; `reconfigure` bumps the generation and cancels
//! the in-flight run, so a late result never overwrites newer state.

use std::sync::Arc;

use beaconlink_domain::constants::{LOGIN_PATH, MSG_NO_NETWORK, MSG_SERVER_UNREACHABLE};
use beaconlink_domain::{
    AuthSnapshot, AuthToken, BeaconLinkError, ConfigKey, ConnectionState, Credentials,
    LoginRequest, LoginResponse, ProbeConfig, Result, ServerEndpoint,
};
use parking_lot::Mutex;
use tokio::sync::{watch, Mutex as RunLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use super::ports::{ConfigStore, NetworkMonitor};
use super::token_store::TokenStore;
use crate::dispatch::{DispatchError, RetryingDispatcher};
use crate::endpoint::EndpointResolver;
use crate::transport::ApiRequest;

struct RunContext {
    endpoint: Option<Result<ServerEndpoint>>,
    cancel: CancellationToken,
    awaiting_credentials: bool,
}

/// Drives the probe, token reuse and login flow
pub struct AuthenticationController {
    dispatcher: Arc<RetryingDispatcher>,
    tokens: Arc<TokenStore>,
    store: Arc<dyn ConfigStore>,
    network: Arc<dyn NetworkMonitor>,
    probe: ProbeConfig,
    snapshot: watch::Sender<AuthSnapshot>,
    context: Mutex<RunContext>,
    run_lock: RunLock<()>,
    reconfigure_lock: RunLock<()>,
}

impl AuthenticationController {
    pub fn new(
        dispatcher: Arc<RetryingDispatcher>,
        tokens: Arc<TokenStore>,
        store: Arc<dyn ConfigStore>,
        network: Arc<dyn NetworkMonitor>,
    ) -> Self {
        let (snapshot, _) = watch::channel(AuthSnapshot::default());
        Self {
            dispatcher,
            tokens,
            store,
            network,
            probe: ProbeConfig::default(),
            snapshot,
            context: Mutex::new(RunContext {
                endpoint: None,
                cancel: CancellationToken::new(),
                awaiting_credentials: false,
            }),
            run_lock: RunLock::new(()),
            reconfigure_lock: RunLock::new(()),
        }
    }

    /// Override the connectivity probe path and marker
    pub fn with_probe(mut self, probe: ProbeConfig) -> Self {
        self.probe = probe;
        self
    }

    pub fn state(&self) -> ConnectionState {
        self.snapshot.borrow().state
    }

    pub fn snapshot(&self) -> AuthSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Observe every state change
    pub fn subscribe(&self) -> watch::Receiver<AuthSnapshot> {
        self.snapshot.subscribe()
    }

    pub fn token_store(&self) -> &Arc<TokenStore> {
        &self.tokens
    }

    pub fn dispatcher(&self) -> &Arc<RetryingDispatcher> {
        &self.dispatcher
    }

    /// Last successfully resolved endpoint
    pub fn endpoint(&self) -> Option<ServerEndpoint> {
        self.context.lock().endpoint.as_ref().and_then(|resolved| resolved.as_ref().ok().cloned())
    }

    /// Cancellation token of the current generation
    pub fn cancellation(&self) -> CancellationToken {
        self.context.lock().cancel.clone()
    }

    pub fn is_awaiting_credentials(&self) -> bool {
        self.context.lock().awaiting_credentials
    }

    /// Start the flow from `Unchecked`
    ///
    /// Also re-runs from `Authenticated` once the cached token stopped being
    /// valid. Any other state is returned unchanged.
    #[instrument(skip(self))]
    pub async fn activate(&self) -> ConnectionState {
        self.run_if(|state, token_valid| match state {
            ConnectionState::Unchecked => true,
            ConnectionState::Authenticated => !token_valid,
            _ => false,
        })
        .await
    }

    /// User-triggered retry from `Unreachable` or `AuthFailed`
    #[instrument(skip(self))]
    pub async fn retry(&self) -> ConnectionState {
        self.run_if(|state, _| state.can_retry()).await
    }

    /// Re-read endpoint settings and restart from `Unchecked`
    ///
    /// Cancels the in-flight run; its result is discarded. Overlapping calls
    /// are applied in call order, so the last call's read of the settings wins.
    ///
    /// # Errors
    /// Returns the resolution failure, which is also reported as
    /// `Unreachable` on the next activation.
    pub async fn reconfigure(&self) -> Result<ServerEndpoint> {
        let _guard = self.reconfigure_lock.lock().await;
        let resolved = self.load_endpoint().await;
        let previous = {
            let mut context = self.context.lock();
            context.endpoint = Some(resolved.clone());
            let previous = std::mem::replace(&mut context.cancel, CancellationToken::new());
            self.snapshot.send_modify(|snapshot| {
                snapshot.generation += 1;
                snapshot.state = ConnectionState::Unchecked;
                snapshot.message = None;
            });
            previous
        };
        previous.cancel();

        match &resolved {
            Ok(endpoint) => info!(base_url = %endpoint, "Endpoint reconfigured"),
            Err(err) => warn!(error = %err, "Endpoint reconfigured to an unusable value"),
        }
        resolved
    }

    /// Leave `AuthFailed` to collect new credentials
    ///
    /// Returns `false` when the controller is not in `AuthFailed`.
    pub fn enter_manual_login(&self) -> bool {
        if self.state() != ConnectionState::AuthFailed {
            return false;
        }
        self.context.lock().awaiting_credentials = true;
        info!("Awaiting manually entered credentials");
        true
    }

    /// Save new credentials and re-enter `CheckingConnectivity`
    ///
    /// The cached token belongs to the previous identity and is dropped.
    ///
    /// # Errors
    /// Returns the settings store failure when the credentials cannot be saved.
    pub async fn submit_credentials(&self, credentials: Credentials) -> Result<ConnectionState> {
        self.store.set(ConfigKey::Username, Some(credentials.username.as_str())).await?;
        self.store.set(ConfigKey::Password, Some(credentials.password.as_str())).await?;
        self.context.lock().awaiting_credentials = false;
        self.invalidate_token().await;
        Ok(self.run_if(|_, _| true).await)
    }

    /// React to a 401 on an authenticated call
    ///
    /// Drops `rejected` from memory and the settings store and moves
    /// `Authenticated` back to `Unchecked`. Nothing changes when a newer
    /// login already replaced the rejected token.
    pub async fn handle_unauthorized(&self, rejected: &AuthToken) {
        if !self.tokens.invalidate_if(rejected) {
            debug!("Ignoring 401 for a token that was already replaced");
            return;
        }
        warn!("Server refused the bearer token");
        if let Err(err) = self.persist_token(None).await {
            warn!(error = %err, "Failed to clear persisted bearer token");
        }
        self.snapshot.send_if_modified(|snapshot| {
            if snapshot.state != ConnectionState::Authenticated {
                return false;
            }
            snapshot.state = ConnectionState::Unchecked;
            snapshot.message = None;
            true
        });
    }

    async fn run_if(&self, should_run: impl FnOnce(ConnectionState, bool) -> bool) -> ConnectionState {
        let _guard = self.run_lock.lock().await;

        let state = self.state();
        if !should_run(state, self.tokens.is_valid()) {
            debug!(%state, "Nothing to do in current state");
            return state;
        }

        let (generation, cancel) = {
            let context = self.context.lock();
            (self.snapshot.borrow().generation, context.cancel.clone())
        };
        self.run_flow(generation, &cancel).await
    }

    async fn run_flow(&self, generation: u64, cancel: &CancellationToken) -> ConnectionState {
        if !self.publish(generation, ConnectionState::CheckingConnectivity, None) {
            return self.state();
        }

        self.seed_token().await;

        if !self.network.is_network_available() {
            return self.finish(generation, ConnectionState::Unreachable, MSG_NO_NETWORK);
        }

        let endpoint = match self.endpoint_for_run().await {
            Ok(endpoint) => endpoint,
            Err(err) => {
                return self.finish(generation, ConnectionState::Unreachable, &err.user_message())
            }
        };

        match self.probe(&endpoint, cancel).await {
            Ok(()) => {}
            Err(BeaconLinkError::Cancelled) => return self.state(),
            Err(err) => {
                return self.finish(generation, ConnectionState::Unreachable, &err.user_message())
            }
        }

        if self.tokens.is_valid() {
            info!(generation, "Reusing cached bearer token");
            return self.finish_ok(generation);
        }

        if !self.publish(generation, ConnectionState::Authenticating, None) {
            return self.state();
        }

        match self.login(&endpoint, cancel).await {
            Ok(token) => self.commit_token(generation, token).await,
            Err(BeaconLinkError::Cancelled) => self.state(),
            Err(err) => {
                warn!(generation, error = %err, "Login failed");
                self.finish(generation, ConnectionState::AuthFailed, &err.user_message())
            }
        }
    }

    async fn probe(&self, endpoint: &ServerEndpoint, cancel: &CancellationToken) -> Result<()> {
        let request = ApiRequest::get(self.probe.path.clone());
        match self.dispatcher.execute_cancellable(endpoint.base_url(), &request, cancel).await {
            Ok(response) if response.is_success() && response.body.contains(&self.probe.expect) => {
                debug!(base_url = %endpoint, "Connectivity probe succeeded");
                Ok(())
            }
            Ok(response) => {
                warn!(status = response.status, "Connectivity probe answered without marker");
                Err(BeaconLinkError::Unreachable(MSG_SERVER_UNREACHABLE.to_string()))
            }
            Err(DispatchError::Cancelled) => Err(BeaconLinkError::Cancelled),
            Err(err) => {
                warn!(error = %err, "Connectivity probe failed");
                Err(BeaconLinkError::Unreachable(format!("{MSG_SERVER_UNREACHABLE}: {err}")))
            }
        }
    }

    async fn login(&self, endpoint: &ServerEndpoint, cancel: &CancellationToken) -> Result<AuthToken> {
        let credentials = self.load_credentials().await?;
        credentials.ensure_username()?;

        let body = serde_json::to_string(&LoginRequest::from(&credentials))
            .map_err(|e| BeaconLinkError::Internal(format!("Failed to encode login body: {e}")))?;
        let request = ApiRequest::post_json(LOGIN_PATH, body);

        let response = self
            .dispatcher
            .execute_cancellable(endpoint.base_url(), &request, cancel)
            .await
            .map_err(BeaconLinkError::from)?;

        if !response.is_success() {
            return Err(BeaconLinkError::MalformedResponse(format!(
                "Login failed: unexpected HTTP {}",
                response.status
            )));
        }
        LoginResponse::parse_token(&response.body)
    }

    async fn commit_token(&self, generation: u64, token: AuthToken) -> ConnectionState {
        let committed = self.snapshot.send_if_modified(|snapshot| {
            if snapshot.generation != generation {
                return false;
            }
            self.tokens.replace(token.clone());
            snapshot.state = ConnectionState::Authenticated;
            snapshot.message = None;
            true
        });

        if !committed {
            debug!(generation, "Discarding login result of a superseded generation");
            return self.state();
        }

        if let Err(err) = self.persist_token(Some(&token)).await {
            warn!(error = %err, "Failed to persist bearer token");
        }
        info!(generation, "Authenticated");
        self.state()
    }

    /// Write `state` if `generation` is still current
    fn publish(&self, generation: u64, state: ConnectionState, message: Option<&str>) -> bool {
        let published = self.snapshot.send_if_modified(|snapshot| {
            if snapshot.generation != generation {
                return false;
            }
            snapshot.state = state;
            snapshot.message = message.map(str::to_string);
            true
        });
        if published {
            debug!(generation, %state, "State changed");
        }
        published
    }

    fn finish(&self, generation: u64, state: ConnectionState, message: &str) -> ConnectionState {
        self.publish(generation, state, Some(message));
        self.state()
    }

    fn finish_ok(&self, generation: u64) -> ConnectionState {
        self.publish(generation, ConnectionState::Authenticated, None);
        self.state()
    }

    async fn endpoint_for_run(&self) -> Result<ServerEndpoint> {
        let cached = self.context.lock().endpoint.clone();
        if let Some(resolved) = cached {
            return resolved;
        }
        let loaded = self.load_endpoint().await;
        self.context.lock().endpoint.get_or_insert(loaded).clone()
    }

    async fn load_endpoint(&self) -> Result<ServerEndpoint> {
        let host = self.store.get(ConfigKey::EndpointHost).await?;
        let port = self.store.get(ConfigKey::EndpointPort).await?;
        EndpointResolver::resolve_raw(host.as_deref(), port.as_deref())
    }

    async fn load_credentials(&self) -> Result<Credentials> {
        let username = self.store.get(ConfigKey::Username).await?.unwrap_or_default();
        let password = self.store.get(ConfigKey::Password).await?.unwrap_or_default();
        Ok(Credentials::new(username, password))
    }

    /// Pick up a token persisted by an earlier run
    async fn seed_token(&self) {
        if self.tokens.get().is_some() {
            return;
        }
        let stored = async {
            let value = self.store.get(ConfigKey::Token).await?;
            let expiry = self.store.get(ConfigKey::TokenExpiry).await?;
            Ok::<_, BeaconLinkError>(value.filter(|v| !v.is_empty()).map(|v| (v, expiry)))
        };
        match stored.await {
            Ok(Some((value, expiry))) => {
                debug!("Loaded persisted bearer token");
                self.tokens.set(value, expiry.unwrap_or_default());
            }
            Ok(None) => {}
            Err(err) => warn!(error = %err, "Failed to read persisted bearer token"),
        }
    }

    async fn persist_token(&self, token: Option<&AuthToken>) -> Result<()> {
        self.store.set(ConfigKey::Token, token.map(AuthToken::value)).await?;
        self.store.set(ConfigKey::TokenExpiry, token.map(AuthToken::expires_at)).await
    }

    async fn invalidate_token(&self) {
        self.tokens.invalidate();
        if let Err(err) = self.persist_token(None).await {
            warn!(error = %err, "Failed to clear persisted bearer token");
        }
    }
}
