//! Integration tests for the authentication state machine

mod support;

use std::time::Duration;

use beaconlink_domain::constants::{
    MSG_EMPTY_USERNAME, MSG_NO_NETWORK, MSG_NO_TOKEN, MSG_PARSE_FAILURE, MSG_SERVER_UNREACHABLE,
};
use beaconlink_domain::{ConfigKey, ConnectionState, Credentials, ProbeConfig};
use support::{
    configured_store, harness, harness_with_probe, Gate, InMemoryStore, Step, EXPIRED_LOGIN,
    VALID_LOGIN,
};

/// Validates the full probe-then-login happy path.
#[tokio::test]
async fn test_probe_then_login_reaches_authenticated() {
    let h = harness(configured_store());
    h.transport.respond("/ping", 200, "pong").respond("/api/login", 200, VALID_LOGIN);

    let state = h.controller.activate().await;

    assert_eq!(state, ConnectionState::Authenticated);
    assert!(h.controller.token_store().is_valid());
    assert_eq!(h.store.value(ConfigKey::Token).as_deref(), Some("abc"));
    assert_eq!(h.store.value(ConfigKey::TokenExpiry).as_deref(), Some("2099-01-01T00:00:00Z"));

    let login = h.transport.requests().into_iter().find(|r| r.request.path == "/api/login").unwrap();
    assert_eq!(login.base_url, "https://10.0.0.5:8443");
    assert_eq!(login.request.body.as_deref(), Some(r#"{"username":"operator","password":"hunter2"}"#));
    assert_eq!(login.request.content_type.as_deref(), Some("application/json; charset=utf-8"));
    assert!(login.request.bearer.is_none());
}

/// Validates a failing probe never reaches Authenticating.
#[tokio::test]
async fn test_failing_probe_reaches_unreachable_without_login() {
    let h = harness(configured_store());
    for _ in 0..4 {
        h.transport.respond("/ping", 503, "");
    }
    let mut states = h.controller.subscribe();

    let state = h.controller.activate().await;

    assert_eq!(state, ConnectionState::Unreachable);
    assert_eq!(h.transport.count("/api/login"), 0);
    assert_eq!(h.transport.count("/ping"), 4);
    assert_eq!(h.sleeper.delays().len(), 3);
    let snapshot = states.borrow_and_update().clone();
    assert_eq!(snapshot.state, ConnectionState::Unreachable);
    assert!(snapshot.message.unwrap().starts_with(MSG_SERVER_UNREACHABLE));
}

/// Validates probe returning "pang" scenario.
#[tokio::test]
async fn test_probe_without_pong_is_unreachable() {
    let h = harness(configured_store());
    h.transport.respond("/ping", 200, "pang");

    assert_eq!(h.controller.activate().await, ConnectionState::Unreachable);
    assert_eq!(h.transport.count("/api/login"), 0);
}

/// Validates that a marker embedded in a longer body is accepted.
#[tokio::test]
async fn test_probe_body_containing_pong_is_reachable() {
    let h = harness(configured_store());
    h.transport.respond("/ping", 200, r#"{"reply":"pong"}"#).respond("/api/login", 200, VALID_LOGIN);

    assert_eq!(h.controller.activate().await, ConnectionState::Authenticated);
}

/// Validates token reuse without an additional login call.
#[tokio::test]
async fn test_valid_cached_token_skips_login() {
    let store = configured_store()
        .with(ConfigKey::Token, "cached")
        .with(ConfigKey::TokenExpiry, "2099-01-01T00:00:00Z");
    let h = harness(store);
    h.transport.respond("/ping", 200, "pong");

    assert_eq!(h.controller.activate().await, ConnectionState::Authenticated);
    assert_eq!(h.transport.count("/api/login"), 0);
    assert_eq!(h.controller.token_store().get().unwrap().value(), "cached");
}

/// Validates that an expired persisted token triggers a login.
#[tokio::test]
async fn test_expired_cached_token_triggers_login() {
    let store = configured_store()
        .with(ConfigKey::Token, "stale")
        .with(ConfigKey::TokenExpiry, "2001-01-01T00:00:00Z");
    let h = harness(store);
    h.transport.respond("/ping", 200, "pong").respond("/api/login", 200, VALID_LOGIN);

    assert_eq!(h.controller.activate().await, ConnectionState::Authenticated);
    assert_eq!(h.transport.count("/api/login"), 1);
    assert_eq!(h.controller.token_store().get().unwrap().value(), "abc");
}

/// Validates a login response whose expiry is already in the past.
#[tokio::test]
async fn test_login_with_past_expiry_stores_invalid_token() {
    let h = harness(configured_store());
    h.transport.respond("/ping", 200, "pong").respond("/api/login", 200, EXPIRED_LOGIN);

    assert_eq!(h.controller.activate().await, ConnectionState::Authenticated);
    assert!(!h.controller.token_store().is_valid());
    assert_eq!(h.controller.token_store().get().unwrap().value(), "abc");
}

/// Validates the missing-token login failure message.
#[tokio::test]
async fn test_login_without_token_is_auth_failed() {
    let h = harness(configured_store());
    h.transport.respond("/ping", 200, "pong").respond("/api/login", 200, r#"{"status":"ok"}"#);

    assert_eq!(h.controller.activate().await, ConnectionState::AuthFailed);
    assert_eq!(h.controller.snapshot().message.as_deref(), Some(MSG_NO_TOKEN));
    assert!(!h.controller.token_store().is_valid());
}

/// Validates that an empty token in a 2xx login answer is a failure.
#[tokio::test]
async fn test_login_with_empty_token_is_auth_failed() {
    let h = harness(configured_store());
    h.transport
        .respond("/ping", 200, "pong")
        .respond("/api/login", 200, r#"{"token":"","expires":"2099-01-01T00:00:00Z"}"#);

    assert_eq!(h.controller.activate().await, ConnectionState::AuthFailed);
    assert_eq!(h.controller.snapshot().message.as_deref(), Some(MSG_NO_TOKEN));
    assert!(h.controller.token_store().get().is_none());
    assert_eq!(h.store.value(ConfigKey::Token), None);
}

/// Validates that an unparsable expiry in a 2xx login answer is a failure.
#[tokio::test]
async fn test_login_with_unparsable_expiry_is_auth_failed() {
    let h = harness(configured_store());
    h.transport
        .respond("/ping", 200, "pong")
        .respond("/api/login", 200, r#"{"token":"abc","expires":"soon"}"#);

    assert_eq!(h.controller.activate().await, ConnectionState::AuthFailed);
    assert_eq!(h.controller.snapshot().message.as_deref(), Some(MSG_PARSE_FAILURE));
    assert!(h.controller.token_store().get().is_none());
    assert_eq!(h.store.value(ConfigKey::Token), None);
}

/// Validates that an empty username fails before any login request.
#[tokio::test]
async fn test_empty_username_is_auth_failed_without_request() {
    let h = harness(InMemoryStore::endpoint("10.0.0.5", "8443"));
    h.transport.respond("/ping", 200, "pong");

    assert_eq!(h.controller.activate().await, ConnectionState::AuthFailed);
    assert_eq!(h.controller.snapshot().message.as_deref(), Some(MSG_EMPTY_USERNAME));
    assert_eq!(h.transport.count("/api/login"), 0);
}

/// Validates that a rejected login surfaces the server message once.
#[tokio::test]
async fn test_rejected_login_surfaces_server_message() {
    let h = harness(configured_store());
    h.transport.respond("/ping", 200, "pong").respond("/api/login", 401, "Invalid credentials");

    assert_eq!(h.controller.activate().await, ConnectionState::AuthFailed);
    assert_eq!(h.controller.snapshot().message.as_deref(), Some("Invalid credentials"));
    assert_eq!(h.transport.count("/api/login"), 1);
}

/// Validates that an empty base address is unreachable without I/O.
#[tokio::test]
async fn test_empty_endpoint_is_unreachable() {
    let h = harness(InMemoryStore::default().with(ConfigKey::Username, "operator"));

    assert_eq!(h.controller.activate().await, ConnectionState::Unreachable);
    assert!(h.transport.requests().is_empty());
}

/// Validates the network oracle short-circuit.
#[tokio::test]
async fn test_no_network_is_unreachable_without_request() {
    let h = harness(configured_store());
    h.network.set(false);

    assert_eq!(h.controller.activate().await, ConnectionState::Unreachable);
    assert_eq!(h.controller.snapshot().message.as_deref(), Some(MSG_NO_NETWORK));
    assert!(h.transport.requests().is_empty());
}

/// Validates manual retry after the server comes back.
#[tokio::test]
async fn test_retry_from_unreachable_re_probes() {
    let h = harness(configured_store());
    h.network.set(false);
    assert_eq!(h.controller.activate().await, ConnectionState::Unreachable);

    // activation is not a retry
    assert_eq!(h.controller.activate().await, ConnectionState::Unreachable);

    h.network.set(true);
    h.transport.respond("/ping", 200, "pong").respond("/api/login", 200, VALID_LOGIN);
    assert_eq!(h.controller.retry().await, ConnectionState::Authenticated);

    // nothing to retry once authenticated
    assert_eq!(h.controller.retry().await, ConnectionState::Authenticated);
    assert_eq!(h.transport.count("/ping"), 1);
}

/// Validates the manual login escape hatch.
#[tokio::test]
async fn test_manual_login_after_auth_failure() {
    let h = harness(configured_store());
    h.transport.respond("/ping", 200, "pong").respond("/api/login", 403, "locked");
    assert_eq!(h.controller.activate().await, ConnectionState::AuthFailed);

    assert!(h.controller.enter_manual_login());
    assert!(h.controller.is_awaiting_credentials());

    h.transport.respond("/ping", 200, "pong").respond("/api/login", 200, VALID_LOGIN);
    let state = h.controller.submit_credentials(Credentials::new("admin", "s3cret")).await.unwrap();

    assert_eq!(state, ConnectionState::Authenticated);
    assert!(!h.controller.is_awaiting_credentials());
    assert_eq!(h.store.value(ConfigKey::Username).as_deref(), Some("admin"));
    let last = h.transport.requests().pop().unwrap();
    assert!(last.request.body.unwrap().contains(r#""username":"admin""#));
}

/// Validates that manual login is refused outside AuthFailed.
#[tokio::test]
async fn test_manual_login_requires_auth_failed() {
    let h = harness(configured_store());
    assert!(!h.controller.enter_manual_login());
}

/// Validates that a reconfiguration discards an in-flight probe.
#[tokio::test]
async fn test_reconfigure_cancels_in_flight_run() {
    let h = harness(configured_store());
    h.transport.push("/ping", Step::Hang);

    let run = {
        let controller = h.controller.clone();
        tokio::spawn(async move { controller.activate().await })
    };
    h.transport.wait_for_request().await;
    assert_eq!(h.controller.state(), ConnectionState::CheckingConnectivity);

    h.store.put(ConfigKey::EndpointHost, "control.example");
    h.store.put(ConfigKey::EndpointPort, "443");
    let endpoint = h.controller.reconfigure().await.unwrap();
    assert_eq!(endpoint.base_url(), "https://control.example");

    run.await.unwrap();
    let snapshot = h.controller.snapshot();
    assert_eq!(snapshot.state, ConnectionState::Unchecked);
    assert_eq!(snapshot.generation, 1);

    h.transport.respond("/ping", 200, "pong").respond("/api/login", 200, VALID_LOGIN);
    assert_eq!(h.controller.activate().await, ConnectionState::Authenticated);
    let last = h.transport.requests().pop().unwrap();
    assert_eq!(last.base_url, "https://control.example");
}

/// Validates that a cancelled backoff does not finish the stale run.
#[tokio::test]
async fn test_reconfigure_during_backoff_keeps_new_state() {
    let h = harness(configured_store());
    h.transport.push("/ping", Step::Respond(503, String::new())).push("/ping", Step::Hang);

    let run = {
        let controller = h.controller.clone();
        tokio::spawn(async move { controller.activate().await })
    };
    while h.transport.count("/ping") < 2 {
        h.transport.wait_for_request().await;
    }
    h.controller.reconfigure().await.unwrap();

    assert_eq!(run.await.unwrap(), ConnectionState::Unchecked);
    assert_eq!(h.controller.snapshot().generation, 1);
    assert_eq!(h.sleeper.delays(), vec![Duration::from_millis(500)]);
}

/// Validates that overlapping reconfigurations keep the most recent settings.
#[tokio::test]
async fn test_overlapping_reconfigure_keeps_latest_settings() {
    let h = harness(configured_store());
    let gate = Gate::new();
    h.store.hold_next_read(ConfigKey::EndpointHost, gate.clone());

    let first = {
        let controller = h.controller.clone();
        tokio::spawn(async move { controller.reconfigure().await })
    };
    gate.wait_arrived().await;

    h.store.put(ConfigKey::EndpointHost, "control.example");
    let second = {
        let controller = h.controller.clone();
        tokio::spawn(async move { controller.reconfigure().await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    gate.open();

    assert_eq!(first.await.unwrap().unwrap().base_url(), "https://10.0.0.5:8443");
    assert_eq!(second.await.unwrap().unwrap().base_url(), "https://control.example:8443");
    assert_eq!(h.controller.endpoint().unwrap().base_url(), "https://control.example:8443");
    assert_eq!(h.controller.snapshot().generation, 2);
}

/// Validates that an invalid port surfaces from reconfigure.
#[tokio::test]
async fn test_reconfigure_with_invalid_port_reports_error() {
    let h = harness(configured_store());
    h.store.put(ConfigKey::EndpointPort, "0");

    assert!(h.controller.reconfigure().await.is_err());
    assert_eq!(h.controller.activate().await, ConnectionState::Unreachable);
    assert!(h.transport.requests().is_empty());
}

/// Validates a custom probe configuration.
#[tokio::test]
async fn test_custom_probe_path_and_marker() {
    let probe = ProbeConfig { path: "health".into(), expect: "alive".into() };
    let h = harness_with_probe(configured_store(), probe);
    h.transport.respond("health", 200, "alive").respond("/api/login", 200, VALID_LOGIN);

    assert_eq!(h.controller.activate().await, ConnectionState::Authenticated);
}

/// Validates that re-activation after expiry re-authenticates.
#[tokio::test]
async fn test_activation_after_token_expiry_logs_in_again() {
    let h = harness(configured_store());
    let soon = (chrono::Utc::now() + chrono::Duration::seconds(60)).to_rfc3339();
    let login = format!(r#"{{"token":"short","expires":"{soon}"}}"#);
    h.transport.respond("/ping", 200, "pong").respond("/api/login", 200, &login);
    assert_eq!(h.controller.activate().await, ConnectionState::Authenticated);

    h.clock.advance(Duration::from_secs(120));
    h.transport.respond("/ping", 200, "pong").respond("/api/login", 200, VALID_LOGIN);

    assert_eq!(h.controller.activate().await, ConnectionState::Authenticated);
    assert_eq!(h.transport.count("/api/login"), 2);
    assert_eq!(h.controller.token_store().get().unwrap().value(), "abc");
}
