//! Authenticated API calls
//!
//! Requests attach the cached bearer token. Without a valid token a call
//! fails with `BeaconLinkError::TokenExpired` before touching the network.

use std::sync::Arc;

use beaconlink_domain::{BeaconLinkError, Result};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::auth::AuthenticationController;
use crate::transport::ApiRequest;

/// Issues authenticated requests on behalf of an [`AuthenticationController`]
#[derive(Clone)]
pub struct ApiSession {
    controller: Arc<AuthenticationController>,
}

impl ApiSession {
    pub fn new(controller: Arc<AuthenticationController>) -> Self {
        Self { controller }
    }

    pub fn controller(&self) -> &Arc<AuthenticationController> {
        &self.controller
    }

    /// `GET path` with the bearer token; returns the response body
    pub async fn get_with_token(&self, path: &str) -> Result<String> {
        self.send(ApiRequest::get(path)).await
    }

    /// `POST path` with a JSON body and the bearer token
    pub async fn post_with_token(&self, path: &str, body: &str) -> Result<String> {
        self.send(ApiRequest::post_json(path, body)).await
    }

    /// Send `request`, re-authenticating once when no valid token is cached
    pub async fn send_with_reauth(&self, request: ApiRequest) -> Result<String> {
        match self.send(request.clone()).await {
            Err(BeaconLinkError::TokenExpired) => {
                info!("No valid token, re-authenticating before the call");
                if self.controller.activate().await.is_authenticated() {
                    self.send(request).await
                } else {
                    Err(BeaconLinkError::TokenExpired)
                }
            }
            other => other,
        }
    }

    /// Send `request` and decode the JSON body
    pub async fn get_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let body = self.send_with_reauth(request).await?;
        serde_json::from_str(&body)
            .map_err(|e| BeaconLinkError::MalformedResponse(format!("Invalid JSON body: {e}")))
    }

    async fn send(&self, request: ApiRequest) -> Result<String> {
        let token = self.controller.token_store().valid_token().ok_or(BeaconLinkError::TokenExpired)?;
        let endpoint = self
            .controller
            .endpoint()
            .ok_or_else(|| BeaconLinkError::Config("Endpoint has not been resolved".to_string()))?;
        let cancel = self.controller.cancellation();
        let request = request.with_bearer(token.value());

        debug!(method = %request.method, path = %request.path, "Sending authenticated request");
        let result = self
            .controller
            .dispatcher()
            .execute_cancellable(endpoint.base_url(), &request, &cancel)
            .await
            .map_err(BeaconLinkError::from);

        match result {
            Ok(response) if response.is_success() => Ok(response.body),
            Ok(response) => Err(BeaconLinkError::MalformedResponse(format!(
                "Unexpected HTTP {} for {}",
                response.status, request.path
            ))),
            Err(err) => {
                if err.is_unauthorized() {
                    self.controller.handle_unauthorized(&token).await;
                }
                Err(err)
            }
        }
    }
}
