//! Credentials, bearer tokens and the login exchange

use std::fmt;

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{MSG_EMPTY_USERNAME, MSG_NO_TOKEN, MSG_PARSE_FAILURE};
use crate::errors::{BeaconLinkError, Result};

/// Username and password used for the login exchange
///
/// `Debug` never prints the password.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: password.into() }
    }

    /// Login requires a non-empty username; the password may be empty
    pub fn ensure_username(&self) -> Result<()> {
        if self.username.is_empty() {
            Err(BeaconLinkError::Config(MSG_EMPTY_USERNAME.to_string()))
        } else {
            Ok(())
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Bearer token plus its expiry exactly as the server sent it
///
/// The expiry is kept as text, so a persisted token with an unparsable
/// expiry loads fine and is simply never valid.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken {
    value: String,
    expires_at: String,
}

impl AuthToken {
    pub fn new(value: impl Into<String>, expires_at: impl Into<String>) -> Self {
        Self { value: value.into(), expires_at: expires_at.into() }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn expires_at(&self) -> &str {
        &self.expires_at
    }

    /// Parsed ISO-8601 expiry with offset, `None` when unparsable
    pub fn expiry(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(self.expires_at.trim()).ok()
    }

    /// Non-empty value, parseable expiry, expiry strictly after `now`
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.value.is_empty()
            && self.expiry().is_some_and(|expiry| expiry.with_timezone(&Utc) > now)
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthToken")
            .field("value", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// `POST /api/login` body
#[derive(Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

impl<'a> From<&'a Credentials> for LoginRequest<'a> {
    fn from(credentials: &'a Credentials) -> Self {
        Self { username: &credentials.username, password: &credentials.password }
    }
}

/// `POST /api/login` success body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub expires: Option<String>,
}

impl LoginResponse {
    /// Parse a login body into a token
    ///
    /// A JSON body without a token, or with an empty one, is reported as a
    /// missing token. Anything else that cannot yield a token with a
    /// parseable expiry is malformed. An expiry in the past is accepted.
    pub fn parse_token(body: &str) -> Result<AuthToken> {
        let malformed = || BeaconLinkError::MalformedResponse(MSG_PARSE_FAILURE.to_string());

        let response: LoginResponse = serde_json::from_str(body).map_err(|_| malformed())?;
        let value = response
            .token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| BeaconLinkError::MalformedResponse(MSG_NO_TOKEN.to_string()))?;

        let token = AuthToken::new(value, response.expires.ok_or_else(malformed)?);
        if token.expiry().is_none() {
            return Err(malformed());
        }
        Ok(token)
    }
}
