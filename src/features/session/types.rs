use crate::app_lib::{AppConfig, AppError};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Textual identifier of an authenticated caller.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// An authenticated caller: the principal plus the delegation that lets the
/// backend verify calls made on its behalf.
#[derive(Clone, Debug)]
pub struct Identity {
    principal: Principal,
    delegation: SecretString,
    expires_at: u64,
    issuer: Url,
}

impl Identity {
    pub fn new(
        principal: Principal,
        delegation: SecretString,
        expires_at: u64,
        issuer: Url,
    ) -> Self {
        Self {
            principal,
            delegation,
            expires_at,
            issuer,
        }
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    /// Bearer credential; never log it.
    pub fn delegation(&self) -> &SecretString {
        &self.delegation
    }

    /// Unix seconds after which the delegation is no longer accepted.
    pub fn expires_at(&self) -> u64 {
        self.expires_at
    }

    /// Identity provider that issued the delegation.
    pub fn issuer(&self) -> &Url {
        &self.issuer
    }

    pub fn is_expired_at(&self, now_unix_secs: u64) -> bool {
        self.expires_at <= now_unix_secs
    }
}

/// Signed-in state shown by the page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    pub is_logged_in: bool,
    pub principal: Option<Principal>,
}

impl Session {
    pub fn authenticated(principal: Principal) -> Self {
        Self {
            is_logged_in: true,
            principal: Some(principal),
        }
    }
}

/// Options for the interactive login.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoginOptions {
    /// `None` uses the auth client's default provider.
    pub identity_provider: Option<Url>,
}

impl LoginOptions {
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        Ok(Self {
            identity_provider: config.identity_provider()?,
        })
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuthorizeRequest {
    pub application: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuthorizeResponse {
    pub request_id: String,
    pub verification_uri: String,
    pub interval_ms: u64,
    pub expires_in_ms: u64,
}

/// Delegation granted once the user approves an authorization request.
#[derive(Clone, Serialize, Deserialize)]
pub struct DelegationResponse {
    pub principal: String,
    pub delegation: String,
    pub expires_at: u64,
}

impl fmt::Debug for DelegationResponse {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("DelegationResponse")
            .field("principal", &self.principal)
            .field("delegation", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
