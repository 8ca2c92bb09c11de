//! HTTP client for the identity provider. Login is a device-authorization style
//! handshake: request authorization, let the user approve at the provider, then
//! poll until the provider grants a delegation.

use super::{
    AuthClient,
    prompt::LoginPrompt,
    storage::IdentityStore,
    types::{
        AuthorizeRequest, AuthorizeResponse, DelegationResponse, Identity, LoginOptions,
        Principal,
    },
};
use crate::app_lib::{
    AppError,
    api::{post_empty, post_json, post_optional_json},
    runtime::{now_unix_secs, sleep},
};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::SecretString;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Remote provider used when the login options do not name one.
pub const DEFAULT_IDENTITY_PROVIDER: &str = "https://identity.ic0.app";

/// Floor for the provider-suggested polling interval.
const MIN_POLL_INTERVAL_MS: u64 = 10;

pub struct HttpAuthClient {
    http: Client,
    store: Box<dyn IdentityStore>,
    prompt: Box<dyn LoginPrompt>,
    application: String,
    default_provider: Url,
}

impl HttpAuthClient {
    pub fn new(
        http: Client,
        application: impl Into<String>,
        store: Box<dyn IdentityStore>,
        prompt: Box<dyn LoginPrompt>,
    ) -> Result<Self, AppError> {
        let default_provider = Url::parse(DEFAULT_IDENTITY_PROVIDER)
            .map_err(|err| AppError::Config(format!("Invalid default provider: {err}")))?;

        Ok(Self {
            http,
            store,
            prompt,
            application: application.into(),
            default_provider,
        })
    }

    /// Loads the stored identity, evicting it once expired.
    fn live_identity(&self) -> Result<Option<Identity>, AppError> {
        match self.store.load()? {
            Some(identity) if identity.is_expired_at(now_unix_secs()) => {
                debug!(principal = %identity.principal(), "Stored identity expired");
                self.store.clear()?;
                Ok(None)
            }
            other => Ok(other),
        }
    }
}

/// Replaces the path of a provider URL, keeping its query (`?canisterId=`).
fn provider_endpoint(provider: &Url, path: &str) -> Url {
    let mut url = provider.clone();
    url.set_path(path);
    url
}

#[async_trait(?Send)]
impl AuthClient for HttpAuthClient {
    async fn is_authenticated(&self) -> Result<bool, AppError> {
        Ok(self.live_identity()?.is_some())
    }

    fn identity(&self) -> Result<Option<Identity>, AppError> {
        self.live_identity()
    }

    fn prepare_login(&self) -> Result<(), AppError> {
        self.prompt.prepare()
    }

    #[instrument(skip_all)]
    async fn login(&self, options: &LoginOptions) -> Result<Identity, AppError> {
        let provider = options
            .identity_provider
            .clone()
            .unwrap_or_else(|| self.default_provider.clone());

        let request = AuthorizeRequest {
            application: self.application.clone(),
        };
        let authorize_url = provider_endpoint(&provider, "/v1/authorize");
        let pending: AuthorizeResponse =
            post_json(&self.http, authorize_url.as_str(), &request, None).await?;

        self.prompt.open(&pending.verification_uri)?;

        let token_url = provider_endpoint(
            &provider,
            &format!("/v1/authorize/{}/token", pending.request_id),
        );
        let interval_ms = pending.interval_ms.max(MIN_POLL_INTERVAL_MS);
        let mut waited_ms = 0u64;

        loop {
            let granted: Option<DelegationResponse> =
                post_optional_json(&self.http, token_url.as_str()).await?;

            if let Some(granted) = granted {
                let identity = Identity::new(
                    Principal::new(granted.principal),
                    SecretString::from(granted.delegation),
                    granted.expires_at,
                    provider,
                );
                self.store.save(&identity)?;
                info!(principal = %identity.principal(), "Signed in");
                return Ok(identity);
            }

            if waited_ms >= pending.expires_in_ms {
                warn!(
                    request_id = %pending.request_id,
                    "Authorization request was not approved in time"
                );
                return Err(AppError::Timeout(
                    "Sign-in was not completed in time.".to_string(),
                ));
            }

            sleep(Duration::from_millis(interval_ms)).await;
            waited_ms = waited_ms.saturating_add(interval_ms);
        }
    }

    async fn logout(&self) -> Result<(), AppError> {
        let stored = self.store.load()?;
        self.store.clear()?;

        let Some(identity) = stored else {
            return Ok(());
        };

        let logout_url = provider_endpoint(identity.issuer(), "/v1/logout");
        post_empty(&self.http, logout_url.as_str(), Some(identity.delegation())).await?;
        info!(principal = %identity.principal(), "Signed out");
        Ok(())
    }
}
