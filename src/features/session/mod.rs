//! Session feature: the authentication client and the signed-in session.
//!
//! The [`SessionManager`] owns one [`AuthClient`] for the life of the page and
//! pushes every identity change into the [`TransportBinder`], which is the only
//! way backend calls pick up (or lose) the caller's credentials. Delegations
//! flow through here; never log them.
//!
//! Flow Overview: startup asks the client for a still-valid stored identity and
//! binds it silently. Sign-in runs the provider's interactive login and binds
//! the result. Sign-out revokes at the provider, then unbinds and clears the
//! session even when revocation fails.

pub mod client;
pub mod prompt;
pub mod storage;
pub mod types;

pub use client::HttpAuthClient;
pub use prompt::{LogPrompt, LoginPrompt};
pub use storage::{IdentityStore, MemoryIdentityStore};
pub use types::{Identity, LoginOptions, Principal, Session};

use crate::{app_lib::AppError, features::transport::TransportBinder};
use async_trait::async_trait;
use std::{cell::RefCell, rc::Rc};
use tracing::{debug, warn};

/// Client for the external identity provider.
#[async_trait(?Send)]
pub trait AuthClient {
    /// Whether a previously established session is still valid.
    async fn is_authenticated(&self) -> Result<bool, AppError>;

    /// The identity of the current session, if any.
    fn identity(&self) -> Result<Option<Identity>, AppError>;

    /// Synchronous part of login that must run inside the user's gesture.
    fn prepare_login(&self) -> Result<(), AppError> {
        Ok(())
    }

    /// Runs the interactive login and returns the resulting identity.
    async fn login(&self, options: &LoginOptions) -> Result<Identity, AppError>;

    async fn logout(&self) -> Result<(), AppError>;
}

pub struct SessionManager {
    client: Rc<dyn AuthClient>,
    binder: TransportBinder,
    options: LoginOptions,
    session: RefCell<Session>,
}

impl SessionManager {
    pub fn new(client: Rc<dyn AuthClient>, binder: TransportBinder, options: LoginOptions) -> Self {
        Self {
            client,
            binder,
            options,
            session: RefCell::new(Session::default()),
        }
    }

    pub fn session(&self) -> Session {
        self.session.borrow().clone()
    }

    /// Restores a prior session on startup. Failures leave the page signed out.
    pub async fn check_session(&self) -> Session {
        match self.restore().await {
            Ok(Some(principal)) => {
                debug!(%principal, "Restored existing session");
                *self.session.borrow_mut() = Session::authenticated(principal);
            }
            Ok(None) => debug!("No existing session"),
            Err(err) => debug!(error = %err, "Session check failed; continuing signed out"),
        }
        self.session()
    }

    async fn restore(&self) -> Result<Option<Principal>, AppError> {
        if !self.client.is_authenticated().await? {
            return Ok(None);
        }
        let Some(identity) = self.client.identity()? else {
            return Ok(None);
        };
        Ok(self.binder.bind(Some(&identity)))
    }

    /// Readies the interactive login from the sign-in click. A failure here is
    /// not fatal; `sign_in` reports it if the login cannot proceed.
    pub fn prepare_sign_in(&self) {
        if let Err(err) = self.client.prepare_login() {
            warn!(error = %err, "Could not prepare sign-in");
        }
    }

    /// Runs the interactive login and binds the resulting identity.
    pub async fn sign_in(&self) -> Result<Principal, AppError> {
        let identity = self
            .client
            .login(&self.options)
            .await
            .inspect_err(|err| warn!(error = %err, "Sign-in failed"))?;

        self.binder.bind(Some(&identity));
        let principal = identity.principal().clone();
        *self.session.borrow_mut() = Session::authenticated(principal.clone());
        Ok(principal)
    }

    /// Logs out at the provider, then unbinds and clears the session regardless.
    pub async fn sign_out(&self) -> Result<(), AppError> {
        let result = self.client.logout().await;

        self.binder.bind(None);
        *self.session.borrow_mut() = Session::default();

        result.inspect_err(|err| warn!(error = %err, "Provider logout failed"))
    }
}

#[cfg(test)]
mod tests {
    use super::{LoginOptions, SessionManager};
    use crate::app_lib::AppError;
    use crate::features::transport::TransportBinder;
    use crate::test_support::{FakeAuthClient, InMemoryBackend, identity};
    use std::rc::Rc;

    fn manager(client: &Rc<FakeAuthClient>) -> (SessionManager, TransportBinder) {
        let backend = Rc::new(InMemoryBackend::new());
        let binder = TransportBinder::new(backend.connector());
        let manager = SessionManager::new(client.clone(), binder.clone(), LoginOptions::default());
        (manager, binder)
    }

    #[tokio::test]
    async fn check_session_binds_a_restored_identity() {
        let client = Rc::new(FakeAuthClient::signed_in(identity("aaaaa-aa", u64::MAX)));
        let (manager, binder) = manager(&client);

        let session = manager.check_session().await;

        assert!(session.is_logged_in);
        assert_eq!(session.principal.unwrap().as_str(), "aaaaa-aa");
        assert!(binder.current().is_ok());
    }

    #[tokio::test]
    async fn check_session_failure_degrades_to_signed_out() {
        let client = Rc::new(FakeAuthClient::new());
        client.fail_check(AppError::Storage("corrupt".to_string()));
        let (manager, binder) = manager(&client);

        let session = manager.check_session().await;

        assert!(!session.is_logged_in);
        assert_eq!(binder.current().err(), Some(AppError::Unauthenticated));
    }

    #[tokio::test]
    async fn prepare_sign_in_reaches_the_client_without_binding() {
        let client = Rc::new(FakeAuthClient::new());
        client.grant(identity("aaaaa-aa", u64::MAX));
        let (manager, binder) = manager(&client);

        manager.prepare_sign_in();

        assert_eq!(client.prepared(), 1);
        assert!(!manager.session().is_logged_in);
        assert!(binder.current().is_err());
    }

    #[tokio::test]
    async fn sign_in_failure_stays_signed_out() {
        let client = Rc::new(FakeAuthClient::new());
        client.fail_login(AppError::Timeout("closed".to_string()));
        let (manager, binder) = manager(&client);

        let result = manager.sign_in().await;

        assert!(matches!(result, Err(AppError::Timeout(_))));
        assert!(!manager.session().is_logged_in);
        assert!(binder.current().is_err());
    }

    #[tokio::test]
    async fn sign_out_clears_session_even_when_provider_fails() {
        let client = Rc::new(FakeAuthClient::new());
        client.grant(identity("aaaaa-aa", u64::MAX));
        let (manager, binder) = manager(&client);

        manager.sign_in().await.unwrap();
        assert!(manager.session().is_logged_in);

        client.fail_logout(AppError::Network("offline".to_string()));
        let result = manager.sign_out().await;

        assert!(matches!(result, Err(AppError::Network(_))));
        assert_eq!(manager.session().principal, None);
        assert!(!manager.session().is_logged_in);
        assert_eq!(binder.principal(), None);
        assert_eq!(binder.current().err(), Some(AppError::Unauthenticated));
    }
}
