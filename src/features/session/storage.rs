//! Persistence for the signed-in identity, so a reload keeps the session until
//! the delegation expires. The browser store uses `localStorage`; the memory
//! store backs native runs and tests.

use super::types::Identity;
use crate::app_lib::AppError;
use std::{cell::RefCell, rc::Rc};

pub trait IdentityStore {
    fn load(&self) -> Result<Option<Identity>, AppError>;
    fn save(&self, identity: &Identity) -> Result<(), AppError>;
    fn clear(&self) -> Result<(), AppError>;
}

/// In-memory store; clones share the same slot.
#[derive(Clone, Default)]
pub struct MemoryIdentityStore {
    slot: Rc<RefCell<Option<Identity>>>,
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdentityStore for MemoryIdentityStore {
    fn load(&self) -> Result<Option<Identity>, AppError> {
        Ok(self.slot.borrow().clone())
    }

    fn save(&self, identity: &Identity) -> Result<(), AppError> {
        *self.slot.borrow_mut() = Some(identity.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), AppError> {
        self.slot.borrow_mut().take();
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserIdentityStore;

#[cfg(target_arch = "wasm32")]
mod browser {
    use super::IdentityStore;
    use crate::app_lib::AppError;
    use crate::features::session::types::{Identity, Principal};
    use secrecy::{ExposeSecret, SecretString};
    use serde::{Deserialize, Serialize};
    use url::Url;
    use web_sys::Storage;

    #[derive(Serialize, Deserialize)]
    struct StoredIdentity {
        principal: String,
        delegation: String,
        expires_at: u64,
        issuer: String,
    }

    /// `localStorage`-backed store keyed per application.
    pub struct BrowserIdentityStore {
        key: String,
    }

    impl BrowserIdentityStore {
        pub fn new(application: &str) -> Self {
            Self {
                key: format!("{application}.identity"),
            }
        }

        fn storage() -> Result<Storage, AppError> {
            web_sys::window()
                .ok_or_else(|| AppError::Storage("No browser window.".to_string()))?
                .local_storage()
                .map_err(|_| AppError::Storage("localStorage is not accessible.".to_string()))?
                .ok_or_else(|| AppError::Storage("localStorage is unavailable.".to_string()))
        }
    }

    impl IdentityStore for BrowserIdentityStore {
        fn load(&self) -> Result<Option<Identity>, AppError> {
            let raw = Self::storage()?
                .get_item(&self.key)
                .map_err(|_| AppError::Storage("Failed to read the stored identity.".to_string()))?;
            let Some(raw) = raw else {
                return Ok(None);
            };

            let stored: StoredIdentity = serde_json::from_str(&raw)
                .map_err(|err| AppError::Storage(format!("Stored identity is corrupt: {err}")))?;
            let issuer = Url::parse(&stored.issuer)
                .map_err(|err| AppError::Storage(format!("Stored issuer is invalid: {err}")))?;

            Ok(Some(Identity::new(
                Principal::new(stored.principal),
                SecretString::from(stored.delegation),
                stored.expires_at,
                issuer,
            )))
        }

        fn save(&self, identity: &Identity) -> Result<(), AppError> {
            let stored = StoredIdentity {
                principal: identity.principal().to_string(),
                delegation: identity.delegation().expose_secret().to_string(),
                expires_at: identity.expires_at(),
                issuer: identity.issuer().to_string(),
            };
            let raw = serde_json::to_string(&stored).map_err(|err| {
                AppError::Serialization(format!("Failed to encode identity: {err}"))
            })?;

            Self::storage()?
                .set_item(&self.key, &raw)
                .map_err(|_| AppError::Storage("Failed to persist the identity.".to_string()))
        }

        fn clear(&self) -> Result<(), AppError> {
            Self::storage()?
                .remove_item(&self.key)
                .map_err(|_| AppError::Storage("Failed to clear the stored identity.".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{IdentityStore, MemoryIdentityStore};
    use crate::test_support::identity;

    #[test]
    fn memory_store_clones_share_the_slot() {
        let store = MemoryIdentityStore::new();
        let handle = store.clone();

        store.save(&identity("aaaaa-aa", u64::MAX)).unwrap();
        let loaded = handle.load().unwrap().unwrap();
        assert_eq!(loaded.principal().as_str(), "aaaaa-aa");

        handle.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }
}
