//! Backend proxy binding. The binder holds the single active [`Transport`], an
//! identity-scoped handle to the student backend. It is passed explicitly to the
//! session manager (which writes it) and the record controller (which reads it).
//!
//! Every bind or unbind bumps a generation counter and stamps it on the new
//! transport, so a call that started on a replaced transport can tell when it
//! settles and discard its result.

use crate::{
    app_lib::AppError,
    features::{
        records::{HttpStudentBackend, StudentBackend},
        session::{Identity, Principal},
    },
};
use reqwest::Client;
use std::{cell::RefCell, rc::Rc};
use tracing::debug;

/// Builds a backend handle scoped to one identity.
pub trait BackendConnector {
    fn connect(&self, identity: &Identity) -> Rc<dyn StudentBackend>;
}

/// Connects [`HttpStudentBackend`]s that share one HTTP client.
pub struct HttpBackendConnector {
    http: Client,
    base_url: String,
}

impl HttpBackendConnector {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

impl BackendConnector for HttpBackendConnector {
    fn connect(&self, identity: &Identity) -> Rc<dyn StudentBackend> {
        Rc::new(HttpStudentBackend::new(
            self.http.clone(),
            self.base_url.clone(),
            identity.delegation().clone(),
        ))
    }
}

/// A bound backend handle and the generation it was bound under.
#[derive(Clone)]
pub struct Transport {
    generation: u64,
    principal: Principal,
    backend: Rc<dyn StudentBackend>,
}

impl Transport {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    pub fn backend(&self) -> &dyn StudentBackend {
        self.backend.as_ref()
    }
}

#[derive(Default)]
struct Slot {
    generation: u64,
    active: Option<Transport>,
}

/// Cheap cloneable handle; clones share the same slot.
#[derive(Clone)]
pub struct TransportBinder {
    connector: Rc<dyn BackendConnector>,
    slot: Rc<RefCell<Slot>>,
}

impl TransportBinder {
    pub fn new(connector: Rc<dyn BackendConnector>) -> Self {
        Self {
            connector,
            slot: Rc::new(RefCell::new(Slot::default())),
        }
    }

    /// Installs a transport for `identity`, or clears it when `None`.
    /// Returns the principal now shown to the user.
    pub fn bind(&self, identity: Option<&Identity>) -> Option<Principal> {
        let transport = identity
            .map(|identity| (identity.principal().clone(), self.connector.connect(identity)));

        let mut slot = self.slot.borrow_mut();
        slot.generation = slot.generation.wrapping_add(1);
        let generation = slot.generation;

        match transport {
            Some((principal, backend)) => {
                debug!(%principal, generation, "Bound backend transport");
                slot.active = Some(Transport {
                    generation,
                    principal: principal.clone(),
                    backend,
                });
                Some(principal)
            }
            None => {
                debug!(generation, "Unbound backend transport");
                slot.active = None;
                None
            }
        }
    }

    /// The active transport; fails fast while signed out.
    pub fn current(&self) -> Result<Transport, AppError> {
        self.slot
            .borrow()
            .active
            .clone()
            .ok_or(AppError::Unauthenticated)
    }

    /// Whether `transport` is still the active one.
    pub fn is_current(&self, transport: &Transport) -> bool {
        self.slot
            .borrow()
            .active
            .as_ref()
            .is_some_and(|active| active.generation == transport.generation)
    }

    pub fn principal(&self) -> Option<Principal> {
        self.slot
            .borrow()
            .active
            .as_ref()
            .map(|active| active.principal.clone())
    }

    pub fn generation(&self) -> u64 {
        self.slot.borrow().generation
    }
}
