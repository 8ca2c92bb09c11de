use crate::{app_lib::runtime::now_unix_secs, features::records::Student};
use rand::{Rng, distributions::Alphanumeric};
use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Clone, Debug)]
pub struct DevSettings {
    /// Approve authorization requests as soon as they are created.
    pub auto_approve: bool,
    pub poll_interval_ms: u64,
    pub request_ttl_ms: u64,
    pub delegation_ttl_secs: u64,
}

impl Default for DevSettings {
    fn default() -> Self {
        Self {
            auto_approve: false,
            poll_interval_ms: 500,
            request_ttl_ms: 5 * 60 * 1000,
            delegation_ttl_secs: 8 * 60 * 60,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Grant {
    pub principal: String,
    pub delegation: String,
    pub expires_at: u64,
}

#[derive(Debug)]
pub struct PendingRequest {
    pub application: String,
    created: Instant,
    pub grant: Option<Grant>,
}

impl PendingRequest {
    pub fn is_expired(&self, ttl_ms: u64) -> bool {
        self.created.elapsed() > Duration::from_millis(ttl_ms)
    }
}

#[derive(Debug, Default)]
pub struct Store {
    pub requests: HashMap<String, PendingRequest>,
    /// Live delegations keyed by the bearer token.
    pub delegations: HashMap<String, Grant>,
    pub students: Vec<Student>,
    pub next_id: u64,
}

impl Store {
    pub fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Drops authorization requests nobody polled before they expired.
    pub fn prune_requests(&mut self, ttl_ms: u64) {
        let before = self.requests.len();
        self.requests.retain(|_, request| !request.is_expired(ttl_ms));
        let pruned = before - self.requests.len();
        if pruned > 0 {
            debug!(pruned, "Pruned expired authorization requests");
        }
    }

    /// Resolves a bearer token to its grant. Expired delegations are dropped
    /// on the way, not only the one asked for.
    pub fn live_grant(&mut self, token: &str) -> Option<Grant> {
        let now = now_unix_secs();
        let before = self.delegations.len();
        self.delegations.retain(|_, grant| grant.expires_at > now);
        let pruned = before - self.delegations.len();
        if pruned > 0 {
            debug!(pruned, "Pruned expired delegations");
        }
        self.delegations.get(token).cloned()
    }
}

/// Shared in-memory state for the identity provider and the student backend.
#[derive(Clone, Debug)]
pub struct DevState {
    pub settings: DevSettings,
    pub store: Arc<Mutex<Store>>,
}

impl DevState {
    pub fn new(settings: DevSettings) -> Self {
        Self {
            settings,
            store: Arc::new(Mutex::new(Store::default())),
        }
    }

    pub fn pending(&self, application: &str) -> PendingRequest {
        PendingRequest {
            application: application.to_string(),
            created: Instant::now(),
            grant: self.settings.auto_approve.then(|| self.grant()),
        }
    }

    pub fn grant(&self) -> Grant {
        Grant {
            principal: principal(),
            delegation: random_token(48),
            expires_at: now_unix_secs().saturating_add(self.settings.delegation_ttl_secs),
        }
    }
}

pub fn random_token(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Dash-separated groups of five lowercase characters, e.g. `2vxsx-fae5q-...`.
fn principal() -> String {
    random_token(25)
        .to_lowercase()
        .as_bytes()
        .chunks(5)
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect::<Vec<_>>()
        .join("-")
}
