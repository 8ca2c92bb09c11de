#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use reqwest::Client;
use student_marks::{
    app_lib::{AppConfig, AppError, Environment},
    dev::{self, DevSettings, DevState},
    features::{
        session::{LoginPrompt, MemoryIdentityStore},
        view::ViewCoordinator,
    },
};
use std::{cell::RefCell, rc::Rc};
use tokio::net::TcpListener;

/// Starts `marks-dev` on an ephemeral port and returns its base URL.
pub async fn spawn_dev(settings: DevSettings) -> anyhow::Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let address = listener.local_addr()?;
    tokio::spawn(dev::serve(listener, DevState::new(settings)));
    Ok(format!("http://{address}"))
}

pub fn fast_settings() -> DevSettings {
    DevSettings {
        poll_interval_ms: 10,
        ..DevSettings::default()
    }
}

pub fn config(base_url: &str) -> AppConfig {
    AppConfig {
        backend_base_url: base_url.to_string(),
        identity_provider_url: base_url.to_string(),
        identity_canister_id: "rdmx6-jaaaa-aaaaa-aaadq-cai".to_string(),
        environment: Environment::Development,
        app_name: "student-marks".to_string(),
    }
}

/// Plays the user: opens the verification URI as soon as it is handed over.
/// Clones share the log of prompt steps.
#[derive(Clone)]
pub struct ApprovingPrompt {
    http: Client,
    steps: Rc<RefCell<Vec<&'static str>>>,
}

impl ApprovingPrompt {
    pub fn new() -> Self {
        Self {
            http: Client::new(),
            steps: Rc::default(),
        }
    }

    pub fn steps(&self) -> Vec<&'static str> {
        self.steps.borrow().clone()
    }
}

impl LoginPrompt for ApprovingPrompt {
    fn prepare(&self) -> Result<(), AppError> {
        self.steps.borrow_mut().push("prepare");
        Ok(())
    }

    fn open(&self, verification_uri: &str) -> Result<(), AppError> {
        self.steps.borrow_mut().push("open");
        let http = self.http.clone();
        let uri = verification_uri.to_string();
        tokio::spawn(async move {
            let _ = http.get(uri).send().await;
        });
        Ok(())
    }
}

pub fn coordinator(
    base_url: &str,
    store: &MemoryIdentityStore,
    prompt: impl LoginPrompt + 'static,
) -> ViewCoordinator {
    ViewCoordinator::with_http(&config(base_url), Box::new(store.clone()), Box::new(prompt))
        .expect("coordinator")
}
