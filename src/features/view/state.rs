//! Page state shared through Leptos. The coordinator lives in local (non-`Send`)
//! storage; after every action its snapshot is republished into a signal the
//! routes read from.

use super::{PageSnapshot, ViewCoordinator, ViewMode};
use crate::app_lib::AppConfig;
use crate::features::session::{prompt::WindowPrompt, storage::BrowserIdentityStore};
use leptos::{prelude::*, task::spawn_local};
use std::{future::Future, rc::Rc};
use tracing::error;

#[derive(Clone, Copy)]
pub struct RecordsContext {
    coordinator: StoredValue<Option<Rc<ViewCoordinator>>, LocalStorage>,
    pub page: RwSignal<PageSnapshot>,
    pub mode: Memo<ViewMode>,
    in_flight: RwSignal<u32>,
}

impl RecordsContext {
    fn new(coordinator: Option<Rc<ViewCoordinator>>, page: PageSnapshot) -> Self {
        let page = RwSignal::new(page);
        Self {
            coordinator: StoredValue::new_local(coordinator),
            page,
            mode: Memo::new(move |_| page.with(|page| page.view.mode())),
            in_flight: RwSignal::new(0),
        }
    }

    /// Whether any remote action is still running.
    pub fn pending(&self) -> bool {
        self.in_flight.get() > 0
    }

    fn publish(&self, coordinator: &ViewCoordinator) {
        self.page.set(coordinator.snapshot());
    }

    /// Runs a synchronous view change and republishes.
    pub fn apply(&self, action: impl FnOnce(&ViewCoordinator)) {
        if let Some(coordinator) = self.coordinator.get_value() {
            action(&coordinator);
            self.publish(&coordinator);
        }
    }

    /// Spawns a remote action and republishes once it settles. Failures are
    /// already logged or kept in the snapshot by the coordinator.
    pub fn run<F, Fut>(&self, action: F)
    where
        F: FnOnce(Rc<ViewCoordinator>) -> Fut + 'static,
        Fut: Future<Output = ()> + 'static,
    {
        let Some(coordinator) = self.coordinator.get_value() else {
            return;
        };

        let context = *self;
        context.in_flight.update(|count| *count += 1);
        spawn_local(async move {
            action(coordinator.clone()).await;
            context.publish(&coordinator);
            context.in_flight.update(|count| *count = count.saturating_sub(1));
        });
    }
}

/// Builds the coordinator from the loaded config and restores any prior session.
#[component]
pub fn RecordsProvider(children: Children) -> impl IntoView {
    let config = AppConfig::load();
    let store = Box::new(BrowserIdentityStore::new(&config.app_name));
    let prompt = Box::new(WindowPrompt::new());

    let records = match ViewCoordinator::with_http(&config, store, prompt) {
        Ok(coordinator) => {
            RecordsContext::new(Some(Rc::new(coordinator)), PageSnapshot::default())
        }
        Err(err) => {
            error!(error = %err, "Failed to initialise the records page");
            let page = PageSnapshot {
                auth_error: Some(err),
                ..PageSnapshot::default()
            };
            RecordsContext::new(None, page)
        }
    };
    provide_context(records);

    records.run(|coordinator| async move {
        coordinator.start().await;
    });

    view! { {children()} }
}

/// Returns the records context, or an inert one outside the provider.
pub fn use_records() -> RecordsContext {
    use_context::<RecordsContext>()
        .unwrap_or_else(|| RecordsContext::new(None, PageSnapshot::default()))
}
