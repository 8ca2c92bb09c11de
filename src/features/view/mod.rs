//! View state coordination: which of the list, the add form or the edit form is
//! showing, and which record is being edited. User actions come in here and are
//! turned into session or controller calls.
//!
//! The state is a single [`ViewState`], so the add and edit forms can never be
//! open together. Drafts are detached copies; leaving a form discards them
//! without touching the backend.

#[cfg(target_arch = "wasm32")]
pub mod state;

use crate::{
    app_lib::{AppConfig, AppError, api::build_client},
    features::{
        records::{DraftField, Student, StudentController, StudentDraft, StudentId},
        session::{
            HttpAuthClient, IdentityStore, LoginOptions, LoginPrompt, Session, SessionManager,
        },
        transport::{HttpBackendConnector, TransportBinder},
    },
};
use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};
use tracing::debug;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ViewState {
    #[default]
    Browsing,
    Adding(StudentDraft),
    Editing {
        id: StudentId,
        draft: StudentDraft,
    },
}

/// Which section of the page is showing, without the draft contents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    Browsing,
    Adding,
    Editing,
}

impl ViewState {
    pub fn mode(&self) -> ViewMode {
        match self {
            ViewState::Browsing => ViewMode::Browsing,
            ViewState::Adding(_) => ViewMode::Adding,
            ViewState::Editing { .. } => ViewMode::Editing,
        }
    }

    pub fn draft(&self) -> Option<&StudentDraft> {
        match self {
            ViewState::Browsing => None,
            ViewState::Adding(draft) | ViewState::Editing { draft, .. } => Some(draft),
        }
    }
}

/// Everything the page renders, detached from the coordinator.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageSnapshot {
    pub session: Session,
    pub students: Vec<Student>,
    pub view: ViewState,
    /// Last sign-in/sign-out failure, cleared by the next successful attempt.
    pub auth_error: Option<AppError>,
}

impl PageSnapshot {
    pub fn welcome_name(&self) -> &str {
        self.session
            .principal
            .as_ref()
            .map_or("User", |principal| principal.as_str())
    }
}

pub struct ViewCoordinator {
    session: SessionManager,
    controller: StudentController,
    view: RefCell<ViewState>,
    /// Bumped each time a form opens or closes; a submit only closes the form
    /// it was sent from.
    form_epoch: Cell<u64>,
    auth_error: RefCell<Option<AppError>>,
}

impl ViewCoordinator {
    pub fn new(session: SessionManager, controller: StudentController) -> Self {
        Self {
            session,
            controller,
            view: RefCell::new(ViewState::Browsing),
            form_epoch: Cell::new(0),
            auth_error: RefCell::new(None),
        }
    }

    /// Wires the HTTP identity provider and backend from `config`.
    pub fn with_http(
        config: &AppConfig,
        store: Box<dyn IdentityStore>,
        prompt: Box<dyn LoginPrompt>,
    ) -> Result<Self, AppError> {
        let http = build_client()?;
        let options = LoginOptions::from_config(config)?;
        let auth = HttpAuthClient::new(http.clone(), config.app_name.clone(), store, prompt)?;
        let connector = HttpBackendConnector::new(http, config.backend_base_url.clone());

        let binder = TransportBinder::new(Rc::new(connector));
        let session = SessionManager::new(Rc::new(auth), binder.clone(), options);
        Ok(Self::new(session, StudentController::new(binder)))
    }

    /// Restores a prior session. The list stays empty until requested.
    pub async fn start(&self) -> Session {
        self.session.check_session().await
    }

    /// Runs the part of sign-in that has to happen inside the click handler.
    pub fn prepare_sign_in(&self) {
        self.session.prepare_sign_in();
    }

    /// Signs in and loads the list; a failure is kept for the page to offer a retry.
    pub async fn sign_in(&self) -> Result<(), AppError> {
        match self.session.sign_in().await {
            Ok(_) => {
                self.auth_error.borrow_mut().take();
                let _ = self.controller.fetch_all().await;
                Ok(())
            }
            Err(err) => {
                *self.auth_error.borrow_mut() = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Signs out and resets the page; the session is cleared even on failure.
    pub async fn sign_out(&self) -> Result<(), AppError> {
        let result = self.session.sign_out().await;

        self.switch_to(ViewState::Browsing);
        self.controller.clear();
        *self.auth_error.borrow_mut() = result.as_ref().err().cloned();
        result
    }

    /// Opens the add form with a fresh draft; an open add form keeps its draft.
    pub fn show_add_form(&self) {
        if !matches!(*self.view.borrow(), ViewState::Adding(_)) {
            self.switch_to(ViewState::Adding(StudentDraft::default()));
        }
    }

    /// Closes both forms, discarding drafts, and refetches the list.
    pub async fn view_students(&self) {
        self.switch_to(ViewState::Browsing);
        let _ = self.controller.fetch_all().await;
    }

    /// Opens the edit form on a detached copy of `student`.
    pub fn edit(&self, student: &Student) {
        self.switch_to(ViewState::Editing {
            id: student.id.clone(),
            draft: StudentDraft::from(student),
        });
    }

    /// Leaves any form without submitting.
    pub fn cancel(&self) {
        self.switch_to(ViewState::Browsing);
    }

    /// Updates the open form's draft; ignored while browsing.
    pub fn set_field(&self, field: DraftField, value: impl Into<String>) {
        match &mut *self.view.borrow_mut() {
            ViewState::Browsing => {}
            ViewState::Adding(draft) | ViewState::Editing { draft, .. } => {
                draft.set(field, value.into());
            }
        }
    }

    /// Submits the open form. Success closes it; failure leaves it open with the
    /// draft intact.
    pub async fn submit(&self) -> Result<(), AppError> {
        let view = self.view.borrow().clone();
        let epoch = self.form_epoch.get();
        match view {
            ViewState::Browsing => return Ok(()),
            ViewState::Adding(draft) => self.controller.add(&draft).await?,
            ViewState::Editing { id, draft } => self.controller.update(&id, &draft).await?,
        }

        self.close_submitted(epoch);
        Ok(())
    }

    pub async fn delete(&self, id: &StudentId) -> Result<(), AppError> {
        self.controller.delete(id).await
    }

    fn switch_to(&self, view: ViewState) {
        self.form_epoch.set(self.form_epoch.get().wrapping_add(1));
        *self.view.borrow_mut() = view;
    }

    /// Returns to browsing unless the user already moved elsewhere mid-call.
    fn close_submitted(&self, epoch: u64) {
        if self.form_epoch.get() == epoch {
            debug!("Closing submitted form");
            self.switch_to(ViewState::Browsing);
        } else {
            debug!("Form changed while submitting; leaving it open");
        }
    }

    pub fn view(&self) -> ViewState {
        self.view.borrow().clone()
    }

    pub fn snapshot(&self) -> PageSnapshot {
        PageSnapshot {
            session: self.session.session(),
            students: self.controller.students(),
            view: self.view(),
            auth_error: self.auth_error.borrow().clone(),
        }
    }
}
