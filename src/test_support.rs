//! In-memory doubles for the identity provider and student backend.

use crate::app_lib::AppError;
use crate::features::{
    records::{Student, StudentBackend, StudentId},
    session::{AuthClient, Identity, LoginOptions, Principal},
    transport::BackendConnector,
};
use async_trait::async_trait;
use secrecy::SecretString;
use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};
use tokio::sync::oneshot;
use url::Url;

pub fn identity(principal: &str, expires_at: u64) -> Identity {
    Identity::new(
        Principal::new(principal),
        SecretString::from(format!("delegation-for-{principal}")),
        expires_at,
        Url::parse("http://localhost:4943").expect("static url"),
    )
}

pub fn student(id: u64, name: &str, email: &str, marks: i64) -> Student {
    Student {
        id: StudentId::from(id),
        name: name.to_string(),
        email: email.to_string(),
        marks,
    }
}

#[derive(Default)]
pub struct FakeAuthClient {
    stored: RefCell<Option<Identity>>,
    grant: RefCell<Option<Identity>>,
    check_error: RefCell<Option<AppError>>,
    login_error: RefCell<Option<AppError>>,
    logout_error: RefCell<Option<AppError>>,
    prepared: Cell<u32>,
}

impl FakeAuthClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// A client that already holds a valid session.
    pub fn signed_in(identity: Identity) -> Self {
        let client = Self::new();
        *client.stored.borrow_mut() = Some(identity);
        client
    }

    /// Identity handed out by the next successful login.
    pub fn grant(&self, identity: Identity) {
        *self.grant.borrow_mut() = Some(identity);
        self.login_error.borrow_mut().take();
    }

    pub fn fail_check(&self, err: AppError) {
        *self.check_error.borrow_mut() = Some(err);
    }

    pub fn fail_login(&self, err: AppError) {
        *self.login_error.borrow_mut() = Some(err);
    }

    pub fn fail_logout(&self, err: AppError) {
        *self.logout_error.borrow_mut() = Some(err);
    }

    /// How many times login was prepared.
    pub fn prepared(&self) -> u32 {
        self.prepared.get()
    }
}

#[async_trait(?Send)]
impl AuthClient for FakeAuthClient {
    async fn is_authenticated(&self) -> Result<bool, AppError> {
        if let Some(err) = self.check_error.borrow_mut().take() {
            return Err(err);
        }
        Ok(self.stored.borrow().is_some())
    }

    fn identity(&self) -> Result<Option<Identity>, AppError> {
        Ok(self.stored.borrow().clone())
    }

    fn prepare_login(&self) -> Result<(), AppError> {
        self.prepared.set(self.prepared.get() + 1);
        Ok(())
    }

    async fn login(&self, _options: &LoginOptions) -> Result<Identity, AppError> {
        if let Some(err) = self.login_error.borrow_mut().take() {
            return Err(err);
        }
        let identity = self.grant.borrow().clone().ok_or(AppError::Http {
            status: 403,
            message: "denied".to_string(),
        })?;
        *self.stored.borrow_mut() = Some(identity.clone());
        Ok(identity)
    }

    async fn logout(&self) -> Result<(), AppError> {
        self.stored.borrow_mut().take();
        match self.logout_error.borrow_mut().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Backend holding the "true" remote state, shared by every transport bound to it.
#[derive(Default)]
pub struct InMemoryBackend {
    students: RefCell<Vec<Student>>,
    next_id: Cell<u64>,
    calls: RefCell<Vec<String>>,
    fail_next: RefCell<Option<AppError>>,
    on_next_call: RefCell<Option<Box<dyn FnOnce()>>>,
    held_fetch: RefCell<Option<oneshot::Receiver<()>>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::with_students(Vec::new())
    }

    pub fn with_students(students: Vec<Student>) -> Self {
        let next_id = students
            .iter()
            .filter_map(|student| student.id.as_str().parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            + 1;

        Self {
            students: RefCell::new(students),
            next_id: Cell::new(next_id),
            ..Self::default()
        }
    }

    pub fn connector(self: &Rc<Self>) -> Rc<dyn BackendConnector> {
        Rc::new(SharedConnector(self.clone()))
    }

    pub fn snapshot(&self) -> Vec<Student> {
        self.students.borrow().clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// Deletes a record behind the client's back.
    pub fn remove(&self, id: &StudentId) {
        self.students.borrow_mut().retain(|student| student.id != *id);
    }

    pub fn fail_next(&self, err: AppError) {
        *self.fail_next.borrow_mut() = Some(err);
    }

    /// Runs `hook` while the next call is in flight.
    pub fn on_next_call(&self, hook: impl FnOnce() + 'static) {
        *self.on_next_call.borrow_mut() = Some(Box::new(hook));
    }

    /// Makes the next `get_students` read the rows at call time but answer only
    /// once the returned sender fires (or is dropped).
    pub fn hold_next_fetch(&self) -> oneshot::Sender<()> {
        let (release, held) = oneshot::channel();
        *self.held_fetch.borrow_mut() = Some(held);
        release
    }

    fn enter(&self, call: &str) -> Result<(), AppError> {
        self.calls.borrow_mut().push(call.to_string());
        let hook = self.on_next_call.borrow_mut().take();
        if let Some(hook) = hook {
            hook();
        }
        match self.fail_next.borrow_mut().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

fn not_found(id: &StudentId) -> AppError {
    AppError::Http {
        status: 404,
        message: format!("student {id} not found"),
    }
}

fn unprocessable() -> AppError {
    AppError::Http {
        status: 422,
        message: "marks must be an integer".to_string(),
    }
}

#[async_trait(?Send)]
impl StudentBackend for InMemoryBackend {
    async fn get_students(&self) -> Result<Vec<Student>, AppError> {
        self.enter("get_students")?;
        let students = self.snapshot();
        let held = self.held_fetch.borrow_mut().take();
        if let Some(held) = held {
            let _ = held.await;
        }
        Ok(students)
    }

    async fn add_student(
        &self,
        name: &str,
        email: &str,
        marks: Option<i64>,
    ) -> Result<(), AppError> {
        self.enter("add_student")?;
        let marks = marks.ok_or_else(unprocessable)?;
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.students.borrow_mut().push(Student {
            id: StudentId::from(id),
            name: name.to_string(),
            email: email.to_string(),
            marks,
        });
        Ok(())
    }

    async fn update_student(
        &self,
        id: &StudentId,
        name: &str,
        email: &str,
        marks: Option<i64>,
    ) -> Result<(), AppError> {
        self.enter("update_student")?;
        let marks = marks.ok_or_else(unprocessable)?;
        let mut students = self.students.borrow_mut();
        let student = students
            .iter_mut()
            .find(|student| student.id == *id)
            .ok_or_else(|| not_found(id))?;
        student.name = name.to_string();
        student.email = email.to_string();
        student.marks = marks;
        Ok(())
    }

    async fn delete_student(&self, id: &StudentId) -> Result<(), AppError> {
        self.enter("delete_student")?;
        let mut students = self.students.borrow_mut();
        let before = students.len();
        students.retain(|student| student.id != *id);
        if students.len() == before {
            return Err(not_found(id));
        }
        Ok(())
    }
}

struct SharedConnector(Rc<InMemoryBackend>);

impl BackendConnector for SharedConnector {
    fn connect(&self, _identity: &Identity) -> Rc<dyn StudentBackend> {
        self.0.clone()
    }
}
